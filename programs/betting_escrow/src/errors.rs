//! Escrow errors
//!
//! Every failure the program can report lives in [`EscrowError`]. Front ends
//! group them through [`ErrorKind`] to decide what to tell the user
//! ("try again once the oracle reports" vs. "already claimed").

use anchor_lang::prelude::*;

#[error_code]
pub enum EscrowError {
    #[msg("No event exists with this id")]
    UnknownEvent,
    #[msg("An event with this id already exists")]
    DuplicateEvent,
    #[msg("Deadline must be in the future")]
    InvalidDeadline,
    #[msg("Stake amount must be positive")]
    ZeroAmount,
    #[msg("Invalid protocol configuration")]
    InvalidConfig,
    #[msg("Event is no longer accepting stakes")]
    EventClosed,
    #[msg("Event deadline has not passed yet")]
    TooEarly,
    #[msg("Event has already been resolved or refunded")]
    AlreadyResolved,
    #[msg("Event is not resolved")]
    NotResolved,
    #[msg("Nothing left to claim for this participant")]
    NothingToClaim,
    #[msg("Caller is not the configured oracle")]
    Unauthorized,
    #[msg("Oracle has not reported an outcome yet")]
    OracleUnavailable,
    #[msg("Oracle did not report within the resolution window")]
    OracleTimeout,
    #[msg("Oracle report belongs to a different event")]
    ReportMismatch,
    #[msg("Stake record does not match the event, participant or side")]
    StakeMismatch,
    #[msg("Stake account does not belong to this event")]
    ForeignStake,
    #[msg("Stake account supplied more than once")]
    DuplicateStake,
    #[msg("Payout would exceed the event pool")]
    PoolExhausted,
    #[msg("Arithmetic overflow")]
    MathOverflow,
}

/// Coarse error category for callers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    StateConflict,
    Unauthorized,
    ExternalDependencyFailure,
    AlreadySettled,
    Internal,
}

impl EscrowError {
    pub const ALL: [EscrowError; 19] = [
        EscrowError::UnknownEvent,
        EscrowError::DuplicateEvent,
        EscrowError::InvalidDeadline,
        EscrowError::ZeroAmount,
        EscrowError::InvalidConfig,
        EscrowError::EventClosed,
        EscrowError::TooEarly,
        EscrowError::AlreadyResolved,
        EscrowError::NotResolved,
        EscrowError::NothingToClaim,
        EscrowError::Unauthorized,
        EscrowError::OracleUnavailable,
        EscrowError::OracleTimeout,
        EscrowError::ReportMismatch,
        EscrowError::StakeMismatch,
        EscrowError::ForeignStake,
        EscrowError::DuplicateStake,
        EscrowError::PoolExhausted,
        EscrowError::MathOverflow,
    ];

    pub fn kind(self) -> ErrorKind {
        use EscrowError::*;
        match self {
            UnknownEvent => ErrorKind::NotFound,
            InvalidDeadline | ZeroAmount | InvalidConfig | ReportMismatch | StakeMismatch
            | ForeignStake | DuplicateStake => ErrorKind::InvalidInput,
            DuplicateEvent | EventClosed | TooEarly | AlreadyResolved | NotResolved => {
                ErrorKind::StateConflict
            }
            Unauthorized => ErrorKind::Unauthorized,
            OracleUnavailable | OracleTimeout => ErrorKind::ExternalDependencyFailure,
            NothingToClaim => ErrorKind::AlreadySettled,
            PoolExhausted | MathOverflow => ErrorKind::Internal,
        }
    }

    /// Recover the escrow variant carried by an Anchor error, if any
    pub fn from_error(err: &Error) -> Option<EscrowError> {
        Self::ALL
            .into_iter()
            .find(|candidate| *err == Error::from(*candidate))
    }
}
