//! Prediction Event State
//!
//! Each event is a single yes/no question with its own pooled collateral.

use anchor_lang::prelude::*;

/// Individual prediction event account
///
/// Seeds: ["event", id.to_le_bytes()]
#[account]
#[derive(InitSpace, Debug, Default, PartialEq, Eq)]
pub struct PredictionEvent {
    /// Unique event identifier, supplied by the creator
    pub id: u64,

    /// Account that opened the event
    pub creator: Pubkey,

    /// Collateral token mint held by the event vault
    pub collateral_mint: Pubkey,

    /// Unix timestamp at which staking closes and resolution opens
    pub deadline: i64,

    /// Unix timestamp when the event was created (0 = never created)
    pub created_at: i64,

    /// Unix timestamp of the terminal transition (0 = not yet)
    pub resolved_at: i64,

    /// Lifecycle state
    pub state: EventState,

    /// Reported outcome (only valid when `state == Resolved`)
    pub outcome: Outcome,

    /// Total staked on YES
    pub pool_yes: u64,

    /// Total staked on NO
    pub pool_no: u64,

    /// Total collateral already paid back out by claims
    pub paid_out: u64,

    /// Number of distinct (participant, side) stakes
    pub stake_count: u32,

    /// Number of stakes that have been settled
    pub claim_count: u32,

    /// Oracle consultations made, retries included
    pub resolution_attempts: u32,

    /// PDA bump seed
    pub bump: u8,
}

impl PredictionEvent {
    pub const SEED: &'static [u8] = b"event";
}

/// Event lifecycle state
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug, Default)]
pub enum EventState {
    /// Accepting stakes until the deadline
    #[default]
    Open,
    /// Oracle consulted, answer not yet recorded
    AwaitingResolution,
    /// Outcome latched, winners may claim
    Resolved,
    /// One side was empty, every staker gets their amount back
    Refunded,
}

impl EventState {
    pub fn is_terminal(self) -> bool {
        matches!(self, EventState::Resolved | EventState::Refunded)
    }
}

/// Reported outcome
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug, Default)]
pub enum Outcome {
    /// Not yet determined
    #[default]
    Undetermined,
    /// YES outcome occurred
    Yes,
    /// NO outcome occurred
    No,
}

impl Outcome {
    /// The side that won, if any
    pub fn winning_side(self) -> Option<Side> {
        match self {
            Outcome::Yes => Some(Side::Yes),
            Outcome::No => Some(Side::No),
            Outcome::Undetermined => None,
        }
    }
}

impl From<bool> for Outcome {
    fn from(yes: bool) -> Self {
        if yes {
            Outcome::Yes
        } else {
            Outcome::No
        }
    }
}

/// Side of a stake
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug, Default, PartialOrd, Ord, Hash)]
pub enum Side {
    #[default]
    Yes,
    No,
}

impl Side {
    pub fn is_yes(self) -> bool {
        self == Side::Yes
    }

    /// Single-byte PDA seed component
    pub fn seed(self) -> u8 {
        match self {
            Side::Yes => 1,
            Side::No => 0,
        }
    }
}

impl From<bool> for Side {
    fn from(yes: bool) -> Self {
        if yes {
            Side::Yes
        } else {
            Side::No
        }
    }
}
