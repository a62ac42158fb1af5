//! # Resolution Engine
//!
//! Latches an event's outcome exactly once.
//!
//! ```text
//!   Open ──(one side empty)──────────────────────────▶ Refunded
//!    │
//!    └──▶ AwaitingResolution ──(oracle answers)──────▶ Resolved
//!              ▲       │
//!              └───────┘ (oracle fails: stay, caller may retry)
//! ```
//!
//! The state field is the lock. A terminal event rejects every further
//! attempt, so an outcome can never be overwritten, and the oracle is never
//! asked about an event whose answer is already recorded.

use anchor_lang::prelude::*;

use crate::errors::{ErrorKind, EscrowError};
use crate::state::{EventState, Outcome, PredictionEvent};

/// Source of the authoritative outcome for an event.
///
/// Implementations fail with `OracleUnavailable` or `OracleTimeout` when no
/// answer can be produced yet; the engine does not retry on its own.
pub trait OutcomeOracle {
    /// `true` if YES happened
    fn fetch_outcome(&self, event_id: u64) -> Result<bool>;
}

/// Result of a resolution attempt, returned by `resolve_event`
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolutionStatus {
    /// Outcome latched
    Resolved { outcome: bool },
    /// One side was empty, every stake is refundable
    Refunded,
    /// Oracle could not answer, event left retryable
    AwaitingOracle,
}

/// Attempt to resolve `event` at time `now`.
///
/// On oracle failure the oracle's error is returned and the event is left
/// in `AwaitingResolution`; that transition is intentionally kept.
pub fn resolve<O: OutcomeOracle + ?Sized>(
    event: &mut PredictionEvent,
    oracle: &O,
    now: i64,
) -> Result<ResolutionStatus> {
    require!(!event.state.is_terminal(), EscrowError::AlreadyResolved);
    require!(now >= event.deadline, EscrowError::TooEarly);

    if event.pool().is_one_sided() {
        event.state = EventState::Refunded;
        event.resolved_at = now;
        msg!(
            "Event {} refunded: yes={} no={}",
            event.id,
            event.pool_yes,
            event.pool_no
        );
        return Ok(ResolutionStatus::Refunded);
    }

    event.state = EventState::AwaitingResolution;
    event.resolution_attempts = event.resolution_attempts.saturating_add(1);

    let yes = match oracle.fetch_outcome(event.id) {
        Ok(yes) => yes,
        Err(e) => {
            msg!(
                "Event {} awaiting oracle after attempt {}",
                event.id,
                event.resolution_attempts
            );
            return Err(e);
        }
    };

    event.outcome = Outcome::from(yes);
    event.state = EventState::Resolved;
    event.resolved_at = now;

    msg!("Event {} resolved: {:?}", event.id, event.outcome);

    Ok(ResolutionStatus::Resolved { outcome: yes })
}

/// A failed attempt that may be committed while the oracle catches up
#[derive(Clone, Copy, Debug)]
pub struct Deferral {
    pub attempts: u32,
    pub reason: EscrowError,
}

impl Deferral {
    pub fn timed_out(&self) -> bool {
        matches!(self.reason, EscrowError::OracleTimeout)
    }
}

/// Classify an error returned by [`resolve`].
///
/// Only an oracle outage on an event already in `AwaitingResolution` becomes
/// a [`Deferral`]. Anything else, a mismatched or forged report included, is
/// handed back unchanged and must abort the transaction.
pub fn defer(event: &PredictionEvent, err: Error) -> Result<Deferral> {
    if event.state != EventState::AwaitingResolution {
        return Err(err);
    }
    match EscrowError::from_error(&err) {
        Some(reason) if reason.kind() == ErrorKind::ExternalDependencyFailure => Ok(Deferral {
            attempts: event.resolution_attempts,
            reason,
        }),
        _ => Err(err),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    use super::*;
    use crate::state::{Side, Stake};

    const NOW: i64 = 1_700_000_000;
    const DEADLINE: i64 = NOW + 3_600;

    /// Deterministic oracle that replays scripted answers and counts calls
    #[derive(Default)]
    pub struct ScriptedOracle {
        answers: RefCell<VecDeque<std::result::Result<bool, EscrowError>>>,
        calls: Cell<u32>,
    }

    impl ScriptedOracle {
        pub fn answering(yes: bool) -> Self {
            let oracle = Self::default();
            oracle.push(Ok(yes));
            oracle
        }

        pub fn push(&self, answer: std::result::Result<bool, EscrowError>) {
            self.answers.borrow_mut().push_back(answer);
        }

        pub fn calls(&self) -> u32 {
            self.calls.get()
        }
    }

    impl OutcomeOracle for ScriptedOracle {
        fn fetch_outcome(&self, _event_id: u64) -> Result<bool> {
            self.calls.set(self.calls.get() + 1);
            match self.answers.borrow_mut().pop_front() {
                Some(Ok(yes)) => Ok(yes),
                Some(Err(e)) => Err(e.into()),
                None => err!(EscrowError::OracleUnavailable),
            }
        }
    }

    fn staked_event(yes: u64, no: u64) -> PredictionEvent {
        let mut event =
            PredictionEvent::open(9, Pubkey::new_unique(), Pubkey::new_unique(), DEADLINE, NOW, 0)
                .unwrap();
        for (side, amount) in [(Side::Yes, yes), (Side::No, no)] {
            if amount > 0 {
                event
                    .record_stake(&mut Stake::default(), Pubkey::new_unique(), side, amount, NOW)
                    .unwrap();
            }
        }
        event
    }

    #[test]
    fn test_too_early() {
        let mut event = staked_event(10, 10);
        let oracle = ScriptedOracle::answering(true);

        let err = resolve(&mut event, &oracle, DEADLINE - 1).unwrap_err();
        assert_eq!(err, EscrowError::TooEarly.into());
        assert_eq!(event.state, EventState::Open);
        assert_eq!(oracle.calls(), 0);
    }

    #[test]
    fn test_resolves_with_oracle_answer() {
        let mut event = staked_event(100, 300);
        let oracle = ScriptedOracle::answering(true);

        let status = resolve(&mut event, &oracle, DEADLINE).unwrap();
        assert_eq!(status, ResolutionStatus::Resolved { outcome: true });
        assert_eq!(event.state, EventState::Resolved);
        assert_eq!(event.outcome, Outcome::Yes);
        assert_eq!(event.resolved_at, DEADLINE);
        assert_eq!(oracle.calls(), 1);
    }

    #[test]
    fn test_outcome_never_changes_after_resolution() {
        let mut event = staked_event(5, 5);
        let oracle = ScriptedOracle::answering(false);
        resolve(&mut event, &oracle, DEADLINE).unwrap();

        oracle.push(Ok(true));
        for later in 0..3 {
            let err = resolve(&mut event, &oracle, DEADLINE + later).unwrap_err();
            assert_eq!(err, EscrowError::AlreadyResolved.into());
        }

        assert_eq!(event.outcome, Outcome::No);
        assert_eq!(oracle.calls(), 1);
    }

    #[test]
    fn test_one_sided_event_refunds_without_oracle() {
        let mut event = staked_event(50, 0);
        let oracle = ScriptedOracle::answering(true);

        let status = resolve(&mut event, &oracle, DEADLINE + 10).unwrap();
        assert_eq!(status, ResolutionStatus::Refunded);
        assert_eq!(event.state, EventState::Refunded);
        assert_eq!(event.outcome, Outcome::Undetermined);
        assert_eq!(oracle.calls(), 0);

        let err = resolve(&mut event, &oracle, DEADLINE + 20).unwrap_err();
        assert_eq!(err, EscrowError::AlreadyResolved.into());
    }

    #[test]
    fn test_empty_event_refunds() {
        let mut event = staked_event(0, 0);
        let oracle = ScriptedOracle::default();

        assert_eq!(resolve(&mut event, &oracle, DEADLINE).unwrap(), ResolutionStatus::Refunded);
        assert_eq!(oracle.calls(), 0);
    }

    #[test]
    fn test_oracle_outage_leaves_event_retryable() {
        let mut event = staked_event(10, 20);
        let oracle = ScriptedOracle::default();
        oracle.push(Err(EscrowError::OracleUnavailable));
        oracle.push(Err(EscrowError::OracleTimeout));
        oracle.push(Ok(false));

        let err = resolve(&mut event, &oracle, DEADLINE).unwrap_err();
        assert_eq!(err, EscrowError::OracleUnavailable.into());
        assert_eq!(event.state, EventState::AwaitingResolution);
        assert_eq!(event.outcome, Outcome::Undetermined);

        let err = resolve(&mut event, &oracle, DEADLINE + 60).unwrap_err();
        assert_eq!(err, EscrowError::OracleTimeout.into());
        assert_eq!(event.state, EventState::AwaitingResolution);

        let status = resolve(&mut event, &oracle, DEADLINE + 120).unwrap();
        assert_eq!(status, ResolutionStatus::Resolved { outcome: false });
        assert_eq!(event.resolution_attempts, 3);
        assert_eq!(oracle.calls(), 3);
    }

    #[test]
    fn test_oracle_outages_are_deferred() {
        for (attempt, reason) in [EscrowError::OracleUnavailable, EscrowError::OracleTimeout]
            .into_iter()
            .enumerate()
        {
            let mut event = staked_event(10, 20);
            event.resolution_attempts = attempt as u32;
            let oracle = ScriptedOracle::default();
            oracle.push(Err(reason));

            let err = resolve(&mut event, &oracle, DEADLINE).unwrap_err();
            let deferral = defer(&event, err).unwrap();
            assert_eq!(u32::from(deferral.reason), u32::from(reason));
            assert_eq!(deferral.attempts, attempt as u32 + 1);
            assert_eq!(deferral.timed_out(), matches!(reason, EscrowError::OracleTimeout));
        }
    }

    #[test]
    fn test_bad_reports_are_not_deferred() {
        for reason in [EscrowError::ReportMismatch, EscrowError::Unauthorized] {
            let mut event = staked_event(10, 20);
            let oracle = ScriptedOracle::default();
            oracle.push(Err(reason));

            let err = resolve(&mut event, &oracle, DEADLINE).unwrap_err();
            assert_eq!(event.state, EventState::AwaitingResolution);
            assert_eq!(defer(&event, err).unwrap_err(), reason.into());
        }
    }

    #[test]
    fn test_precondition_failures_are_not_deferred() {
        let mut event = staked_event(10, 20);
        let oracle = ScriptedOracle::default();

        let err = resolve(&mut event, &oracle, DEADLINE - 1).unwrap_err();
        assert_eq!(defer(&event, err).unwrap_err(), EscrowError::TooEarly.into());

        // An outage reported against an event that never left Open is not committed
        let outage: Error = EscrowError::OracleUnavailable.into();
        assert_eq!(defer(&event, outage).unwrap_err(), EscrowError::OracleUnavailable.into());
    }
}
