//! Event Resolution
//!
//! Permissionless. Anyone may resolve an event once its deadline passes.
//!
//! ## Resolution Flow
//!
//! 1. Deadline passes
//! 2. Oracle posts its report (`post_outcome`)
//! 3. Anyone calls `resolve_event`, passing the report if it exists
//! 4. Event becomes Resolved (or Refunded when one side is empty)
//! 5. Winners claim
//!
//! If the report is missing, the event is committed as
//! `AwaitingResolution` and the instruction succeeds with
//! `ResolutionStatus::AwaitingOracle`. Failing the transaction would roll
//! that transition back, so the oracle error is reported through the
//! `ResolutionDeferred` event and the return data instead. Calling again
//! later is the retry.

use anchor_lang::prelude::*;

use crate::escrow::{defer, resolve, ReportedOutcome, ResolutionStatus};
use crate::state::{Config, OutcomeReport, PredictionEvent};

/// Event emitted when an event is resolved through the oracle
#[event]
pub struct EventResolved {
    pub event_id: u64,
    pub outcome: bool,
    pub pool_yes: u64,
    pub pool_no: u64,
    pub resolver: Pubkey,
    pub timestamp: i64,
}

/// Event emitted when a one-sided event is turned into a refund
#[event]
pub struct EventRefunded {
    pub event_id: u64,
    pub pool_yes: u64,
    pub pool_no: u64,
    pub timestamp: i64,
}

/// Event emitted when the oracle could not answer yet
#[event]
pub struct ResolutionDeferred {
    pub event_id: u64,
    pub attempts: u32,
    /// Anchor error code of the oracle failure
    pub error_code: u32,
    pub timed_out: bool,
}

/// Accounts for resolution
#[derive(Accounts)]
#[instruction(event_id: u64)]
pub struct ResolveEvent<'info> {
    /// Anyone
    pub resolver: Signer<'info>,

    /// Global configuration
    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    /// Event to resolve
    #[account(
        mut,
        seeds = [PredictionEvent::SEED, event_id.to_le_bytes().as_ref()],
        bump = event.bump,
    )]
    pub event: Account<'info, PredictionEvent>,

    /// Oracle report, omitted while the oracle has not posted
    #[account(
        seeds = [OutcomeReport::SEED, event_id.to_le_bytes().as_ref()],
        bump = report.bump,
    )]
    pub report: Option<Account<'info, OutcomeReport>>,
}

impl<'info> ResolveEvent<'info> {
    pub fn resolve_event(&mut self) -> Result<ResolutionStatus> {
        let clock = Clock::get()?;
        let now = clock.unix_timestamp;

        let oracle = ReportedOutcome::new(
            self.report.as_deref(),
            &self.config,
            self.event.deadline,
            now,
        );

        match resolve(&mut self.event, &oracle, now) {
            Ok(ResolutionStatus::Resolved { outcome }) => {
                emit!(EventResolved {
                    event_id: self.event.id,
                    outcome,
                    pool_yes: self.event.pool_yes,
                    pool_no: self.event.pool_no,
                    resolver: self.resolver.key(),
                    timestamp: now,
                });
                Ok(ResolutionStatus::Resolved { outcome })
            }
            Ok(status) => {
                emit!(EventRefunded {
                    event_id: self.event.id,
                    pool_yes: self.event.pool_yes,
                    pool_no: self.event.pool_no,
                    timestamp: now,
                });
                Ok(status)
            }
            Err(e) => {
                let deferral = defer(&self.event, e)?;

                emit!(ResolutionDeferred {
                    event_id: self.event.id,
                    attempts: deferral.attempts,
                    error_code: u32::from(deferral.reason),
                    timed_out: deferral.timed_out(),
                });
                msg!("Resolution deferred: {}", deferral.reason);

                Ok(ResolutionStatus::AwaitingOracle)
            }
        }
    }
}
