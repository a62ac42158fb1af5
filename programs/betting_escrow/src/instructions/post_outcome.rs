//! Oracle Reporting
//!
//! The configured oracle records the outcome of an event once its deadline
//! has passed. The report is written exactly once; `resolve_event` reads it.
//!
//! ## Oracle Integration
//!
//! The oracle authority can be:
//! - **Keeper bot**: relays a price feed or data provider answer
//! - **Multisig**: a committee of trusted resolvers
//! - **AI Agent**: an autonomous agent watching the real-world event

use anchor_lang::prelude::*;

use crate::errors::EscrowError;
use crate::state::{Config, OutcomeReport, PredictionEvent};

/// Event emitted when the oracle reports an outcome
#[event]
pub struct OutcomePosted {
    pub event_id: u64,
    pub outcome: bool,
    pub reporter: Pubkey,
    pub timestamp: i64,
}

/// Accounts for posting an outcome report
#[derive(Accounts)]
#[instruction(event_id: u64)]
pub struct PostOutcome<'info> {
    /// Oracle authority
    #[account(
        mut,
        constraint = oracle.key() == config.oracle @ EscrowError::Unauthorized
    )]
    pub oracle: Signer<'info>,

    /// Global configuration
    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    /// Event being reported on
    #[account(
        seeds = [PredictionEvent::SEED, event_id.to_le_bytes().as_ref()],
        bump = event.bump,
    )]
    pub event: Account<'info, PredictionEvent>,

    /// The report (created; a second report for the same event fails here)
    #[account(
        init,
        payer = oracle,
        space = 8 + OutcomeReport::INIT_SPACE,
        seeds = [OutcomeReport::SEED, event_id.to_le_bytes().as_ref()],
        bump,
    )]
    pub report: Account<'info, OutcomeReport>,

    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> PostOutcome<'info> {
    pub fn post_outcome(&mut self, yes: bool, bumps: &PostOutcomeBumps) -> Result<()> {
        let clock = Clock::get()?;

        require!(
            clock.unix_timestamp >= self.event.deadline,
            EscrowError::TooEarly
        );

        self.report.set_inner(OutcomeReport {
            event_id: self.event.id,
            outcome: yes,
            reporter: self.oracle.key(),
            reported_at: clock.unix_timestamp,
            bump: bumps.report,
        });

        emit!(OutcomePosted {
            event_id: self.event.id,
            outcome: yes,
            reporter: self.oracle.key(),
            timestamp: clock.unix_timestamp,
        });

        msg!(
            "Oracle reported event {}: {}",
            self.event.id,
            if yes { "YES" } else { "NO" }
        );

        Ok(())
    }
}
