//! On-chain oracle adapter
//!
//! Serves [`OutcomeOracle`] from the `OutcomeReport` account the configured
//! oracle writes through `post_outcome`.

use anchor_lang::prelude::*;

use super::resolution::OutcomeOracle;
use crate::errors::EscrowError;
use crate::state::{Config, OutcomeReport};

pub struct ReportedOutcome<'a> {
    report: Option<&'a OutcomeReport>,
    oracle: Pubkey,
    /// Moment after which a missing report is a timeout
    timeout_at: i64,
    now: i64,
}

impl<'a> ReportedOutcome<'a> {
    pub fn new(report: Option<&'a OutcomeReport>, config: &Config, deadline: i64, now: i64) -> Self {
        Self {
            report,
            oracle: config.oracle,
            timeout_at: deadline.saturating_add(config.oracle_timeout),
            now,
        }
    }
}

impl OutcomeOracle for ReportedOutcome<'_> {
    fn fetch_outcome(&self, event_id: u64) -> Result<bool> {
        let Some(report) = self.report else {
            if self.now >= self.timeout_at {
                return err!(EscrowError::OracleTimeout);
            }
            return err!(EscrowError::OracleUnavailable);
        };

        require!(report.event_id == event_id, EscrowError::ReportMismatch);
        require_keys_eq!(report.reporter, self.oracle, EscrowError::Unauthorized);

        Ok(report.outcome)
    }
}
