//! Oracle Outcome Report
//!
//! The oracle authority writes one report per event once the deadline has
//! passed. Resolution reads it; nothing ever rewrites it.

use anchor_lang::prelude::*;

/// Seeds: ["report", event_id.to_le_bytes()]
#[account]
#[derive(InitSpace, Debug, Default, PartialEq, Eq)]
pub struct OutcomeReport {
    /// Event this report answers
    pub event_id: u64,

    /// `true` if YES happened
    pub outcome: bool,

    /// Oracle that signed the report
    pub reporter: Pubkey,

    /// Unix timestamp of the report
    pub reported_at: i64,

    /// PDA bump seed
    pub bump: u8,
}

impl OutcomeReport {
    pub const SEED: &'static [u8] = b"report";
}
