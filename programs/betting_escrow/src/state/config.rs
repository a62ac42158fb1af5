//! Global Escrow Configuration
//!
//! Deployment-time settings shared by every event. Nothing here changes
//! after `initialize`; the oracle identity in particular is fixed for the
//! lifetime of the program.

use anchor_lang::prelude::*;

/// Global configuration account (singleton PDA)
///
/// Seeds: ["config"]
#[account]
#[derive(InitSpace)]
pub struct Config {
    /// Deployer of the escrow (informational only, holds no privileges)
    pub admin: Pubkey,

    /// Oracle authority whose reports settle events
    pub oracle: Pubkey,

    /// Collateral token mint every event is denominated in
    pub collateral_mint: Pubkey,

    /// Seconds after an event deadline before a missing report counts as a timeout
    pub oracle_timeout: i64,

    /// Total events created
    pub event_count: u64,

    /// PDA bump seed
    pub bump: u8,
}

impl Config {
    pub const SEED: &'static [u8] = b"config";

    /// One hour, used when `initialize` is given a zero timeout
    pub const DEFAULT_ORACLE_TIMEOUT: i64 = 60 * 60;
}
