//! # Betting Escrow: Peer-to-Peer Prediction Bets
//!
//! Parties lock collateral on YES or NO for a future event. After the
//! deadline an oracle reports what happened, and winners split the whole
//! pool in proportion to their stakes.
//!
//! ## Overview
//!
//! - Anyone opens an event and anyone stakes on it until the deadline.
//! - The configured oracle posts one report per event.
//! - Anyone resolves the event; the outcome is latched exactly once.
//! - Each winner claims once and receives `floor(stake * total / winning_pool)`.
//! - If one side never received a stake, everyone is refunded instead.
//!
//! The settlement rules live in [`escrow`] and are independent of Solana
//! accounts; the instructions below only load accounts and move tokens.

use anchor_lang::prelude::*;

pub mod errors;
pub mod escrow;
pub mod instructions;
pub mod state;

pub use escrow::{ParticipantEntry, PoolBalances, ResolutionStatus};
pub use instructions::*;

// Replace with your deployed program ID
declare_id!("4bQwHvDWe6N4U5u7hGzaAeWGS9Q2xD2mL5Aqa3JzFpEt");

/// Main betting escrow program
#[program]
pub mod betting_escrow {
    use super::*;

    /// Record the oracle authority and the collateral mint
    pub fn initialize(ctx: Context<Initialize>, oracle: Pubkey, oracle_timeout: i64) -> Result<()> {
        ctx.accounts.initialize(oracle, oracle_timeout, ctx.bumps)
    }

    /// Open a new event with a unique id and a future deadline
    pub fn create_event(ctx: Context<CreateEvent>, id: u64, deadline: i64) -> Result<()> {
        ctx.accounts.create_event(id, deadline, &ctx.bumps)
    }

    /// Stake collateral on YES (`yes = true`) or NO; returns the stake's new total
    pub fn place_stake(ctx: Context<PlaceStake>, _event_id: u64, yes: bool, amount: u64) -> Result<u64> {
        ctx.accounts.place_stake(yes, amount, &ctx.bumps)
    }

    /// Report an event's outcome (oracle only)
    pub fn post_outcome(ctx: Context<PostOutcome>, _event_id: u64, yes: bool) -> Result<()> {
        ctx.accounts.post_outcome(yes, &ctx.bumps)
    }

    /// Latch the outcome, refund a one-sided event, or defer until the oracle reports
    pub fn resolve_event(ctx: Context<ResolveEvent>, _event_id: u64) -> Result<ResolutionStatus> {
        ctx.accounts.resolve_event()
    }

    /// Collect winnings or a refund
    pub fn claim(ctx: Context<Claim>, _event_id: u64) -> Result<u64> {
        ctx.accounts.claim()
    }

    /// Current YES/NO pool totals
    pub fn get_pool(ctx: Context<ViewEvent>, _event_id: u64) -> Result<PoolBalances> {
        ctx.accounts.get_pool()
    }

    /// Participants for the stake accounts passed as remaining accounts
    pub fn get_participants(ctx: Context<ViewEvent>, _event_id: u64) -> Result<Vec<ParticipantEntry>> {
        ctx.accounts.get_participants(ctx.remaining_accounts)
    }

    /// Resolved outcome, `true` for YES
    pub fn outcome(ctx: Context<ViewEvent>, _event_id: u64) -> Result<bool> {
        ctx.accounts.outcome()
    }
}
