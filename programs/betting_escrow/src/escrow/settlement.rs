//! # Settlement Engine
//!
//! Computes what a participant is owed once an event is terminal and marks
//! the paid stakes so they can never be paid again.
//!
//! ## Payout
//!
//! ```text
//! Resolved:  payout = floor(amount * total_pool / winning_pool)   (winning side only)
//! Refunded:  payout = amount                                        (every stake)
//! ```
//!
//! For example, with 100 on YES and 300 on NO and YES winning, the YES
//! staker receives `floor(100 * 400 / 100) = 400`.
//!
//! ## Dust
//!
//! Flooring leaves at most `winning_pool - 1` minor units in the vault after
//! every winner has claimed. That remainder is not distributed.
//!
//! ## Ordering
//!
//! [`settle`] marks stakes claimed and books `paid_out` before returning.
//! The caller transfers funds only afterwards, so a re-entrant claim sees
//! `claimed = true` and fails with `NothingToClaim`.

use anchor_lang::prelude::*;

use crate::errors::EscrowError;
use crate::state::{EventState, PredictionEvent, Stake};

/// `floor(amount * total_pool / winning_pool)`, computed in 128 bits
pub fn winning_payout(amount: u64, winning_pool: u64, total_pool: u64) -> Result<u64> {
    require!(winning_pool > 0, EscrowError::MathOverflow);
    require!(amount <= winning_pool, EscrowError::PoolExhausted);

    let payout = (amount as u128)
        .checked_mul(total_pool as u128)
        .ok_or(EscrowError::MathOverflow)?
        .checked_div(winning_pool as u128)
        .ok_or(EscrowError::MathOverflow)?;

    Ok(u64::try_from(payout).map_err(|_| EscrowError::MathOverflow)?)
}

/// What `stake` would receive now, or `None` if it is not payable
pub fn stake_payout(event: &PredictionEvent, stake: &Stake) -> Result<Option<u64>> {
    if stake.claimed || stake.amount == 0 {
        return Ok(None);
    }

    match event.state {
        EventState::Refunded => Ok(Some(stake.amount)),
        EventState::Resolved => {
            let Some(winner) = event.outcome.winning_side() else {
                return err!(EscrowError::NotResolved);
            };
            if stake.side != winner {
                return Ok(None);
            }
            let pool = event.pool();
            winning_payout(stake.amount, pool.on(winner), pool.total()?).map(Some)
        }
        EventState::Open | EventState::AwaitingResolution => err!(EscrowError::NotResolved),
    }
}

/// Settle every payable stake `participant` holds on `event`.
///
/// `stakes` holds the participant's records for this event, at most one per
/// side. On success all paid stakes are marked claimed, `paid_out` grows by
/// the returned amount, and the caller must then transfer exactly that
/// amount. On error nothing is modified.
pub fn settle(event: &mut PredictionEvent, participant: &Pubkey, stakes: &mut [&mut Stake]) -> Result<u64> {
    require!(event.state.is_terminal(), EscrowError::NotResolved);

    let mut total: u64 = 0;
    let mut payable = [false; 2];
    let mut seen_sides = [false; 2];

    for (i, stake) in stakes.iter().enumerate() {
        require!(
            stake.event_id == event.id && stake.participant == *participant,
            EscrowError::StakeMismatch
        );
        let side = stake.side.seed() as usize;
        require!(!seen_sides[side], EscrowError::DuplicateStake);
        seen_sides[side] = true;

        if let Some(amount) = stake_payout(event, stake)? {
            total = total.checked_add(amount).ok_or(EscrowError::MathOverflow)?;
            payable[i] = true;
        }
    }

    require!(payable.iter().any(|p| *p), EscrowError::NothingToClaim);

    let paid_out = event
        .paid_out
        .checked_add(total)
        .ok_or(EscrowError::MathOverflow)?;
    require!(paid_out <= event.total_pool()?, EscrowError::PoolExhausted);

    let mut settled: u32 = 0;
    for (i, stake) in stakes.iter_mut().enumerate() {
        if payable[i] {
            stake.claimed = true;
            settled += 1;
        }
    }

    event.paid_out = paid_out;
    event.claim_count = event.claim_count.saturating_add(settled);

    Ok(total)
}

// ============================================================================
// TESTS
// ============================================================================
