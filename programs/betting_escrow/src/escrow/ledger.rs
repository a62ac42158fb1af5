//! # Event Ledger Rules
//!
//! Record-level rules for opening events and accepting stakes. Both the
//! on-chain handlers and the in-memory [`Ledger`](super::Ledger) go through
//! these methods, so the checks live in exactly one place.
//!
//! ## Pool accounting
//!
//! ```text
//! pool_yes + pool_no == Σ stake.amount   (for every stake of the event)
//! ```
//!
//! Pools only ever grow. Payouts are tracked in `paid_out` and never
//! subtracted from the pools, so the settlement maths always sees the pool
//! as it stood at resolution.

use anchor_lang::prelude::*;

use crate::errors::EscrowError;
use crate::state::{EventState, Outcome, PredictionEvent, Side, Stake};

/// Per-side pool totals, returned by `get_pool`
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolBalances {
    pub pool_yes: u64,
    pub pool_no: u64,
}

impl PoolBalances {
    pub fn total(&self) -> Result<u64> {
        Ok(self
            .pool_yes
            .checked_add(self.pool_no)
            .ok_or(EscrowError::MathOverflow)?)
    }

    pub fn on(&self, side: Side) -> u64 {
        match side {
            Side::Yes => self.pool_yes,
            Side::No => self.pool_no,
        }
    }

    /// True when at least one side never received a stake
    pub fn is_one_sided(&self) -> bool {
        self.pool_yes == 0 || self.pool_no == 0
    }
}

/// One row of `get_participants`
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParticipantEntry {
    pub participant: Pubkey,
    /// `true` for YES
    pub side: bool,
    pub amount: u64,
}

impl From<&Stake> for ParticipantEntry {
    fn from(stake: &Stake) -> Self {
        Self {
            participant: stake.participant,
            side: stake.side.is_yes(),
            amount: stake.amount,
        }
    }
}

impl PredictionEvent {
    /// Build a fresh `Open` event with empty pools
    pub fn open(
        id: u64,
        creator: Pubkey,
        collateral_mint: Pubkey,
        deadline: i64,
        now: i64,
        bump: u8,
    ) -> Result<Self> {
        require!(deadline > now, EscrowError::InvalidDeadline);

        Ok(Self {
            id,
            creator,
            collateral_mint,
            deadline,
            created_at: now,
            state: EventState::Open,
            outcome: Outcome::Undetermined,
            bump,
            ..Default::default()
        })
    }

    /// Whether this record has ever been opened
    pub fn exists(&self) -> bool {
        self.created_at != 0
    }

    pub fn accepts_stakes(&self, now: i64) -> bool {
        self.state == EventState::Open && now < self.deadline
    }

    pub fn pool(&self) -> PoolBalances {
        PoolBalances {
            pool_yes: self.pool_yes,
            pool_no: self.pool_no,
        }
    }

    pub fn total_pool(&self) -> Result<u64> {
        self.pool().total()
    }

    /// The latched outcome, `true` for YES
    pub fn outcome(&self) -> Result<bool> {
        require!(self.state == EventState::Resolved, EscrowError::NotResolved);
        match self.outcome.winning_side() {
            Some(side) => Ok(side.is_yes()),
            None => err!(EscrowError::NotResolved),
        }
    }

    /// Add `amount` to the `(participant, side)` stake and the matching pool.
    ///
    /// `stake` is either vacant (first deposit) or the existing record for
    /// exactly this participant and side. Deposits accumulate. Nothing is
    /// written unless every check passes. Returns the stake's new amount.
    pub fn record_stake(
        &mut self,
        stake: &mut Stake,
        participant: Pubkey,
        side: Side,
        amount: u64,
        now: i64,
    ) -> Result<u64> {
        require!(self.accepts_stakes(now), EscrowError::EventClosed);
        require!(amount > 0, EscrowError::ZeroAmount);

        let vacant = stake.is_vacant();
        if !vacant {
            require!(
                stake.event_id == self.id && stake.participant == participant && stake.side == side,
                EscrowError::StakeMismatch
            );
        }

        let new_amount = stake
            .amount
            .checked_add(amount)
            .ok_or(EscrowError::MathOverflow)?;

        let (pool_yes, pool_no) = match side {
            Side::Yes => (
                self.pool_yes
                    .checked_add(amount)
                    .ok_or(EscrowError::MathOverflow)?,
                self.pool_no,
            ),
            Side::No => (
                self.pool_yes,
                self.pool_no
                    .checked_add(amount)
                    .ok_or(EscrowError::MathOverflow)?,
            ),
        };
        // the combined pool must stay representable for settlement
        pool_yes
            .checked_add(pool_no)
            .ok_or(EscrowError::MathOverflow)?;

        let stake_count = if vacant {
            self.stake_count
                .checked_add(1)
                .ok_or(EscrowError::MathOverflow)?
        } else {
            self.stake_count
        };

        if vacant {
            stake.event_id = self.id;
            stake.participant = participant;
            stake.side = side;
            stake.placed_at = now;
        }
        stake.amount = new_amount;

        self.pool_yes = pool_yes;
        self.pool_no = pool_no;
        self.stake_count = stake_count;

        Ok(new_amount)
    }
}
