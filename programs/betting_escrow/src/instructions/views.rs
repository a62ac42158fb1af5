//! Read-only queries
//!
//! These instructions change nothing; their answers travel as return data,
//! so clients usually run them through `simulateTransaction`.

use std::collections::BTreeSet;

use anchor_lang::prelude::*;

use crate::errors::EscrowError;
use crate::escrow::{ParticipantEntry, PoolBalances};
use crate::state::{PredictionEvent, Stake};

/// Accounts for event queries
#[derive(Accounts)]
#[instruction(event_id: u64)]
pub struct ViewEvent<'info> {
    #[account(
        seeds = [PredictionEvent::SEED, event_id.to_le_bytes().as_ref()],
        bump = event.bump,
    )]
    pub event: Account<'info, PredictionEvent>,
}

impl<'info> ViewEvent<'info> {
    pub fn get_pool(&self) -> Result<PoolBalances> {
        Ok(self.event.pool())
    }

    pub fn outcome(&self) -> Result<bool> {
        self.event.outcome()
    }

    /// Rows for the stake accounts passed as remaining accounts.
    ///
    /// This echoes back only the accounts supplied; it does not discover
    /// stakes. Clients find an event's stakes with `getProgramAccounts`
    /// filtered by the `Stake` discriminator and a memcmp on `event_id`
    /// (offset 8), then pass them here. Each account must be a stake of this
    /// event and appear once. Return data is capped at 1 KiB, so large events
    /// are read in several calls with disjoint account lists.
    pub fn get_participants<'a>(&self, stake_accounts: &[AccountInfo<'a>]) -> Result<Vec<ParticipantEntry>> {
        let mut seen = BTreeSet::new();
        let mut rows = Vec::with_capacity(stake_accounts.len());

        for info in stake_accounts {
            require!(seen.insert(info.key()), EscrowError::DuplicateStake);
            require_keys_eq!(*info.owner, crate::ID, EscrowError::ForeignStake);

            let data = info.try_borrow_data()?;
            let stake = Stake::try_deserialize(&mut &data[..])?;
            require!(stake.event_id == self.event.id, EscrowError::ForeignStake);

            rows.push(ParticipantEntry::from(&stake));
        }

        Ok(rows)
    }
}
