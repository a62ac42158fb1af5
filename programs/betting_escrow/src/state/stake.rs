//! Participant Stake State

use anchor_lang::prelude::*;

use super::Side;
use crate::errors::EscrowError;

/// One participant's deposit on one side of one event
///
/// Seeds: ["stake", event_id.to_le_bytes(), participant, side.seed()]
///
/// Stakes are never closed. `claimed` is the only field that changes after
/// the event leaves `Open`, so the account doubles as the audit record.
#[account]
#[derive(InitSpace, Debug, Default, PartialEq, Eq)]
pub struct Stake {
    pub event_id: u64,
    pub participant: Pubkey,
    pub side: Side,
    /// Accumulated deposit, only ever increased
    pub amount: u64,
    /// Set once the stake has been paid out
    pub claimed: bool,
    /// Unix timestamp of the first deposit
    pub placed_at: i64,
    pub bump: u8,
}

impl Stake {
    pub const SEED: &'static [u8] = b"stake";

    /// Freshly allocated account that has never received a deposit
    pub fn is_vacant(&self) -> bool {
        self.amount == 0 && self.participant == Pubkey::default()
    }

    /// Program address of the `(event_id, participant, side)` stake record
    pub fn address(event_id: u64, participant: &Pubkey, side: Side) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[
                Self::SEED,
                event_id.to_le_bytes().as_ref(),
                participant.as_ref(),
                &[side.seed()],
            ],
            &crate::ID,
        )
    }

    /// Read the `(event_id, participant, side)` stake from `info`.
    ///
    /// `info` must sit at [`Stake::address`]. An address that was never
    /// staked on holds no data and yields `None`.
    pub fn load(info: &AccountInfo, event_id: u64, participant: &Pubkey, side: Side) -> Result<Option<Self>> {
        let (expected, _) = Self::address(event_id, participant, side);
        require_keys_eq!(info.key(), expected, EscrowError::StakeMismatch);

        if info.data_is_empty() {
            return Ok(None);
        }
        require_keys_eq!(*info.owner, crate::ID, EscrowError::ForeignStake);

        let data = info.try_borrow_data()?;
        Ok(Some(Self::try_deserialize(&mut &data[..])?))
    }

    /// Write this record back into its account
    pub fn store(&self, info: &AccountInfo) -> Result<()> {
        let mut data = info.try_borrow_mut_data()?;
        let mut writer: &mut [u8] = &mut data[..];
        self.try_serialize(&mut writer)
    }
}
