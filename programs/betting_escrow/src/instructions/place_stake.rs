//! Stake Placement
//!
//! Moves collateral from the participant into the event vault and books it
//! against the `(event, participant, side)` stake. Staking the same side
//! again adds to the existing stake.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked},
};

use crate::state::{Config, PredictionEvent, Side, Stake};

/// Event emitted when a stake is placed or increased
#[event]
pub struct StakePlaced {
    pub event_id: u64,
    pub participant: Pubkey,
    pub is_yes: bool,
    pub amount: u64,
    pub stake_total: u64,
    pub pool_yes: u64,
    pub pool_no: u64,
}

/// Accounts for staking
#[derive(Accounts)]
#[instruction(event_id: u64, yes: bool)]
pub struct PlaceStake<'info> {
    /// Participant paying the stake
    #[account(mut)]
    pub participant: Signer<'info>,

    /// Global configuration
    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    /// Event being staked on
    #[account(
        mut,
        seeds = [PredictionEvent::SEED, event_id.to_le_bytes().as_ref()],
        bump = event.bump,
    )]
    pub event: Account<'info, PredictionEvent>,

    /// The participant's stake on this side
    #[account(
        init_if_needed,
        payer = participant,
        space = 8 + Stake::INIT_SPACE,
        seeds = [
            Stake::SEED,
            event_id.to_le_bytes().as_ref(),
            participant.key().as_ref(),
            &[Side::from(yes).seed()],
        ],
        bump,
    )]
    pub stake: Account<'info, Stake>,

    /// Collateral mint
    #[account(
        constraint = collateral_mint.key() == event.collateral_mint,
    )]
    pub collateral_mint: InterfaceAccount<'info, Mint>,

    /// Participant's collateral account
    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = participant,
        associated_token::token_program = token_program,
    )]
    pub participant_collateral: InterfaceAccount<'info, TokenAccount>,

    /// Event collateral vault
    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = event,
        associated_token::token_program = token_program,
    )]
    pub vault: InterfaceAccount<'info, TokenAccount>,

    /// Token program
    pub token_program: Interface<'info, TokenInterface>,
    /// Associated token program
    pub associated_token_program: Program<'info, AssociatedToken>,
    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> PlaceStake<'info> {
    /// Stake `amount` on YES (`yes = true`) or NO
    pub fn place_stake(&mut self, yes: bool, amount: u64, bumps: &PlaceStakeBumps) -> Result<u64> {
        let clock = Clock::get()?;
        let side = Side::from(yes);
        let vacant = self.stake.is_vacant();

        // Validates and books the stake; nothing moves if this fails
        let stake_total = self.event.record_stake(
            &mut self.stake,
            self.participant.key(),
            side,
            amount,
            clock.unix_timestamp,
        )?;
        if vacant {
            self.stake.bump = bumps.stake;
        }

        transfer_checked(
            CpiContext::new(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.participant_collateral.to_account_info(),
                    mint: self.collateral_mint.to_account_info(),
                    to: self.vault.to_account_info(),
                    authority: self.participant.to_account_info(),
                },
            ),
            amount,
            self.collateral_mint.decimals,
        )?;

        emit!(StakePlaced {
            event_id: self.event.id,
            participant: self.participant.key(),
            is_yes: yes,
            amount,
            stake_total,
            pool_yes: self.event.pool_yes,
            pool_no: self.event.pool_no,
        });

        msg!(
            "Stake on event {}: {} {} (total {})",
            self.event.id,
            amount,
            if yes { "YES" } else { "NO" },
            stake_total
        );

        Ok(stake_total)
    }
}
