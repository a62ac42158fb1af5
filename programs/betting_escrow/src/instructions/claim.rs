//! Claiming
//!
//! After resolution a participant collects what their stakes earned, in a
//! single call covering both sides.
//!
//! ## Payout Calculation
//!
//! ```text
//! payout = floor(stake * total_pool / winning_pool)    (Resolved, winning side)
//! payout = stake                                        (Refunded, any side)
//! ```
//!
//! For example:
//! - Alice stakes 100 on YES, Bob stakes 300 on NO
//! - Oracle reports YES
//! - Alice receives 100 * 400 / 100 = 400, Bob receives nothing
//!
//! Both stake addresses are always passed, staked on or not, so one call
//! sees every stake the participant holds and a claim can never be split
//! across calls. Stakes are marked claimed and written back to their
//! accounts before the vault transfer is issued.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked},
};

use crate::escrow::settle;
use crate::state::{EventState, PredictionEvent, Side, Stake};

/// Settle the participant's YES and NO stake accounts together and persist
/// the claimed flags. Returns the amount the vault now owes.
pub fn settle_stake_accounts<'info>(
    event: &mut PredictionEvent,
    participant: &Pubkey,
    stake_yes: &AccountInfo<'info>,
    stake_no: &AccountInfo<'info>,
) -> Result<u64> {
    let mut held = Vec::with_capacity(2);
    for (info, side) in [(stake_yes, Side::Yes), (stake_no, Side::No)] {
        if let Some(stake) = Stake::load(info, event.id, participant, side)? {
            held.push((info, stake));
        }
    }

    let amount = {
        let mut stakes: Vec<&mut Stake> = held.iter_mut().map(|(_, stake)| stake).collect();
        settle(event, participant, &mut stakes)?
    };

    for (info, stake) in &held {
        stake.store(info)?;
    }

    Ok(amount)
}

/// Event emitted when a participant is paid
#[event]
pub struct WinningsClaimed {
    pub event_id: u64,
    pub participant: Pubkey,
    pub amount: u64,
    pub refund: bool,
    pub paid_out: u64,
}

/// Accounts for claiming
#[derive(Accounts)]
#[instruction(event_id: u64)]
pub struct Claim<'info> {
    /// Participant being paid
    #[account(mut)]
    pub participant: Signer<'info>,

    /// Resolved or refunded event
    #[account(
        mut,
        seeds = [PredictionEvent::SEED, event_id.to_le_bytes().as_ref()],
        bump = event.bump,
    )]
    pub event: Box<Account<'info, PredictionEvent>>,

    /// CHECK: The participant's YES stake address, possibly never created.
    /// Verified against `Stake::address` before it is read.
    #[account(mut)]
    pub stake_yes: UncheckedAccount<'info>,

    /// CHECK: The participant's NO stake address, possibly never created.
    /// Verified against `Stake::address` before it is read.
    #[account(mut)]
    pub stake_no: UncheckedAccount<'info>,

    /// Collateral mint
    #[account(
        constraint = collateral_mint.key() == event.collateral_mint,
    )]
    pub collateral_mint: InterfaceAccount<'info, Mint>,

    /// Participant's collateral account
    #[account(
        init_if_needed,
        payer = participant,
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

impl<'info> Claim<'info> {
    pub fn claim(&mut self) -> Result<u64> {
        let participant = self.participant.key();

        // Stakes are written back with their claimed flags before funds move
        let amount = settle_stake_accounts(&mut self.event, &participant, &self.stake_yes, &self.stake_no)?;
        self.event.exit(&crate::ID)?;

        let id_bytes = self.event.id.to_le_bytes();
        let event_seeds = &[PredictionEvent::SEED, id_bytes.as_ref(), &[self.event.bump]];
        let event_signer = &[&event_seeds[..]];

        transfer_checked(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.vault.to_account_info(),
                    mint: self.collateral_mint.to_account_info(),
                    to: self.participant_collateral.to_account_info(),
                    authority: self.event.to_account_info(),
                },
                event_signer,
            ),
            amount,
            self.collateral_mint.decimals,
        )?;

        emit!(WinningsClaimed {
            event_id: self.event.id,
            participant,
            amount,
            refund: self.event.state == EventState::Refunded,
            paid_out: self.event.paid_out,
        });

        msg!("Event {}: paid {} to {}", self.event.id, amount, participant);

        Ok(amount)
    }
}
