//! Event Creation
//!
//! Anyone can open an event by choosing an unused id and a future deadline.
//! The event PDA owns an associated token vault for the collateral mint;
//! every stake is deposited there and every claim is paid from it.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::errors::EscrowError;
use crate::state::{Config, PredictionEvent};

/// Event emitted when a new event is opened
#[event]
pub struct EventCreated {
    pub event_id: u64,
    pub creator: Pubkey,
    pub deadline: i64,
}

/// Accounts for opening a new event
#[derive(Accounts)]
#[instruction(id: u64)]
pub struct CreateEvent<'info> {
    /// Event creator (pays for the event and vault accounts)
    #[account(mut)]
    pub creator: Signer<'info>,

    /// Global configuration
    #[account(
        mut,
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    /// The event account. Allocated if needed so an existing id is reported
    /// as `DuplicateEvent` rather than as an allocation failure.
    #[account(
        init_if_needed,
        payer = creator,
        space = 8 + PredictionEvent::INIT_SPACE,
        seeds = [PredictionEvent::SEED, id.to_le_bytes().as_ref()],
        bump,
    )]
    pub event: Account<'info, PredictionEvent>,

    /// Collateral token mint
    #[account(
        constraint = collateral_mint.key() == config.collateral_mint,
    )]
    pub collateral_mint: InterfaceAccount<'info, Mint>,

    /// Event collateral vault
    #[account(
        init_if_needed,
        payer = creator,
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

impl<'info> CreateEvent<'info> {
    pub fn create_event(&mut self, id: u64, deadline: i64, bumps: &CreateEventBumps) -> Result<()> {
        require!(!self.event.exists(), EscrowError::DuplicateEvent);

        let clock = Clock::get()?;

        self.event.set_inner(PredictionEvent::open(
            id,
            self.creator.key(),
            self.collateral_mint.key(),
            deadline,
            clock.unix_timestamp,
            bumps.event,
        )?);

        self.config.event_count = self
            .config
            .event_count
            .checked_add(1)
            .ok_or(EscrowError::MathOverflow)?;

        emit!(EventCreated {
            event_id: id,
            creator: self.creator.key(),
            deadline,
        });

        msg!("Event {} open until {}", id, deadline);

        Ok(())
    }
}
