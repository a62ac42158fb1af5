//! Escrow Initialization
//!
//! Records the oracle authority and the collateral mint. Called once at
//! deployment; no instruction changes these values afterwards.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::Mint;

use crate::errors::EscrowError;
use crate::state::Config;

/// Event emitted once the escrow is configured
#[event]
pub struct ProtocolInitialized {
    pub admin: Pubkey,
    pub oracle: Pubkey,
    pub collateral_mint: Pubkey,
    pub oracle_timeout: i64,
}

/// Accounts required for escrow initialization
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Deployer (pays for the config account)
    #[account(mut)]
    pub admin: Signer<'info>,

    /// Global configuration account (created)
    #[account(
        init,
        payer = admin,
        space = 8 + Config::INIT_SPACE,
        seeds = [Config::SEED],
        bump,
    )]
    pub config: Account<'info, Config>,

    /// Collateral token mint (e.g., USDC)
    pub collateral_mint: InterfaceAccount<'info, Mint>,

    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> Initialize<'info> {
    /// Initialize the escrow configuration
    pub fn initialize(
        &mut self,
        oracle: Pubkey,
        oracle_timeout: i64,
        bumps: InitializeBumps,
    ) -> Result<()> {
        require!(oracle != Pubkey::default(), EscrowError::InvalidConfig);
        require!(oracle_timeout >= 0, EscrowError::InvalidConfig);
        let oracle_timeout = match oracle_timeout {
            0 => Config::DEFAULT_ORACLE_TIMEOUT,
            secs => secs,
        };

        self.config.set_inner(Config {
            admin: self.admin.key(),
            oracle,
            collateral_mint: self.collateral_mint.key(),
            oracle_timeout,
            event_count: 0,
            bump: bumps.config,
        });

        emit!(ProtocolInitialized {
            admin: self.admin.key(),
            oracle,
            collateral_mint: self.collateral_mint.key(),
            oracle_timeout,
        });

        msg!("Escrow initialized!");
        msg!("Oracle: {}", oracle);
        msg!("Collateral: {}", self.collateral_mint.key());
        msg!("Oracle timeout: {}s", oracle_timeout);

        Ok(())
    }
}
