use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use crate::state::*;
use crate::error::*;
use crate::constants::*;
use crate::utils::{issuance_seed, transfer_token};
use crate::event::*;

/**
 * Account context for withdrawing unclaimed escrow
 *
 * Returns whatever is left in the vault to the creator once the claim window
 * has closed. Unlike a distributor teardown, the issuance, its ledger and its
 * vault stay open: the issuance catalog is append-only and lookups by id must
 * keep working after the campaign ends.
 *
 * Access Control: Only the issuance creator
 */
#[event_cpi]
#[derive(Accounts)]
pub struct Withdraw<'info> {
    /// The issuance being drained
    #[account(
        constraint = creator.key() == issuance.creator @ VoucherError::OnlyCreator
    )]
    pub issuance: Box<Account<'info, Issuance>>,

    /// Token vault holding the remaining escrow
    /// - Derived from: ["vault", issuance_key, token_mint]
    #[account(
        mut,
        seeds = [VAULT_SEED.as_bytes(), issuance.key().as_ref(), token_mint.key().as_ref()],
        bump
    )]
    pub token_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Creator's token account to receive the remaining tokens
    #[account(
        mut,
        token::mint = issuance.token_mint,
        token::authority = creator,
        token::token_program = token_program,
    )]
    pub creator_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// The token mint for transfer_checked
    #[account(
        mint::token_program = token_program,
        constraint = token_mint.key() == issuance.token_mint @ VoucherError::TokenMintMismatch
    )]
    pub token_mint: Box<InterfaceAccount<'info, Mint>>,

    pub creator: Signer<'info>,

    /// Token program (supports both SPL Token and Token 2022)
    pub token_program: Interface<'info, TokenInterface>,
}

/**
 * Withdraws the remaining escrow of a closed issuance
 *
 * Validation Rules:
 * - The issuance must be closed (now >= end_time)
 * - An empty vault is not an error; nothing is transferred
 */
pub fn handle_withdraw(ctx: Context<Withdraw>) -> Result<()> {
    let issuance = &ctx.accounts.issuance;

    // ===== VALIDATION PHASE =====

    let current_time = Clock::get()?.unix_timestamp;
    require!(
        issuance.phase(current_time) == IssuancePhase::Closed,
        VoucherError::IssuanceNotClosed
    );

    let remaining_balance = ctx.accounts.token_vault.amount;

    // ===== INTERACTIONS PHASE (Token Transfer) =====

    if remaining_balance > 0 {
        let id_seed = issuance_seed(&issuance.issuance_id);
        let bump = [issuance.bump];
        let seeds = &[
            ISSUANCE_SEED.as_bytes(),
            id_seed.as_ref(),
            bump.as_ref(),
        ];
        let signer = &[&seeds[..]];

        transfer_token(
            ctx.accounts.issuance.to_account_info(),
            ctx.accounts.token_vault.to_account_info(),
            ctx.accounts.creator_token_account.to_account_info(),
            ctx.accounts.token_mint.to_account_info(),
            ctx.accounts.token_program.to_account_info(),
            remaining_balance,
            ctx.accounts.token_mint.decimals,
            Some(signer),
        )?;
    }

    emit_cpi!(EscrowWithdrawn {
        issuance: issuance.key(),
        creator: ctx.accounts.creator.key(),
        amount_withdrawn: remaining_balance,
    });

    Ok(())
}
