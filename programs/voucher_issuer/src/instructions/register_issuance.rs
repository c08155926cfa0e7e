use crate::constants::*;
use crate::error::*;
use crate::event::*;
use crate::state::*;
use crate::utils::{issuance_seed, transfer_token};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Registration parameters chosen by the creator
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq)]
pub struct IssuanceParams {
    pub name: String,
    pub total_code_count: u64,
    pub claim_amount_per_code: u64,
    pub claim_frequency: u32,
    pub total_issued_amount: u64,
    pub start_time: i64,
    pub end_time: i64,
    pub merkle_root: [u8; 32],
    pub single_code: bool,
}

/**
 * Account context for registering a new issuance
 *
 * - Creates the issuance PDA keyed by the caller-chosen identifier
 * - Creates the claimed amount ledger and the escrow vault for it
 * - Appends the issuance to the per-token index
 * - Escrows total_issued_amount from the creator into the vault
 *
 * The issuance, ledger, vault and index head use init_if_needed so that a
 * second registration of an existing id reaches the handler and fails with
 * DuplicateIssuance instead of a runtime allocation error. Ids enter the
 * issuance address hashed, so overlong ids also reach the handler.
 *
 * Access Control: anyone can register; the signer becomes the creator
 */
#[event_cpi]
#[derive(Accounts)]
#[instruction(issuance_id: String)]
pub struct RegisterIssuance<'info> {
    /// The issuance record (PDA)
    /// - Derived from: ["issuance", sha256(issuance_id)]
    #[account(
        init_if_needed,
        payer = creator,
        space = Issuance::LEN,
        seeds = [ISSUANCE_SEED.as_bytes(), issuance_seed(&issuance_id).as_ref()],
        bump
    )]
    pub issuance: Box<Account<'info, Issuance>>,

    /// Claimed amount accumulator (PDA)
    /// - Derived from: ["ledger", issuance_key]
    #[account(
        init_if_needed,
        payer = creator,
        space = IssuanceLedger::LEN,
        seeds = [LEDGER_SEED.as_bytes(), issuance.key().as_ref()],
        bump
    )]
    pub ledger: Box<Account<'info, IssuanceLedger>>,

    /// Escrow vault (PDA) owned by the issuance
    /// - Derived from: ["vault", issuance_key, token_mint]
    /// - The mint is part of the address, so registering a taken id with
    ///   another mint still reaches the handler's duplicate check
    #[account(
        init_if_needed,
        token::mint = token_mint,
        token::authority = issuance,
        token::token_program = token_program,
        seeds = [VAULT_SEED.as_bytes(), issuance.key().as_ref(), token_mint.key().as_ref()],
        bump,
        payer = creator,
    )]
    pub token_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Per-token index head (PDA)
    /// - Derived from: ["token_index", token_mint]
    #[account(
        init_if_needed,
        payer = creator,
        space = TokenIndex::LEN,
        seeds = [TOKEN_INDEX_SEED.as_bytes(), token_mint.key().as_ref()],
        bump
    )]
    pub token_index: Box<Account<'info, TokenIndex>>,

    /// Next slot of the per-token index (PDA)
    /// - Derived from: ["index_entry", token_mint, token_index.count]
    #[account(
        init,
        payer = creator,
        space = IndexEntry::LEN,
        seeds = [
            INDEX_ENTRY_SEED.as_bytes(),
            token_mint.key().as_ref(),
            token_index.count.to_le_bytes().as_ref()
        ],
        bump
    )]
    pub index_entry: Box<Account<'info, IndexEntry>>,

    /// The token mint paid out by the issuance
    #[account(
        mint::token_program = token_program,
    )]
    pub token_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Creator's token account funding the escrow
    #[account(
        mut,
        token::mint = token_mint,
        token::authority = creator,
        token::token_program = token_program,
    )]
    pub creator_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// The creator of the issuance
    #[account(mut)]
    pub creator: Signer<'info>,

    pub system_program: Program<'info, System>,

    /// Token program (supports both SPL Token and Token 2022)
    pub token_program: Interface<'info, TokenInterface>,
}

/// Validates registration parameters in their reporting order
///
/// The first three checks are ordered: window, uniqueness, commitment. A
/// request that is wrong in several ways always reports the earliest one.
pub fn validate_registration(
    issuance_id: &str,
    params: &IssuanceParams,
    already_registered: bool,
) -> Result<()> {
    require!(
        params.end_time > params.start_time,
        VoucherError::InvalidTimeWindow
    );
    require!(!already_registered, VoucherError::DuplicateIssuance);
    require!(
        params.merkle_root != [0; 32],
        VoucherError::InvalidCommitment
    );

    require!(
        !issuance_id.is_empty()
            && issuance_id.len() <= MAX_ISSUANCE_ID_LEN as usize
            && params.name.len() <= MAX_NAME_LEN as usize,
        VoucherError::InvalidIdentifier
    );
    require!(
        params.total_issued_amount > 0
            && params.claim_amount_per_code > 0
            && params.claim_frequency > 0,
        VoucherError::InvalidAmount
    );

    Ok(())
}

/// Addresses and runtime values recorded next to the creator's parameters
pub struct IssuanceAccounts {
    pub bump: u8,
    pub creator: Pubkey,
    pub token_mint: Pubkey,
    pub token_vault: Pubkey,
    pub registered_at: i64,
}

/// Builds the stored record; parameters are kept verbatim
pub fn build_issuance(
    issuance_id: String,
    params: IssuanceParams,
    accounts: IssuanceAccounts,
) -> Issuance {
    Issuance {
        bump: accounts.bump,
        creator: accounts.creator,
        token_mint: accounts.token_mint,
        token_vault: accounts.token_vault,
        issuance_id,
        name: params.name,
        total_code_count: params.total_code_count,
        claim_amount_per_code: params.claim_amount_per_code,
        claim_frequency: params.claim_frequency,
        total_issued_amount: params.total_issued_amount,
        start_time: params.start_time,
        end_time: params.end_time,
        merkle_root: params.merkle_root,
        single_code: params.single_code,
        registered_at: accounts.registered_at,
    }
}

/**
 * Registers an issuance and escrows its funding
 *
 * @param ctx - The account context containing all required accounts
 * @param issuance_id - Caller-chosen identifier, unique for the program's lifetime
 * @param params - Window, amounts and merkle commitment of the issuance
 *
 * @returns the registered identifier
 */
pub fn handle_register_issuance(
    ctx: Context<RegisterIssuance>,
    issuance_id: String,
    params: IssuanceParams,
) -> Result<String> {
    // ===== VALIDATION PHASE =====

    validate_registration(&issuance_id, &params, ctx.accounts.issuance.is_registered())?;

    let registered_at = Clock::get()?.unix_timestamp;
    let issuance_key = ctx.accounts.issuance.key();
    let token_mint_key = ctx.accounts.token_mint.key();
    let total_issued_amount = params.total_issued_amount;

    // ===== EFFECTS PHASE (State Updates) =====

    let record = build_issuance(
        issuance_id,
        params,
        IssuanceAccounts {
            bump: ctx.bumps.issuance,
            creator: ctx.accounts.creator.key(),
            token_mint: token_mint_key,
            token_vault: ctx.accounts.token_vault.key(),
            registered_at,
        },
    );
    ctx.accounts.issuance.set_inner(record.clone());

    let ledger = &mut ctx.accounts.ledger;
    ledger.issuance = issuance_key;
    ledger.claimed_amount = 0;
    ledger.claim_count = 0;
    ledger.bump = ctx.bumps.ledger;

    let token_index = &mut ctx.accounts.token_index;
    if token_index.token_mint == Pubkey::default() {
        token_index.token_mint = token_mint_key;
        token_index.bump = ctx.bumps.token_index;
    }
    let index_position = token_index.count;
    token_index.count = index_position
        .checked_add(1)
        .ok_or(VoucherError::ArithmeticOverflow)?;

    let index_entry = &mut ctx.accounts.index_entry;
    index_entry.token_mint = token_mint_key;
    index_entry.position = index_position;
    index_entry.issuance = issuance_key;
    index_entry.issuance_id = record.issuance_id.clone();
    index_entry.bump = ctx.bumps.index_entry;

    // ===== INTERACTIONS PHASE (Escrow Debit) =====

    transfer_token(
        ctx.accounts.creator.to_account_info(),
        ctx.accounts.creator_token_account.to_account_info(),
        ctx.accounts.token_vault.to_account_info(),
        ctx.accounts.token_mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        total_issued_amount,
        ctx.accounts.token_mint.decimals,
        None,
    )?;

    let confirmed_id = record.issuance_id.clone();
    emit_cpi!(IssuanceRegistered {
        issuance: issuance_key,
        issuance_id: record.issuance_id,
        name: record.name,
        creator: record.creator,
        token_mint: record.token_mint,
        token_vault: record.token_vault,
        total_code_count: record.total_code_count,
        claim_amount_per_code: record.claim_amount_per_code,
        claim_frequency: record.claim_frequency,
        total_issued_amount: record.total_issued_amount,
        start_time: record.start_time,
        end_time: record.end_time,
        merkle_root: record.merkle_root,
        single_code: record.single_code,
        index_position,
    });

    Ok(confirmed_id)
}
