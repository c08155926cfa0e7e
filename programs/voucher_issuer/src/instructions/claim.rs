use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use crate::state::*;
use crate::error::*;
use crate::utils::{
    hash_code, issuance_seed, load_program_account, store_program_account, transfer_token, verify,
};
use crate::constants::*;
use crate::event::*;

/**
 * Account context for redeeming a voucher code
 *
 * The claimant proves that hash(code) is a leaf of the issuance's merkle
 * tree. On success the claimant's counter, the issuance ledger and the code
 * marker are updated and claim_amount_per_code moves from the vault to the
 * claimant.
 *
 * The issuance, its ledger and its vault are taken unchecked and loaded by
 * the handler, so that an unknown identifier reports IssuanceNotFound rather
 * than an account deserialization error.
 *
 * Access Control: Any signer holding a code committed in the merkle root
 */
#[event_cpi]
#[derive(Accounts)]
#[instruction(issuance_id: String, code: String)]
pub struct Claim<'info> {
    /// The issuance record
    /// CHECK: PDA address enforced by seeds, contents loaded in the handler
    #[account(
        seeds = [ISSUANCE_SEED.as_bytes(), issuance_seed(&issuance_id).as_ref()],
        bump
    )]
    pub issuance: UncheckedAccount<'info>,

    /// Claimed amount accumulator of the issuance
    /// - Written by every claim, which serializes claims per issuance
    /// CHECK: PDA address enforced by seeds, contents loaded and stored in the handler
    #[account(
        mut,
        seeds = [LEDGER_SEED.as_bytes(), issuance.key().as_ref()],
        bump
    )]
    pub ledger: UncheckedAccount<'info>,

    /// Claim counter for this claimant
    /// - Derived from: ["claim", issuance_key, claimant_key]
    #[account(
        init_if_needed,
        payer = claimant,
        space = ClaimCounter::LEN,
        seeds = [CLAIM_SEED.as_bytes(), issuance.key().as_ref(), claimant.key().as_ref()],
        bump
    )]
    pub claim_counter: Account<'info, ClaimCounter>,

    /// Redemption marker for the presented code
    /// - Derived from: ["used_code", issuance_key, sha256(code)]
    #[account(
        init_if_needed,
        payer = claimant,
        space = UsedCode::LEN,
        seeds = [USED_CODE_SEED.as_bytes(), issuance.key().as_ref(), hash_code(&code).as_ref()],
        bump
    )]
    pub used_code: Account<'info, UsedCode>,

    /// Escrow vault of the issuance
    /// - Derived from: ["vault", issuance_key, token_mint]
    /// CHECK: PDA address enforced by seeds, token state loaded in the handler
    #[account(
        mut,
        seeds = [VAULT_SEED.as_bytes(), issuance.key().as_ref(), token_mint.key().as_ref()],
        bump
    )]
    pub token_vault: UncheckedAccount<'info>,

    /// Claimant's token account to receive the reward
    #[account(
        mut,
        token::authority = claimant,
        token::token_program = token_program,
    )]
    pub claimant_token_account: InterfaceAccount<'info, TokenAccount>,

    /// The token mint, checked against the issuance in the handler
    #[account(
        mint::token_program = token_program,
    )]
    pub token_mint: InterfaceAccount<'info, Mint>,

    #[account(mut)]
    pub claimant: Signer<'info>,

    pub system_program: Program<'info, System>,

    /// Token program (supports both SPL Token and Token 2022)
    pub token_program: Interface<'info, TokenInterface>,
}

/// Everything a claim is checked against, read once before any write
pub struct ClaimSnapshot<'a> {
    pub issuance: &'a Issuance,
    pub ledger: &'a IssuanceLedger,
    pub counter: &'a ClaimCounter,
    pub used_code: &'a UsedCode,
    pub vault_balance: u64,
    pub now: i64,
}

/// Runs the claim checks in order and returns on the first failure
///
/// 1. window (strict on both ends)
/// 2. per-user quota
/// 3. issuance cap
/// 4. merkle membership of hash(code)
/// 5. code not yet redeemed, unless the issuance uses a single shared code
/// 6. escrow covers the reward
///
/// The lookup of the issuance itself precedes these and happens where the
/// account is loaded.
pub fn check_claim(snapshot: &ClaimSnapshot, code: &str, proof: &[[u8; 32]]) -> Result<()> {
    let issuance = snapshot.issuance;

    require!(issuance.is_active(snapshot.now), VoucherError::IssuanceNotActive);

    snapshot.counter.ensure_quota(issuance)?;
    snapshot.ledger.ensure_capacity(issuance)?;

    require!(!code.is_empty(), VoucherError::InvalidCode);
    require!(
        verify(proof, issuance.merkle_root, hash_code(code)),
        VoucherError::InvalidProof
    );

    if !issuance.single_code {
        snapshot.used_code.ensure_unused()?;
    }

    require!(
        snapshot.vault_balance >= issuance.claim_amount_per_code,
        VoucherError::InsufficientFunds
    );

    Ok(())
}

/// Applies a checked claim to the ledger accounts and returns the new total
///
/// All new values are computed before any of them is written, so an error
/// leaves the three accounts as they were.
pub fn apply_claim(
    issuance: &Issuance,
    issuance_key: Pubkey,
    claimant: Pubkey,
    ledger: &mut IssuanceLedger,
    counter: &mut ClaimCounter,
    used_code: &mut UsedCode,
    now: i64,
) -> Result<u64> {
    let mut next_ledger = ledger.clone();
    let total_claimed = next_ledger.record_claim(issuance)?;

    let mut next_counter = counter.clone();
    next_counter.issuance = issuance_key;
    next_counter.claimant = claimant;
    next_counter.increment()?;

    *ledger = next_ledger;
    *counter = next_counter;
    if !issuance.single_code {
        used_code.mark_redeemed(issuance_key, claimant, now);
    }

    Ok(total_claimed)
}

/**
 * Redeems a voucher code
 *
 * @param ctx - The account context containing all required accounts
 * @param issuance_id - Identifier of the issuance to claim from
 * @param code - The secret voucher code
 * @param proof - Sibling hashes from hash(code) up to the merkle root
 */
pub fn handle_claim(
    ctx: Context<Claim>,
    issuance_id: String,
    code: String,
    proof: Vec<[u8; 32]>,
) -> Result<()> {
    // ===== LOAD PHASE =====

    let issuance: Issuance =
        load_program_account(&ctx.accounts.issuance, VoucherError::IssuanceNotFound)?;
    let mut ledger: IssuanceLedger =
        load_program_account(&ctx.accounts.ledger, VoucherError::LedgerCorrupted)?;
    let issuance_key = ctx.accounts.issuance.key();
    require_keys_eq!(ledger.issuance, issuance_key, VoucherError::LedgerCorrupted);

    require_keys_eq!(
        ctx.accounts.token_mint.key(),
        issuance.token_mint,
        VoucherError::TokenMintMismatch
    );
    require_keys_eq!(
        ctx.accounts.claimant_token_account.mint,
        issuance.token_mint,
        VoucherError::TokenMintMismatch
    );
    let vault_balance = load_vault_balance(
        &ctx.accounts.token_vault,
        &ctx.accounts.token_program.key(),
        &issuance,
    )?;

    // ===== VALIDATION PHASE =====

    let now = Clock::get()?.unix_timestamp;
    check_claim(
        &ClaimSnapshot {
            issuance: &issuance,
            ledger: &ledger,
            counter: &ctx.accounts.claim_counter,
            used_code: &ctx.accounts.used_code,
            vault_balance,
            now,
        },
        &code,
        &proof,
    )?;

    // ===== EFFECTS PHASE (State Updates) =====

    let claimant_key = ctx.accounts.claimant.key();
    let total_claimed = apply_claim(
        &issuance,
        issuance_key,
        claimant_key,
        &mut ledger,
        &mut ctx.accounts.claim_counter,
        &mut ctx.accounts.used_code,
        now,
    )?;
    ctx.accounts.claim_counter.bump = ctx.bumps.claim_counter;
    if !issuance.single_code {
        ctx.accounts.used_code.bump = ctx.bumps.used_code;
    }

    // ===== INTERACTIONS PHASE (Token Transfer) =====

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
        ctx.accounts.claimant_token_account.to_account_info(),
        ctx.accounts.token_mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        issuance.claim_amount_per_code,
        ctx.accounts.token_mint.decimals,
        Some(signer),
    )?;

    // Written once the transfer went through, together with the counter and
    // code marker that Anchor persists on exit
    store_program_account(&ledger, &ctx.accounts.ledger)?;

    emit_cpi!(VoucherClaimed {
        issuance: issuance_key,
        issuance_id,
        code,
        claimant: claimant_key,
        amount: issuance.claim_amount_per_code,
        total_claimed,
        remaining: ledger.remaining(&issuance),
    });

    Ok(())
}

/// Reads the escrow balance, rejecting a vault that isn't the issuance's
fn load_vault_balance(
    vault: &AccountInfo,
    token_program: &Pubkey,
    issuance: &Issuance,
) -> Result<u64> {
    require_keys_eq!(*vault.key, issuance.token_vault, VoucherError::InvalidVault);
    require!(
        !vault.data_is_empty() && vault.owner == token_program,
        VoucherError::InvalidVault
    );

    let data = vault.try_borrow_data()?;
    let vault_state = TokenAccount::try_deserialize(&mut data.as_ref())?;
    require_keys_eq!(vault_state.mint, issuance.token_mint, VoucherError::InvalidVault);

    Ok(vault_state.amount)
}
