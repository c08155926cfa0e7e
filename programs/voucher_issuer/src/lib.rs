use anchor_lang::prelude::*;

declare_id!("CncU3YkJwLTDbXdv19ParTcj1tVZ8o7CiNfyopbiSbRt");

pub mod constants;
pub mod error;
pub mod event;
pub mod instructions;
pub mod state;
pub mod utils;

#[cfg(test)]
pub mod test;

use instructions::*;
use state::Issuance;

/**
 * Voucher Issuer Program
 *
 * Issues batches of redeemable vouchers backed by escrowed tokens. Each
 * issuance commits to its set of valid codes with a merkle root over
 * hash(code); a holder redeems a fixed reward by presenting a code and its
 * merkle proof, without the program ever storing the code list.
 *
 * Key Features:
 * - Caller-chosen issuance identifiers, unique for the program's lifetime
 * - Sorted-pair merkle verification of hash(code) leaves
 * - Per-code anti-replay, per-user claim quota and per-issuance cap
 * - Strict time windows (start_time < now < end_time)
 * - Optional single shared code mode without the replay check
 * - Per-token index of issuances
 * - Cross-program call event emission for composability
 * - Support for both SPL Token and Token 2022
 *
 * Architecture:
 * - Issuance PDA: immutable record of one campaign
 * - Ledger PDA: claimed amount accumulator, written by every claim of the issuance
 * - Claim Counter PDAs: successful claims per (issuance, user)
 * - Used Code PDAs: one marker per redeemed (issuance, code)
 * - Token Vault PDA: escrow controlled by the issuance PDA
 * - Token Index PDAs: append-only list of issuances per mint
 *
 * Workflow:
 * 1. Creator registers an issuance and escrows its total amount
 * 2. Codes are distributed off-chain together with their proofs
 * 3. Holders claim during the window; each claim pays claim_amount_per_code
 * 4. Creator withdraws unclaimed escrow after the window closes
 */
#[program]
pub mod voucher_issuer {
    use super::*;

    /**
     * Registers a new issuance
     *
     * Validates the window, uniqueness of the identifier and the merkle root,
     * stores the record, appends it to the token index and moves
     * total_issued_amount from the creator into the issuance vault.
     *
     * @param ctx - Account context containing issuance, ledger, vault, index and creator accounts
     * @param issuance_id - Unique identifier (1..=32 bytes)
     * @param params - Registration parameters
     * @returns the confirmed issuance identifier
     *
     * Access Control: Any signer; becomes the creator
     */
    pub fn register_issuance(
        ctx: Context<RegisterIssuance>,
        issuance_id: String,
        params: IssuanceParams,
    ) -> Result<String> {
        handle_register_issuance(ctx, issuance_id, params)
    }

    /**
     * Redeems a voucher code with merkle proof verification
     *
     * @param ctx - Account context containing issuance, ledger, counters, vault and claimant accounts
     * @param issuance_id - Identifier of the issuance
     * @param code - The secret voucher code (1..=32 bytes)
     * @param proof - Array of 32-byte hashes forming the merkle proof
     *
     * Access Control: Any signer holding a committed code
     */
    pub fn claim(
        ctx: Context<Claim>,
        issuance_id: String,
        code: String,
        proof: Vec<[u8; 32]>,
    ) -> Result<()> {
        handle_claim(ctx, issuance_id, code, proof)
    }

    /**
     * Withdraws unclaimed escrow after the issuance has closed
     *
     * Access Control: Issuance creator only
     * Note: the issuance and its accounts stay open
     */
    pub fn withdraw_remaining(ctx: Context<Withdraw>) -> Result<()> {
        handle_withdraw(ctx)
    }

    /**
     * Returns the issuance record for an identifier
     *
     * Fails with IssuanceNotFound when no issuance uses the identifier.
     */
    pub fn get_issuance(ctx: Context<GetIssuance>, issuance_id: String) -> Result<Issuance> {
        handle_get_issuance(ctx, issuance_id)
    }

    /**
     * Returns the identifiers of the issuances paying out a token
     *
     * Index entries are passed as remaining accounts. An unknown mint yields
     * an empty list.
     */
    pub fn list_issuance_ids(
        ctx: Context<ListIssuanceIds>,
        token_mint: Pubkey,
    ) -> Result<Vec<String>> {
        handle_list_issuance_ids(ctx, token_mint)
    }
}
