use anchor_lang::prelude::*;

/**
 * Program Constants
 *
 * Limits and PDA seeds shared by the voucher issuer instructions.
 * Everything marked #[constant] is exported through the IDL so clients
 * derive the same addresses and enforce the same limits off-chain.
 */

/// ===== PDA SEED CONSTANTS =====

#[constant]
/// Seed for issuance PDA derivation
/// - Used in: ["issuance", sha256(issuance_id)]
/// - One account per identifier, so a second registration of the same id finds it occupied
pub const ISSUANCE_SEED: &str = "issuance";

#[constant]
/// Seed for the per-issuance claimed amount accumulator
/// - Used in: ["ledger", issuance_key]
pub const LEDGER_SEED: &str = "ledger";

#[constant]
/// Seed for token vault PDA derivation
/// - Used in: ["vault", issuance_key, token_mint]
/// - The vault authority is the issuance PDA itself
pub const VAULT_SEED: &str = "vault";

#[constant]
/// Seed for per-user claim counter PDA derivation
/// - Used in: ["claim", issuance_key, claimant_key]
pub const CLAIM_SEED: &str = "claim";

#[constant]
/// Seed for redeemed code PDA derivation
/// - Used in: ["used_code", issuance_key, sha256(code)]
/// - Exists once per (issuance, code) pair and is never closed
pub const USED_CODE_SEED: &str = "used_code";

#[constant]
/// Seed for the per-token index head
/// - Used in: ["token_index", token_mint]
/// - Holds the number of issuances registered for the mint
pub const TOKEN_INDEX_SEED: &str = "token_index";

#[constant]
/// Seed for per-token index entries
/// - Used in: ["index_entry", token_mint, position_le_bytes]
pub const INDEX_ENTRY_SEED: &str = "index_entry";

/// ===== LIMIT CONSTANTS =====

#[constant]
/// Maximum length of an issuance identifier in bytes
/// - Bounds the identifier stored in the issuance and its index entry
pub const MAX_ISSUANCE_ID_LEN: u32 = 32;

#[constant]
/// Maximum length of an issuance display name in bytes
pub const MAX_NAME_LEN: u32 = 64;

#[constant]
/// Maximum number of index entries read by a single list_issuance_ids call
/// - Keeps the returned id list within the 1024 byte return data limit
pub const MAX_INDEX_PAGE: u32 = 16;
