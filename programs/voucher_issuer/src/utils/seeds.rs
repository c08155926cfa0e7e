use anchor_lang::solana_program::hash::hashv;

/// Seed component of the issuance PDA for an identifier
///
/// PDA seeds are limited to 32 bytes each, so the identifier enters the
/// derivation as its SHA-256 digest. Identifiers of any length derive an
/// address and reach the handler's own length check.
pub fn issuance_seed(issuance_id: &str) -> [u8; 32] {
    hashv(&[issuance_id.as_bytes()]).to_bytes()
}
