use anchor_lang::prelude::*;

use crate::constants::INDEX_ENTRY_SEED;

/**
 * Per-token index head
 *
 * Counts the issuances registered for one token mint. The count is also the
 * position of the next IndexEntry, so appending an entry and bumping the
 * count happen in the same registration transaction.
 *
 * Derivation: ["token_index", token_mint]
 *
 * Lifecycle:
 * 1. Created on the first registration for the mint (init_if_needed)
 * 2. Incremented with each registration for the mint
 * 3. Never closed
 */
#[account]
#[derive(Default, Debug, PartialEq)]
pub struct TokenIndex {
    /// Token mint indexed by this account
    pub token_mint: Pubkey,

    /// Number of index entries written so far
    pub count: u32,

    /// Bump seed for PDA derivation
    pub bump: u8,
}

impl TokenIndex {
    pub const LEN: usize = 8 + std::mem::size_of::<TokenIndex>();
}

/**
 * One slot of the per-token index
 *
 * Derivation: ["index_entry", token_mint, position_le_bytes]
 */
#[account]
#[derive(Default, Debug, PartialEq, InitSpace)]
pub struct IndexEntry {
    /// Token mint of the indexed issuance
    pub token_mint: Pubkey,

    /// Zero-based position in the index
    pub position: u32,

    /// Issuance account public key
    pub issuance: Pubkey,

    /// Identifier of the indexed issuance
    #[max_len(32)]
    pub issuance_id: String,

    /// Bump seed for PDA derivation
    pub bump: u8,
}

impl IndexEntry {
    pub const LEN: usize = 8 + IndexEntry::INIT_SPACE;

    /// Address this entry must live at, given its own mint, position and bump
    ///
    /// An account whose key differs was not written by register_issuance for
    /// that slot, whatever its contents claim.
    pub fn expected_address(&self) -> Option<Pubkey> {
        Pubkey::create_program_address(
            &[
                INDEX_ENTRY_SEED.as_bytes(),
                self.token_mint.as_ref(),
                self.position.to_le_bytes().as_ref(),
                &[self.bump],
            ],
            &crate::ID,
        )
        .ok()
    }

    pub fn is_stored_at(&self, key: &Pubkey) -> bool {
        self.expected_address().as_ref() == Some(key)
    }
}
