use anchor_lang::prelude::*;

/**
 * Issuance record account
 *
 * One voucher campaign: who funded it, which token it pays out, how much each
 * code is worth and the merkle root committing to the set of valid codes.
 *
 * Derivation: ["issuance", sha256(issuance_id)]
 *
 * Lifecycle:
 * 1. Created during register_issuance
 * 2. Never modified afterwards (claims only touch the ledger accounts)
 * 3. Never closed, so the catalog of issuances is append-only
 */
#[account]
#[derive(Default, Debug, PartialEq, InitSpace)]
pub struct Issuance {
    /// Bump seed for PDA derivation
    /// - Saved so the vault transfer can be signed without recomputation
    pub bump: u8,

    /// Creator who funded the escrow
    /// - Only account allowed to withdraw unclaimed escrow after the window closes
    pub creator: Pubkey,

    /// Token mint paid out by this issuance
    pub token_mint: Pubkey,

    /// Token vault account address
    /// - Derived from: ["vault", issuance_key]
    pub token_vault: Pubkey,

    /// Caller-chosen unique identifier
    #[max_len(32)]
    pub issuance_id: String,

    /// Display name
    #[max_len(64)]
    pub name: String,

    /// Number of codes committed in the merkle tree
    pub total_code_count: u64,

    /// Reward paid for every successful claim
    pub claim_amount_per_code: u64,

    /// Maximum number of successful claims per user
    pub claim_frequency: u32,

    /// Amount escrowed at registration
    /// - Upper bound for the ledger's claimed_amount
    pub total_issued_amount: u64,

    /// Claims are accepted strictly after this Unix timestamp
    pub start_time: i64,

    /// Claims are accepted strictly before this Unix timestamp
    pub end_time: i64,

    /// Root of the merkle tree over hash(code) leaves
    pub merkle_root: [u8; 32],

    /// When set, a single shared code may be redeemed by many users
    /// - The used-code check is skipped; per-user quota and the cap still apply
    pub single_code: bool,

    /// Unix timestamp of registration
    pub registered_at: i64,
}

/// Phase of an issuance, derived from the current time and its window
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IssuancePhase {
    /// now <= start_time
    Pending,
    /// start_time < now < end_time
    Active,
    /// now >= end_time
    Closed,
}

impl Issuance {
    /// Calculate the space required for this account
    /// - Includes 8-byte discriminator + borsh size with maximal strings
    pub const LEN: usize = 8 + Issuance::INIT_SPACE;

    /// An issuance account that has been written by register_issuance.
    /// Freshly allocated accounts deserialize with a default creator.
    pub fn is_registered(&self) -> bool {
        self.creator != Pubkey::default()
    }

    pub fn phase(&self, now: i64) -> IssuancePhase {
        if now <= self.start_time {
            IssuancePhase::Pending
        } else if now < self.end_time {
            IssuancePhase::Active
        } else {
            IssuancePhase::Closed
        }
    }

    pub fn is_active(&self, now: i64) -> bool {
        self.phase(now) == IssuancePhase::Active
    }
}
