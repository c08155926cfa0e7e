use anchor_lang::prelude::*;

/// Event emitted when a new issuance is registered
/// - Carries the complete record so indexers never need to read the account
#[event]
pub struct IssuanceRegistered {
    /// The issuance account public key
    pub issuance: Pubkey,
    /// Caller-chosen identifier
    pub issuance_id: String,
    /// Display name
    pub name: String,
    /// Creator who funded the escrow
    pub creator: Pubkey,
    /// Token mint address
    pub token_mint: Pubkey,
    /// Token vault address
    pub token_vault: Pubkey,
    /// Number of codes committed in the merkle tree
    pub total_code_count: u64,
    /// Reward paid for each redeemed code
    pub claim_amount_per_code: u64,
    /// Maximum number of claims per user
    pub claim_frequency: u32,
    /// Amount escrowed for the issuance
    pub total_issued_amount: u64,
    /// Start of the claim window (exclusive)
    pub start_time: i64,
    /// End of the claim window (exclusive)
    pub end_time: i64,
    /// Committed merkle root
    pub merkle_root: [u8; 32],
    /// Whether a single shared code may be redeemed repeatedly
    pub single_code: bool,
    /// Position of this issuance in the token's index
    pub index_position: u32,
}

/// Event emitted when a voucher code is redeemed
#[event]
pub struct VoucherClaimed {
    /// The issuance account public key
    pub issuance: Pubkey,
    /// Identifier of the issuance
    pub issuance_id: String,
    /// The redeemed code
    pub code: String,
    /// Address of the claimant
    pub claimant: Pubkey,
    /// Amount transferred in this claim
    pub amount: u64,
    /// Total amount claimed from the issuance by all users
    pub total_claimed: u64,
    /// Allocation left for future claims after this one
    pub remaining: u64,
}

/// Event emitted when the creator recovers unclaimed escrow
#[event]
pub struct EscrowWithdrawn {
    /// The issuance account public key
    pub issuance: Pubkey,
    /// Creator who withdrew the tokens
    pub creator: Pubkey,
    /// Amount of tokens withdrawn
    pub amount_withdrawn: u64,
}
