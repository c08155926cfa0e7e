use anchor_lang::prelude::*;

#[error_code]
pub enum VoucherError {
    // Registration errors
    #[msg("End time must be after start time")]
    InvalidTimeWindow,
    #[msg("An issuance with this identifier already exists")]
    DuplicateIssuance,
    #[msg("Merkle root must not be zero")]
    InvalidCommitment,
    #[msg("Issuance identifier or name has an invalid length")]
    InvalidIdentifier,
    #[msg("Invalid amount")]
    InvalidAmount,

    // Lookup errors
    #[msg("Issuance not found")]
    IssuanceNotFound,

    // Claim errors
    #[msg("Issuance is not accepting claims at this time")]
    IssuanceNotActive,
    #[msg("Claimant has reached the claim limit for this issuance")]
    QuotaExceeded,
    #[msg("Issuance has no amount left to claim")]
    IssuanceExhausted,
    #[msg("Invalid proof")]
    InvalidProof,
    #[msg("Code has already been redeemed")]
    CodeAlreadyUsed,
    #[msg("Insufficient escrow balance for this claim")]
    InsufficientFunds,
    #[msg("Voucher code is empty or too long")]
    InvalidCode,

    // Token collaborator errors
    #[msg("Token transfer failed")]
    TransferFailed,
    #[msg("Token mint does not match the issuance's token mint")]
    TokenMintMismatch,
    #[msg("Token vault does not belong to the issuance")]
    InvalidVault,

    // Withdrawal errors
    #[msg("Only the issuance creator can perform this action")]
    OnlyCreator,
    #[msg("Issuance has not closed yet")]
    IssuanceNotClosed,

    // System level errors
    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,
    #[msg("Claim ledger is inconsistent with its issuance")]
    LedgerCorrupted,
}
