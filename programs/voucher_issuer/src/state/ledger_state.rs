use anchor_lang::prelude::*;
use crate::error::*;
use super::Issuance;

/**
 * Claimed amount accumulator for one issuance
 *
 * Every claim against an issuance writes this account, which makes it the
 * unit the runtime serializes claims on: two transactions claiming from the
 * same issuance can never interleave their check and update.
 *
 * Derivation: ["ledger", issuance_key]
 *
 * Lifecycle:
 * 1. Created at zero during register_issuance
 * 2. Incremented on every successful claim
 * 3. Never closed
 */
#[account]
#[derive(Default, Debug, PartialEq)]
pub struct IssuanceLedger {
    /// Issuance this ledger belongs to
    pub issuance: Pubkey,

    /// Total amount paid out so far
    /// - Never exceeds the issuance's total_issued_amount
    pub claimed_amount: u64,

    /// Number of successful claims across all users
    pub claim_count: u64,

    /// Bump seed for PDA derivation
    pub bump: u8,
}

impl IssuanceLedger {
    pub const LEN: usize = 8 + std::mem::size_of::<IssuanceLedger>();

    /// Checks that one more claim fits under the issuance cap.
    ///
    /// A ledger that already exceeds its cap can only come from a bug, so it
    /// aborts with LedgerCorrupted instead of reporting exhaustion.
    pub fn ensure_capacity(&self, issuance: &Issuance) -> Result<()> {
        require!(
            self.claimed_amount <= issuance.total_issued_amount,
            VoucherError::LedgerCorrupted
        );

        let next = self
            .claimed_amount
            .checked_add(issuance.claim_amount_per_code)
            .ok_or(VoucherError::ArithmeticOverflow)?;
        require!(
            next <= issuance.total_issued_amount,
            VoucherError::IssuanceExhausted
        );
        Ok(())
    }

    /// Adds one claim to the accumulator and returns the new total.
    pub fn record_claim(&mut self, issuance: &Issuance) -> Result<u64> {
        let claimed_amount = self
            .claimed_amount
            .checked_add(issuance.claim_amount_per_code)
            .ok_or(VoucherError::ArithmeticOverflow)?;
        require!(
            claimed_amount <= issuance.total_issued_amount,
            VoucherError::LedgerCorrupted
        );
        let claim_count = self
            .claim_count
            .checked_add(1)
            .ok_or(VoucherError::ArithmeticOverflow)?;

        self.claimed_amount = claimed_amount;
        self.claim_count = claim_count;
        Ok(claimed_amount)
    }

    /// Tokens still owed to future claimants.
    pub fn remaining(&self, issuance: &Issuance) -> u64 {
        issuance.total_issued_amount.saturating_sub(self.claimed_amount)
    }
}

/**
 * Per-user claim counter
 *
 * Derivation: ["claim", issuance_key, claimant_key]
 *
 * Lifecycle:
 * 1. Created at zero on the user's first claim (init_if_needed)
 * 2. Incremented with each successful claim
 * 3. Never decremented or closed
 */
#[account]
#[derive(Default, Debug, PartialEq)]
pub struct ClaimCounter {
    /// Issuance the counter belongs to
    pub issuance: Pubkey,

    /// User whose claims are counted
    pub claimant: Pubkey,

    /// Number of successful claims by this user
    pub count: u32,

    /// Bump seed for PDA derivation
    pub bump: u8,
}

impl ClaimCounter {
    pub const LEN: usize = 8 + std::mem::size_of::<ClaimCounter>();

    pub fn ensure_quota(&self, issuance: &Issuance) -> Result<()> {
        require!(
            self.count <= issuance.claim_frequency,
            VoucherError::LedgerCorrupted
        );
        require!(
            self.count < issuance.claim_frequency,
            VoucherError::QuotaExceeded
        );
        Ok(())
    }

    pub fn increment(&mut self) -> Result<u32> {
        self.count = self
            .count
            .checked_add(1)
            .ok_or(VoucherError::ArithmeticOverflow)?;
        Ok(self.count)
    }
}

/**
 * Redeemed code marker
 *
 * The set of used codes of an issuance is the set of these accounts with a
 * non-zero redeemed_at. The account is allocated by the claim that first
 * presents the code and is marked only if that claim succeeds; a failed claim
 * reverts the allocation along with everything else.
 *
 * Derivation: ["used_code", issuance_key, code]
 */
#[account]
#[derive(Default, Debug, PartialEq)]
pub struct UsedCode {
    /// Issuance the code was redeemed under
    pub issuance: Pubkey,

    /// User who redeemed the code
    pub claimant: Pubkey,

    /// Unix timestamp of redemption, 0 while unredeemed
    pub redeemed_at: i64,

    /// Bump seed for PDA derivation
    pub bump: u8,
}

impl UsedCode {
    pub const LEN: usize = 8 + std::mem::size_of::<UsedCode>();

    pub fn is_redeemed(&self) -> bool {
        self.redeemed_at != 0
    }

    pub fn ensure_unused(&self) -> Result<()> {
        require!(!self.is_redeemed(), VoucherError::CodeAlreadyUsed);
        Ok(())
    }

    pub fn mark_redeemed(&mut self, issuance: Pubkey, claimant: Pubkey, now: i64) {
        self.issuance = issuance;
        self.claimant = claimant;
        // redeemed_at doubles as the membership flag and must stay non-zero
        self.redeemed_at = now.max(1);
    }
}
