use anchor_lang::prelude::*;
use crate::state::*;
use crate::error::*;
use crate::constants::*;
use crate::utils::{issuance_seed, load_program_account};

/**
 * Account context for reading one issuance by identifier
 *
 * Read-only; the record is returned through the instruction's return data.
 */
#[derive(Accounts)]
#[instruction(issuance_id: String)]
pub struct GetIssuance<'info> {
    /// CHECK: PDA address enforced by seeds; may be absent
    #[account(
        seeds = [ISSUANCE_SEED.as_bytes(), issuance_seed(&issuance_id).as_ref()],
        bump
    )]
    pub issuance: UncheckedAccount<'info>,
}

pub fn handle_get_issuance(ctx: Context<GetIssuance>, _issuance_id: String) -> Result<Issuance> {
    load_program_account(&ctx.accounts.issuance, VoucherError::IssuanceNotFound)
}

/**
 * Account context for listing the issuances of a token
 *
 * Index entries are passed as remaining accounts, one page of at most
 * MAX_INDEX_PAGE entries per call. Clients derive them from
 * ["index_entry", token_mint, position] for positions below the index count.
 */
#[derive(Accounts)]
#[instruction(token_mint: Pubkey)]
pub struct ListIssuanceIds<'info> {
    /// CHECK: PDA address enforced by seeds; absent until the mint's first registration
    #[account(
        seeds = [TOKEN_INDEX_SEED.as_bytes(), token_mint.as_ref()],
        bump
    )]
    pub token_index: UncheckedAccount<'info>,
}

/// Orders the entries of one token's index and returns their identifiers
///
/// Entries of other mints, positions past `count` and repeated positions are
/// dropped, so a sloppy or hostile page can't inject ids into the listing.
/// Callers pass only entries already checked to sit at their own address.
pub fn collect_issuance_ids(token_mint: &Pubkey, count: u32, entries: &[IndexEntry]) -> Vec<String> {
    let mut page: Vec<&IndexEntry> = entries
        .iter()
        .filter(|entry| entry.token_mint == *token_mint && entry.position < count)
        .collect();
    page.sort_by_key(|entry| entry.position);
    page.dedup_by_key(|entry| entry.position);

    page.into_iter()
        .map(|entry| entry.issuance_id.clone())
        .collect()
}

pub fn handle_list_issuance_ids(ctx: Context<ListIssuanceIds>, token_mint: Pubkey) -> Result<Vec<String>> {
    // A mint nobody registered for has no index; that is an empty listing
    let count = match load_program_account::<TokenIndex>(
        &ctx.accounts.token_index,
        VoucherError::IssuanceNotFound,
    ) {
        Ok(index) => index.count,
        Err(_) => return Ok(Vec::new()),
    };

    let entries: Vec<IndexEntry> = ctx
        .remaining_accounts
        .iter()
        .take(MAX_INDEX_PAGE as usize)
        .filter_map(|info| {
            load_program_account::<IndexEntry>(info, VoucherError::IssuanceNotFound)
                .ok()
                .filter(|entry| entry.is_stored_at(info.key))
        })
        .collect();

    Ok(collect_issuance_ids(&token_mint, count, &entries))
}
