use anchor_lang::prelude::*;
use crate::error::VoucherError;

/// Deserializes a program-owned account that the instruction received unchecked
///
/// Instructions that must report a missing account with their own error take
/// the account as UncheckedAccount and load it here. An empty or foreign
/// account yields `missing`.
pub fn load_program_account<T: AccountDeserialize>(
    info: &AccountInfo,
    missing: VoucherError,
) -> Result<T> {
    if info.data_is_empty() || info.owner != &crate::ID {
        return Err(missing.into());
    }

    let data = info.try_borrow_data()?;
    T::try_deserialize(&mut data.as_ref())
}

/// Writes an account loaded with `load_program_account` back to its data
pub fn store_program_account<T: AccountSerialize>(account: &T, info: &AccountInfo) -> Result<()> {
    let mut data = info.try_borrow_mut_data()?;
    let mut writer: &mut [u8] = &mut data[..];
    account.try_serialize(&mut writer)
}
