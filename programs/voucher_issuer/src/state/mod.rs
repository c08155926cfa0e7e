pub mod issuance_state;
pub mod ledger_state;
pub mod index_state;

pub use issuance_state::*;
pub use ledger_state::*;
pub use index_state::*;
