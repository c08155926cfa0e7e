pub mod register_issuance;
pub mod claim;
pub mod withdraw;
pub mod query;

pub use register_issuance::*;
pub use claim::*;
pub use withdraw::*;
pub use query::*;
