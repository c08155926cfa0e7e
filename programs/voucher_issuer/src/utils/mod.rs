pub mod account;
pub mod merkle;
pub mod seeds;
pub mod token;

pub use account::*;
pub use merkle::*;
pub use seeds::*;
pub use token::*;
