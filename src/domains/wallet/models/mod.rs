// Wallet domain models
pub mod amount;
pub mod wallet;
pub mod transaction;

pub use amount::*;
pub use wallet::*;
pub use transaction::*;
