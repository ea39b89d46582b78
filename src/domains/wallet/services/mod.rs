// Wallet domain services
pub mod export;
pub mod state;
pub mod validator;
pub mod wallet_service;

pub use state::*;
pub use validator::*;
pub use wallet_service::*;
