// Auth domain models
pub mod auth;

pub use auth::*;
