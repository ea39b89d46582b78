// Auth domain services
pub mod auth_service;
pub mod state;
pub mod validator;

pub use auth_service::*;
pub use state::*;
pub use validator::*;
