// Shared module
pub mod clients;
pub mod config;
pub mod errors;
pub mod services;
pub mod session;
pub mod utils;

pub use clients::*;
pub use config::*;
pub use errors::*;
pub use services::*;
pub use session::*;
pub use utils::*;
