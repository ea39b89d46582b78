// Shared errors
pub mod client_error;
pub mod validation_error;

pub use client_error::*;
pub use validation_error::*;
