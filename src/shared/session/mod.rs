// Session state: token, persistence, auth-event broadcast
pub mod broadcaster;
pub mod session_context;
pub mod token_store;

pub use broadcaster::*;
pub use session_context::*;
pub use token_store::*;
