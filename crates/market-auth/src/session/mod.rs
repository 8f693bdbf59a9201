//! Single-active-session registry and the login sequence over it.

pub mod binder;
pub mod manager;
pub mod store;

pub use binder::{BindOutcome, SessionBinder};
pub use manager::{LoginResult, SessionManager};
pub use store::AccountStore;
