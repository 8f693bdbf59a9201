//! # market-entity
//!
//! Domain entities for the market backend: accounts, roles, and the
//! capability flags evaluated by the authorization gate.

pub mod account;
pub mod role;

pub use account::{Account, CreateAccount};
pub use role::{Capability, Role};
