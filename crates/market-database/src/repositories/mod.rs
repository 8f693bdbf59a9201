//! Concrete repository implementations.

pub mod account;
pub mod role;

pub use account::AccountRepository;
pub use role::RoleRepository;
