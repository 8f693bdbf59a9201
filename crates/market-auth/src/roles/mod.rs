//! Cache-aside role set.

pub mod cache;
pub mod store;

pub use cache::RoleCache;
pub use store::RoleStore;
