//! Core traits defined in `market-core` and implemented by other crates.

pub mod cache;

pub use cache::CacheProvider;
