//! # market-database
//!
//! PostgreSQL connection management and concrete repository
//! implementations for market entities.

pub mod connection;
pub mod repositories;

pub use connection::DatabasePool;
