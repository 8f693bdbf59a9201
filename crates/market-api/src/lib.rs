//! # market-api
//!
//! HTTP API layer for the market backend built on Axum.
//!
//! Exposes login, account and role administration, and health endpoints,
//! with the authorization gate running on every protected route via the
//! `AuthUser` extractor.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use router::build_router;
pub use state::AppState;
