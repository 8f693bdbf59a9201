//! # market-auth
//!
//! Session authentication and role authorization for the market backend.
//!
//! ## Modules
//!
//! - `password` — Argon2id credential hashing and verification
//! - `token` — signed, time-bounded identity assertions (HS256 JWT)
//! - `session` — cache-backed single-active-session registry
//! - `roles` — cache-aside role set with durable-storage fallback
//! - `gate` — the per-request authorization pipeline

pub mod gate;
pub mod password;
pub mod roles;
pub mod session;
pub mod token;

pub use gate::{AuthContext, AuthorizationGate};
pub use password::PasswordHasher;
pub use roles::{RoleCache, RoleStore};
pub use session::{AccountStore, BindOutcome, LoginResult, SessionBinder, SessionManager};
pub use token::{Claims, IssuedToken, TokenAuthority};
