//! Cache key builders for all market cache entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

/// Prefix applied to all market cache keys.
const PREFIX: &str = "market";

/// Well-known key holding the full non-deprecated role set as one JSON value.
pub fn roles() -> String {
    format!("{PREFIX}:roles:all")
}

/// Cache key for the session binding of an identity.
///
/// `identity_key` is the fixed-length digest derived from the account's
/// email, never the email itself.
pub fn session_binding(identity_key: &str) -> String {
    format!("{PREFIX}:session:{identity_key}")
}
