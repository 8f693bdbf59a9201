//! JWT claims structure carried by every issued token.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims payload embedded in every token.
///
/// The token itself is never stored; validity is established by
/// signature, expiry, and the matching session binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Email of the authenticated account.
    pub email: String,
    /// Role identifier at the time of issuance.
    pub role: Uuid,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}
