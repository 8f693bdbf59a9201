//! Signed, time-bounded identity assertions.

pub mod authority;
pub mod claims;

pub use authority::{IssuedToken, TokenAuthority};
pub use claims::Claims;
