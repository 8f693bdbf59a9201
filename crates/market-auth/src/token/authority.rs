//! Token issuance and validation with a single symmetric signing key.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;
use uuid::Uuid;

use market_core::config::auth::AuthConfig;
use market_core::error::AppError;

use super::claims::Claims;

/// A freshly issued token and its expiry instant.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct IssuedToken {
    /// The signed token string.
    pub token: String,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
}

/// Issues and parses signed identity assertions (HS256 JWT).
///
/// The signing key is injected configuration held for the process
/// lifetime; it never appears as a source literal.
#[derive(Clone)]
pub struct TokenAuthority {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
    /// Token lifetime in minutes.
    ttl_minutes: i64,
}

impl std::fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("ttl_minutes", &self.ttl_minutes)
            .finish()
    }
}

impl TokenAuthority {
    /// Creates a new token authority from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // Zero leeway: a token with exp in the past is always rejected.
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.signing_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.signing_key.as_bytes()),
            validation,
            ttl_minutes: config.token_ttl_minutes as i64,
        }
    }

    /// Issues a signed token for the given email and role.
    pub fn issue(&self, email: &str, role_id: Uuid) -> Result<IssuedToken, AppError> {
        let expires_at = Utc::now() + chrono::Duration::minutes(self.ttl_minutes);

        let claims = Claims {
            email: email.to_string(),
            role: role_id,
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Parses and validates a token string.
    ///
    /// Rejects on any structural, cryptographic, or expiry mismatch. The
    /// returned error carries a uniform message so callers cannot tell
    /// which check failed.
    pub fn parse(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                debug!(reason = %e, "Token rejected");
                AppError::authentication("Invalid token")
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{Header, encode};

    fn authority() -> TokenAuthority {
        TokenAuthority::new(&AuthConfig {
            signing_key: "test-signing-key".to_string(),
            token_ttl_minutes: 60,
        })
    }

    #[test]
    fn test_issue_parse_roundtrip() {
        let authority = authority();
        let role_id = Uuid::new_v4();

        let before = Utc::now().timestamp();
        let issued = authority.issue("a@x.com", role_id).unwrap();
        let after = Utc::now().timestamp();

        let claims = authority.parse(&issued.token).unwrap();
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.role, role_id);
        // Expiry is exactly one hour after issuance, to the second.
        assert!(claims.exp >= before + 3600);
        assert!(claims.exp <= after + 3600);
        assert_eq!(claims.exp, issued.expires_at.timestamp());
    }

    #[test]
    fn test_expired_token_rejected() {
        let authority = authority();
        let claims = Claims {
            email: "a@x.com".to_string(),
            role: Uuid::new_v4(),
            exp: Utc::now().timestamp() - 10,
        };
        // Signed with the right key, expired anyway.
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-signing-key"),
        )
        .unwrap();

        let err = authority.parse(&token).unwrap_err();
        assert_eq!(err.kind, market_core::error::ErrorKind::Authentication);
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let authority = authority();
        let other = TokenAuthority::new(&AuthConfig {
            signing_key: "some-other-key".to_string(),
            token_ttl_minutes: 60,
        });
        let issued = other.issue("a@x.com", Uuid::new_v4()).unwrap();
        assert!(authority.parse(&issued.token).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        let authority = authority();
        assert!(authority.parse("not-a-token").is_err());
        assert!(authority.parse("").is_err());
    }
}
