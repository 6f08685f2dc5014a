/// JWT Claims structure
///
/// Payload of an access token: the standard RFC 7519 claims and nothing else.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TokenError;

/// Issuer stamped into every access token this service mints
pub const ISSUER: &str = "chirpy";

/// JWT Claims for access tokens
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

impl Claims {
    /// Claims for `user_id`, issued at `issued_at` and valid for `ttl`
    pub fn new(user_id: Uuid, issued_at: DateTime<Utc>, ttl: chrono::Duration) -> Self {
        let iat = issued_at.timestamp();
        Self {
            sub: user_id.to_string(),
            exp: iat + ttl.num_seconds(),
            iat,
            iss: ISSUER.to_string(),
        }
    }

    /// Extract user ID from claims
    ///
    /// # Errors
    /// Returns `Malformed` if the subject is not a UUID
    pub fn user_id(&self) -> Result<Uuid, TokenError> {
        Uuid::parse_str(&self.sub).map_err(|_| TokenError::Malformed)
    }

    /// Expired once `now` reaches the embedded expiry
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}
