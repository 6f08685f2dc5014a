/// Refresh Token Management
///
/// Refresh tokens are:
/// - 32 bytes from the OS CSPRNG, hex encoded (256 bits of entropy)
/// - Hashed with SHA-256 before storage (never store plaintext)
/// - Long-lived and reusable until revoked or expired; refreshing does not rotate them
/// - Revoked by timestamp, never deleted

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::RefreshTokenError;
use crate::models::RefreshToken;
use crate::store::Store;

const REFRESH_TOKEN_BYTES: usize = 32;

/// Generate a new cryptographically secure refresh token
///
/// The token is returned in plaintext (this is what the client stores).
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Storage key for a refresh token
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// A freshly issued refresh token: the plaintext for the client plus the stored record
#[derive(Debug, Clone)]
pub struct IssuedRefreshToken {
    pub token: String,
    pub record: RefreshToken,
}

/// Issues, resolves and revokes refresh tokens against the store
#[derive(Clone)]
pub struct RefreshTokenManager {
    store: Arc<dyn Store>,
    ttl: chrono::Duration,
}

impl RefreshTokenManager {
    pub fn new(store: Arc<dyn Store>, ttl: chrono::Duration) -> Self {
        Self { store, ttl }
    }

    /// Generate and persist a token for `user_id`, expiring `ttl` from now
    ///
    /// # Errors
    /// Returns `Store` if the token cannot be persisted
    pub async fn issue(&self, user_id: Uuid) -> Result<IssuedRefreshToken, RefreshTokenError> {
        let token = generate_refresh_token();
        let now = Utc::now();
        let record = RefreshToken {
            token_hash: hash_token(&token),
            user_id,
            created_at: now,
            updated_at: now,
            expires_at: now + self.ttl,
            revoked_at: None,
        };

        self.store.create_refresh_token(&record).await?;

        Ok(IssuedRefreshToken { token, record })
    }

    /// Resolve a presented token to its owner
    ///
    /// # Errors
    /// `NotFound`, `Revoked` or `Expired`, checked in that order
    pub async fn resolve(&self, token: &str) -> Result<Uuid, RefreshTokenError> {
        self.resolve_at(token, Utc::now()).await
    }

    /// Resolve a presented token against the clock reading `now`
    pub async fn resolve_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Uuid, RefreshTokenError> {
        let record = self
            .store
            .find_refresh_token(&hash_token(token))
            .await?
            .ok_or_else(|| {
                tracing::warn!("Refresh token not found");
                RefreshTokenError::NotFound
            })?;

        if record.is_revoked() {
            tracing::warn!(user_id = %record.user_id, "Attempt to use revoked refresh token");
            return Err(RefreshTokenError::Revoked);
        }

        if record.is_expired_at(now) {
            tracing::info!(user_id = %record.user_id, "Refresh token expired");
            return Err(RefreshTokenError::Expired);
        }

        Ok(record.user_id)
    }

    /// Revoke a token
    ///
    /// Revoking an already-revoked token succeeds and keeps the original revocation time.
    ///
    /// # Errors
    /// Returns `NotFound` if the token was never issued
    pub async fn revoke(&self, token: &str) -> Result<(), RefreshTokenError> {
        let found = self
            .store
            .revoke_refresh_token(&hash_token(token), Utc::now())
            .await?;

        if found {
            Ok(())
        } else {
            Err(RefreshTokenError::NotFound)
        }
    }
}
