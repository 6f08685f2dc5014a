/// Session orchestration
///
/// Composes the credential hasher, the access token issuer and the refresh
/// token manager into the operations the HTTP layer exposes. Nothing here
/// knows about requests or status codes: callers pass raw header values and
/// get back identities or `AppError`s.

use std::sync::Arc;

use uuid::Uuid;

use crate::auth::{
    get_bearer_token, hash_password, issue_access_token, validate_access_token, verify_password,
    RefreshTokenManager,
};
use crate::configuration::AuthSettings;
use crate::error::{AppError, AuthError, CredentialError, DatabaseError, RefreshTokenError};
use crate::models::PublicUser;
use crate::store::Store;
use crate::validators::{is_valid_email, is_valid_password};

/// Everything a successful login hands back to the client
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: PublicUser,
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime of `access_token` in seconds
    pub expires_in: i64,
}

fn user_not_found() -> DatabaseError {
    DatabaseError::NotFound("User not found".to_string())
}

#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn Store>,
    refresh_tokens: RefreshTokenManager,
    settings: AuthSettings,
}

impl SessionService {
    pub fn new(store: Arc<dyn Store>, settings: AuthSettings) -> Self {
        let refresh_tokens = RefreshTokenManager::new(store.clone(), settings.refresh_token_ttl());
        Self {
            store,
            refresh_tokens,
            settings,
        }
    }

    /// Create an account
    ///
    /// # Errors
    /// - `Validation` for a malformed email or an unusable password
    /// - `Database(UniqueConstraintViolation)` if the email is taken
    pub async fn register(&self, email: &str, password: &str) -> Result<PublicUser, AppError> {
        let email = is_valid_email(email)?;
        is_valid_password(password)?;

        let password_hash = self.hash(password).await?;
        let user = self.store.create_user(&email, &password_hash).await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user.into())
    }

    /// Exchange credentials for an access token and a refresh token
    ///
    /// `expires_in_seconds` is honored when it lies within the configured
    /// access token lifetime; anything else falls back to that lifetime.
    /// The email is trimmed the same way registration trims it.
    ///
    /// # Errors
    /// `Auth(InvalidCredentials)` for an unknown email or a wrong password, with
    /// nothing in the error telling the two apart
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        expires_in_seconds: Option<i64>,
    ) -> Result<LoginOutcome, AppError> {
        let user = match self.store.find_user_by_email(email.trim()).await? {
            Some(user) => user,
            None => {
                // Spend the same bcrypt work as a real verification
                self.hash(password).await?;
                tracing::warn!("Login rejected");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if let Err(e) = self.verify(password, &user.password_hash).await {
            if e == CredentialError::CredentialMismatch {
                tracing::warn!("Login rejected");
            }
            return Err(e.into());
        }

        let expires_in = self.access_ttl_seconds(expires_in_seconds);
        let access_token = issue_access_token(
            user.id,
            &self.settings.jwt_secret,
            chrono::Duration::seconds(expires_in),
        )?;
        let issued = self.refresh_tokens.issue(user.id).await?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginOutcome {
            user: user.into(),
            access_token,
            refresh_token: issued.token,
            expires_in,
        })
    }

    /// Mint a new access token from the refresh token in `authorization`
    ///
    /// The refresh token is not rotated and stays usable.
    ///
    /// # Errors
    /// - `Auth(MissingToken)` if no bearer token was presented
    /// - `Auth(Unauthorized)` if the token is unknown, revoked or expired
    pub async fn refresh(&self, authorization: Option<&str>) -> Result<String, AppError> {
        let token = get_bearer_token(authorization)?;
        let user_id = self.refresh_tokens.resolve(token).await?;

        let access_token = issue_access_token(
            user_id,
            &self.settings.jwt_secret,
            self.settings.access_token_ttl(),
        )?;

        tracing::info!(user_id = %user_id, "Access token refreshed");
        Ok(access_token)
    }

    /// Revoke the refresh token in `authorization`
    ///
    /// Unknown and already revoked tokens are treated as revoked.
    ///
    /// # Errors
    /// `Auth(MissingToken)` if no bearer token was presented
    pub async fn revoke(&self, authorization: Option<&str>) -> Result<(), AppError> {
        let token = get_bearer_token(authorization)?;

        match self.refresh_tokens.revoke(token).await {
            Ok(()) => {
                tracing::info!("Refresh token revoked");
                Ok(())
            }
            Err(RefreshTokenError::NotFound) => {
                tracing::debug!("Revoke requested for unknown refresh token");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Resolve the access token in `authorization` to its subject
    ///
    /// # Errors
    /// `Auth(Unauthorized)` if the header is missing or the token fails validation
    pub fn authorize(&self, authorization: Option<&str>) -> Result<Uuid, AppError> {
        let token = get_bearer_token(authorization).map_err(|_| AuthError::Unauthorized)?;

        validate_access_token(token, &self.settings.jwt_secret).map_err(|e| {
            tracing::debug!(reason = %e, "Access token rejected");
            AppError::from(e)
        })
    }

    /// Check that `subject` owns a resource belonging to `owner`
    ///
    /// # Errors
    /// `Forbidden` when they differ
    pub fn authorize_ownership(&self, subject: Uuid, owner: Uuid) -> Result<(), AuthError> {
        if subject == owner {
            Ok(())
        } else {
            tracing::warn!(user_id = %subject, owner_id = %owner, "Ownership check failed");
            Err(AuthError::Forbidden)
        }
    }

    /// Replace the email and password of `subject`
    ///
    /// Tokens issued before the change stay valid.
    ///
    /// # Errors
    /// `Database(NotFound)` if `subject` no longer exists
    pub async fn update_credentials(
        &self,
        subject: Uuid,
        email: &str,
        password: &str,
    ) -> Result<PublicUser, AppError> {
        let email = is_valid_email(email)?;
        is_valid_password(password)?;

        // A deleted subject can still hold an unexpired access token
        if self.store.find_user_by_id(subject).await?.is_none() {
            return Err(user_not_found().into());
        }

        let password_hash = self.hash(password).await?;
        let user = self
            .store
            .update_user(subject, &email, &password_hash)
            .await?
            .ok_or_else(user_not_found)?;

        tracing::info!(user_id = %subject, "User credentials updated");
        Ok(user.into())
    }

    /// Requested lifetime if within (0, configured], else the configured lifetime
    fn access_ttl_seconds(&self, requested: Option<i64>) -> i64 {
        let max = self.settings.access_token_ttl_seconds();
        match requested {
            Some(seconds) if seconds > 0 && seconds <= max => seconds,
            _ => max,
        }
    }

    // bcrypt is CPU bound; keep it off the async workers
    async fn hash(&self, password: &str) -> Result<String, AppError> {
        let password = password.to_string();
        let cost = self.settings.password_cost;
        let hashed = tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))??;
        Ok(hashed)
    }

    async fn verify(&self, password: &str, password_hash: &str) -> Result<(), CredentialError> {
        let password = password.to_string();
        let password_hash = password_hash.to_string();
        tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
            .await
            .map_err(|e| CredentialError::HashingFailure(format!("Verify task failed: {}", e)))?
    }
}
