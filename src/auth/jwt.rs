/// Access Token Generation and Validation
///
/// HS256 JWTs signed with the process-wide secret. Validation is stateless:
/// a token is honored until its embedded expiry, with no revocation list.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::claims::{Claims, ISSUER};
use crate::error::{AppError, TokenError};

/// Issue an access token for `user_id`, valid for `ttl` from now
///
/// # Errors
/// Returns error if the token cannot be signed
pub fn issue_access_token(
    user_id: Uuid,
    secret: &str,
    ttl: chrono::Duration,
) -> Result<String, AppError> {
    issue_access_token_at(user_id, secret, ttl, Utc::now())
}

/// Issue an access token as if minted at `issued_at`
pub fn issue_access_token_at(
    user_id: Uuid,
    secret: &str,
    ttl: chrono::Duration,
    issued_at: DateTime<Utc>,
) -> Result<String, AppError> {
    let claims = Claims::new(user_id, issued_at, ttl);

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Validate an access token and return its subject
///
/// # Errors
/// - `BadSignature` if the token was not signed with `secret`
/// - `Expired` if the current time has reached the embedded expiry
/// - `Malformed` for anything that is not a well-formed token from this issuer
pub fn validate_access_token(token: &str, secret: &str) -> Result<Uuid, TokenError> {
    validate_access_token_at(token, secret, Utc::now())
}

/// Validate an access token against the clock reading `now`
pub fn validate_access_token_at(
    token: &str,
    secret: &str,
    now: DateTime<Utc>,
) -> Result<Uuid, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry is checked below against `now`, after the signature has been verified
    validation.validate_exp = false;
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);
    validation.set_issuer(&[ISSUER]);

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::InvalidSignature => TokenError::BadSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed,
    })?;

    if claims.is_expired_at(now) {
        return Err(TokenError::Expired);
    }

    claims.user_id()
}
