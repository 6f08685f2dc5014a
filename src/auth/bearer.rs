/// Authorization header parsing
///
/// Works on the raw header value so the session layer never sees request objects.

use crate::error::AuthError;

const BEARER_SCHEME: &str = "Bearer";
const API_KEY_SCHEME: &str = "ApiKey";

/// Extract the token from a `Bearer <token>` header value
///
/// # Errors
/// Returns `MissingToken` if the header is absent or not in `Bearer <token>` shape
pub fn get_bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    credential_for_scheme(header, BEARER_SCHEME)
}

/// Extract the key from an `ApiKey <key>` header value
pub fn get_api_key(header: Option<&str>) -> Result<&str, AuthError> {
    credential_for_scheme(header, API_KEY_SCHEME)
}

fn credential_for_scheme<'a>(header: Option<&'a str>, scheme: &str) -> Result<&'a str, AuthError> {
    let value = header.map(str::trim).ok_or(AuthError::MissingToken)?;
    let mut parts = value.split_whitespace();

    match (parts.next(), parts.next(), parts.next()) {
        (Some(found), Some(credential), None) if found == scheme => Ok(credential),
        _ => Err(AuthError::MissingToken),
    }
}
