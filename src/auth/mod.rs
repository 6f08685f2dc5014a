/// Authentication module
///
/// Credential hashing, access token issue/validation, bearer header parsing
/// and refresh token management. The session layer composes these.

mod bearer;
mod claims;
mod jwt;
mod password;
mod refresh_token;

pub use bearer::{get_api_key, get_bearer_token};
pub use claims::{Claims, ISSUER};
pub use jwt::{issue_access_token, issue_access_token_at, validate_access_token, validate_access_token_at};
pub use password::{hash_password, verify_password, MAX_PASSWORD_COST, MIN_PASSWORD_COST};
pub use refresh_token::{generate_refresh_token, IssuedRefreshToken, RefreshTokenManager};
