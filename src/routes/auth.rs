/// Authentication Routes
///
/// Login, access token refresh and refresh token revocation. Refresh and
/// revoke take the refresh token from `Authorization: Bearer <token>`.

use actix_web::{http::header::AUTHORIZATION, web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorContext};
use crate::routes::users::UserResponse;
use crate::session::SessionService;

/// User login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Optional access token lifetime, capped at the configured maximum
    #[serde(default)]
    pub expires_in_seconds: Option<i64>,
}

/// Login response: the public user plus both tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub token: String,
    pub refresh_token: String,
}

/// Token refresh response
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub token: String,
}

fn authorization_header(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
}

/// POST /api/login
///
/// # Errors
/// - 401: Unknown email or wrong password (same response for both)
///
/// # Security Notes
/// - The email is not format-checked here, so malformed and unknown emails
///   fail identically
pub async fn login(
    form: web::Json<LoginRequest>,
    session: web::Data<SessionService>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_login");

    let outcome = session
        .login(&form.email, &form.password, form.expires_in_seconds)
        .await
        .map_err(|e| {
            context.log_error(&e);
            e
        })?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        user: outcome.user.into(),
        token: outcome.access_token,
        refresh_token: outcome.refresh_token,
    }))
}

/// POST /api/refresh
///
/// # Errors
/// - 400: No bearer token
/// - 401: Unknown, revoked or expired refresh token
pub async fn refresh(
    req: HttpRequest,
    session: web::Data<SessionService>,
) -> Result<HttpResponse, AppError> {
    let token = session.refresh(authorization_header(&req)).await?;

    Ok(HttpResponse::Ok().json(RefreshResponse { token }))
}

/// POST /api/revoke
///
/// # Errors
/// - 400: No bearer token
pub async fn revoke(
    req: HttpRequest,
    session: web::Data<SessionService>,
) -> Result<HttpResponse, AppError> {
    session.revoke(authorization_header(&req)).await?;

    Ok(HttpResponse::NoContent().finish())
}
