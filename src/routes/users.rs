/// User Routes
///
/// Registration and credential updates. The password hash never leaves the
/// session layer; responses carry the public view only.

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, ErrorContext};
use crate::middleware::AuthenticatedUser;
use crate::models::PublicUser;
use crate::session::SessionService;

/// Email and password, used for both registration and updates
#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Public user information
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_chirpy_red: bool,
}

impl From<PublicUser> for UserResponse {
    fn from(user: PublicUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
            is_chirpy_red: user.is_chirpy_red,
        }
    }
}

/// POST /api/users
///
/// # Errors
/// - 400: Invalid email or unusable password
/// - 409: Email already registered
pub async fn create_user(
    form: web::Json<CredentialsRequest>,
    session: web::Data<SessionService>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_registration");

    let user = session
        .register(&form.email, &form.password)
        .await
        .map_err(|e| {
            context.log_error(&e);
            e
        })?;

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// PUT /api/users
///
/// Requires a valid access token; replaces the caller's email and password.
pub async fn update_user(
    user: AuthenticatedUser,
    form: web::Json<CredentialsRequest>,
    session: web::Data<SessionService>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_update").with_user_id(user.id().to_string());

    let updated = session
        .update_credentials(user.id(), &form.email, &form.password)
        .await
        .map_err(|e| {
            context.log_error(&e);
            e
        })?;

    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}
