/// Chirp Routes
///
/// Posting requires a valid access token; deleting additionally requires
/// owning the chirp. Listing and fetching are public.

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, DatabaseError, ErrorContext, ValidationError};
use crate::middleware::AuthenticatedUser;
use crate::models::{Chirp, SortOrder};
use crate::session::SessionService;
use crate::store::Store;
use crate::validators::validate_chirp;

#[derive(Deserialize)]
pub struct CreateChirpRequest {
    pub body: String,
}

#[derive(Deserialize)]
pub struct ListChirpsQuery {
    pub author_id: Option<Uuid>,
    pub sort: Option<SortOrder>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChirpResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: String,
    pub user_id: Uuid,
}

impl From<Chirp> for ChirpResponse {
    fn from(chirp: Chirp) -> Self {
        Self {
            id: chirp.id,
            created_at: chirp.created_at,
            updated_at: chirp.updated_at,
            body: chirp.body,
            user_id: chirp.user_id,
        }
    }
}

fn chirp_not_found() -> AppError {
    AppError::Database(DatabaseError::NotFound("Chirp not found".to_string()))
}

/// POST /api/chirps
///
/// # Errors
/// - 400: Body longer than 140 characters
/// - 401: Missing or invalid access token
pub async fn create_chirp(
    user: AuthenticatedUser,
    form: web::Json<CreateChirpRequest>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let body = validate_chirp(&form.body)?;
    let chirp = store.create_chirp(user.id(), &body).await?;

    tracing::info!(user_id = %user.id(), chirp_id = %chirp.id, "Chirp created");

    Ok(HttpResponse::Created().json(ChirpResponse::from(chirp)))
}

/// GET /api/chirps?author_id=<uuid>&sort=asc|desc
pub async fn list_chirps(
    query: web::Query<ListChirpsQuery>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let chirps = store
        .list_chirps(query.author_id, query.sort.unwrap_or_default())
        .await?;

    let chirps: Vec<ChirpResponse> = chirps.into_iter().map(ChirpResponse::from).collect();
    Ok(HttpResponse::Ok().json(chirps))
}

/// GET /api/chirps/{chirp_id}
///
/// An id that is not a UUID cannot name a chirp and is reported as 404.
pub async fn get_chirp(
    path: web::Path<String>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let chirp_id = Uuid::parse_str(&path.into_inner()).map_err(|_| chirp_not_found())?;

    let chirp = store.get_chirp(chirp_id).await?.ok_or_else(chirp_not_found)?;

    Ok(HttpResponse::Ok().json(ChirpResponse::from(chirp)))
}

/// DELETE /api/chirps/{chirp_id}
///
/// # Errors
/// - 400: Chirp id is not a UUID
/// - 401: Missing or invalid access token
/// - 403: Caller does not own the chirp
/// - 404: No such chirp
pub async fn delete_chirp(
    user: AuthenticatedUser,
    path: web::Path<String>,
    store: web::Data<dyn Store>,
    session: web::Data<SessionService>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("chirp_delete").with_user_id(user.id().to_string());

    let chirp_id = Uuid::parse_str(&path.into_inner()).map_err(|_| {
        ValidationError::InvalidParameter("chirp id must be a UUID".to_string())
    })?;

    let chirp = store.get_chirp(chirp_id).await?.ok_or_else(chirp_not_found)?;

    session
        .authorize_ownership(user.id(), chirp.user_id)
        .map_err(|e| {
            let e = AppError::from(e);
            context.log_error(&e);
            e
        })?;

    if !store.delete_chirp(chirp_id).await? {
        // Deleted concurrently between the lookup and the delete
        return Err(chirp_not_found());
    }

    tracing::info!(user_id = %user.id(), chirp_id = %chirp_id, "Chirp deleted");

    Ok(HttpResponse::NoContent().finish())
}
