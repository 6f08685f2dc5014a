/// Payment provider webhooks
///
/// Polka calls back with `Authorization: ApiKey <key>` when a user buys a
/// Chirpy Red membership. Other event kinds are acknowledged and ignored.

use actix_web::{http::header::AUTHORIZATION, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::get_api_key;
use crate::configuration::PolkaSettings;
use crate::error::{AppError, AuthError, DatabaseError};
use crate::store::Store;

pub const USER_UPGRADED_EVENT: &str = "user.upgraded";

#[derive(Deserialize)]
pub struct WebhookData {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct WebhookRequest {
    pub event: String,
    pub data: WebhookData,
}

/// POST /api/polka/webhooks
///
/// # Errors
/// - 401: Missing or wrong API key
/// - 404: The upgraded user does not exist
pub async fn polka_webhook(
    req: HttpRequest,
    form: web::Json<WebhookRequest>,
    polka: web::Data<PolkaSettings>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());
    let api_key = get_api_key(header).map_err(|_| AuthError::Unauthorized)?;

    if polka.api_key.is_empty() || api_key != polka.api_key {
        tracing::warn!("Webhook rejected: invalid API key");
        return Err(AuthError::Unauthorized.into());
    }

    if form.event != USER_UPGRADED_EVENT {
        tracing::debug!(event = %form.event, "Ignoring webhook event");
        return Ok(HttpResponse::NoContent().finish());
    }

    let user_id = form.data.user_id;
    if !store.upgrade_user_to_chirpy_red(user_id).await? {
        return Err(DatabaseError::NotFound("User not found".to_string()).into());
    }

    tracing::info!(user_id = %user_id, "User upgraded to Chirpy Red");

    Ok(HttpResponse::NoContent().finish())
}
