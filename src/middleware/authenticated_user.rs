/// Access token authentication for handlers
///
/// Handlers that take an `AuthenticatedUser` argument only run for requests
/// carrying a valid `Authorization: Bearer <access token>` header; everything
/// else is answered with 401 before the handler body is reached.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};
use uuid::Uuid;

use crate::error::AppError;
use crate::session::SessionService;

/// The subject of a validated access token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub Uuid);

impl AuthenticatedUser {
    pub fn id(&self) -> Uuid {
        self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let session = match req.app_data::<web::Data<SessionService>>() {
            Some(session) => session,
            None => {
                return ready(Err(AppError::Internal(
                    "SessionService is not registered".to_string(),
                )))
            }
        };

        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        ready(session.authorize(header).map(AuthenticatedUser))
    }
}
