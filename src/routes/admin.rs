use actix_web::{web, HttpResponse};

use crate::configuration::ApplicationSettings;
use crate::error::{AppError, AuthError};
use crate::metrics::AppMetrics;
use crate::store::Store;

/// GET /admin/metrics
pub async fn metrics(metrics: web::Data<AppMetrics>) -> HttpResponse {
    let page = format!(
        r#"<html>
<body>
    <h1>Welcome, Chirpy Admin</h1>
    <p>Chirpy has been visited {} times!</p>
</body>
</html>
"#,
        metrics.hits()
    );

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(page)
}

/// POST /admin/reset
///
/// Zeroes the hit counter and deletes every user (their chirps and refresh
/// tokens go with them). Only available on the `dev` platform.
pub async fn reset(
    application: web::Data<ApplicationSettings>,
    metrics: web::Data<AppMetrics>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    if !application.is_dev() {
        tracing::warn!(platform = %application.platform, "Reset refused outside dev");
        return Err(AuthError::Forbidden.into());
    }

    metrics.reset();
    let deleted = store.delete_all_users().await?;

    tracing::info!(deleted_users = deleted, "Development reset performed");

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Hits reset to 0"))
}
