use actix_files as fs;
use actix_web::dev::Server;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;

use crate::configuration::Settings;
use crate::logger::LoggerMiddleware;
use crate::metrics::AppMetrics;
use crate::middleware::HitCounter;
use crate::routes::{
    create_chirp, create_user, delete_chirp, get_chirp, health_check, list_chirps, login, metrics,
    polka_webhook, refresh, reset, revoke, update_user,
};
use crate::session::SessionService;
use crate::store::Store;

/// Directory served under `/app`
pub const STATIC_ROOT: &str = "./public";

pub fn run(
    listener: TcpListener,
    store: Arc<dyn Store>,
    settings: Settings,
) -> Result<Server, std::io::Error> {
    let app_metrics = Arc::new(AppMetrics::default());

    let session = web::Data::new(SessionService::new(store.clone(), settings.auth.clone()));
    let store = web::Data::from(store);
    let metrics_data = web::Data::from(app_metrics.clone());
    let application = web::Data::new(settings.application.clone());
    let polka = web::Data::new(settings.polka.clone());

    let server = HttpServer::new(move || {
        App::new()
            // Global middleware
            .wrap(Logger::default())
            .wrap(LoggerMiddleware)

            // Shared state
            .app_data(session.clone())
            .app_data(store.clone())
            .app_data(metrics_data.clone())
            .app_data(application.clone())
            .app_data(polka.clone())

            .service(
                web::scope("/api")
                    .route("/healthz", web::get().to(health_check))
                    .route("/users", web::post().to(create_user))
                    .route("/users", web::put().to(update_user))
                    .route("/login", web::post().to(login))
                    .route("/refresh", web::post().to(refresh))
                    .route("/revoke", web::post().to(revoke))
                    .route("/chirps", web::post().to(create_chirp))
                    .route("/chirps", web::get().to(list_chirps))
                    .route("/chirps/{chirp_id}", web::get().to(get_chirp))
                    .route("/chirps/{chirp_id}", web::delete().to(delete_chirp))
                    .route("/polka/webhooks", web::post().to(polka_webhook)),
            )
            .service(
                web::scope("/admin")
                    .route("/metrics", web::get().to(metrics))
                    .route("/reset", web::post().to(reset)),
            )

            // Static file serving, counted
            .service(
                web::scope("/app")
                    .wrap(HitCounter::new(app_metrics.clone()))
                    .service(fs::Files::new("", STATIC_ROOT).index_file("index.html")),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
