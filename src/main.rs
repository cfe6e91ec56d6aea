use std::io;
use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use keystone::auth::{AuthMiddleware, CredentialStore, SessionGuard};
use keystone::config::Config;
use keystone::error;
use keystone::routes::{self, health};
use keystone::store::PgStore;
use sqlx::postgres::PgPoolOptions;

/// How often idle sessions are swept from the database.
const PURGE_INTERVAL: Duration = Duration::from_secs(10 * 60);

fn other<E: std::fmt::Display>(context: &str) -> impl FnOnce(E) -> io::Error + '_ {
    move |e| io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, e))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(other("Invalid configuration"))?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .map_err(other("Failed to connect to database"))?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(other("Failed to run migrations"))?;

    let store = Arc::new(PgStore::new(pool.clone()));
    let credentials = web::Data::new(CredentialStore::new(store.clone(), config.bcrypt_cost));
    let guard = web::Data::new(SessionGuard::new(store, config.session_idle_timeout()));
    let transport = web::Data::new(config.token_transport);
    let pool = web::Data::new(pool);

    let purger = guard.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(PURGE_INTERVAL);
        loop {
            interval.tick().await;
            if let Err(e) = purger.purge_idle().await {
                log::error!("Failed to purge idle sessions: {:?}", e);
            }
        }
    });

    log::info!(
        "Starting keystone at {} (sessions idle out after {} minutes, {:?} transport)",
        config.server_url(),
        config.session_idle_minutes,
        config.token_transport
    );

    let cors_origin = config.cors_origin.clone();
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&cors_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(pool.clone())
            .app_data(credentials.clone())
            .app_data(guard.clone())
            .app_data(transport.clone())
            .app_data(error::json_config())
            .app_data(error::path_config())
            .app_data(error::query_config())
            .wrap(cors)
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
