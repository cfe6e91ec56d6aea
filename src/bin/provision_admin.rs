//! Seeds the first administrator so someone can log in to a fresh deployment.
//!
//! Reads `ADMIN_LOGIN` (default `superadmin`) and `ADMIN_PASSWORD` from the
//! environment. Does nothing if an administrator with that login already exists.

use std::io;
use std::sync::Arc;

use keystone::auth::CredentialStore;
use keystone::config::Config;
use keystone::models::AdminInput;
use keystone::store::PgStore;
use sqlx::postgres::PgPoolOptions;

const DEFAULT_LOGIN: &str = "superadmin";

fn other<E: std::fmt::Display>(context: &str) -> impl FnOnce(E) -> io::Error + '_ {
    move |e| io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, e))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(other("Invalid configuration"))?;
    let login = std::env::var("ADMIN_LOGIN").unwrap_or_else(|_| DEFAULT_LOGIN.to_string());
    let password = std::env::var("ADMIN_PASSWORD")
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "ADMIN_PASSWORD must be set"))?;

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database_url)
        .await
        .map_err(other("Failed to connect to database"))?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(other("Failed to run migrations"))?;

    let credentials = CredentialStore::new(Arc::new(PgStore::new(pool)), config.bcrypt_cost);

    if credentials
        .exists(&login)
        .await
        .map_err(other("Failed to look up administrator"))?
    {
        log::info!("Administrator '{}' already exists, nothing to do", login);
        return Ok(());
    }

    let admin = credentials
        .create(&AdminInput { login, password })
        .await
        .map_err(other("Failed to create administrator"))?;
    log::info!("Created administrator '{}' (id {})", admin.login, admin.id);
    Ok(())
}
