use std::env;
use std::fmt;
use std::str::FromStr;

use chrono::Duration;

/// How the session token travels back to the client after login.
///
/// Both transports are always accepted on incoming requests; this only decides
/// whether login and logout also manage the `auth_token` cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenTransport {
    Bearer,
    Cookie,
}

impl FromStr for TokenTransport {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bearer" => Ok(TokenTransport::Bearer),
            "cookie" => Ok(TokenTransport::Cookie),
            other => Err(ConfigError(format!(
                "TOKEN_TRANSPORT must be 'bearer' or 'cookie', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(pub String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Configuration error: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    pub session_idle_minutes: i64,
    pub token_transport: TokenTransport,
    pub bcrypt_cost: u32,
    pub cors_origin: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, so tests don't have to touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| ConfigError("DATABASE_URL must be set".into()))?;

        let session_idle_minutes: i64 = parse_or(&lookup, "SESSION_IDLE_MINUTES", 60)?;
        if session_idle_minutes <= 0 {
            return Err(ConfigError("SESSION_IDLE_MINUTES must be positive".into()));
        }

        let bcrypt_cost: u32 = parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError("BCRYPT_COST must be between 4 and 31".into()));
        }

        Ok(Self {
            database_url,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            server_port: parse_or(&lookup, "SERVER_PORT", 8080)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            session_idle_minutes,
            token_transport: parse_or(&lookup, "TOKEN_TRANSPORT", TokenTransport::Bearer)?,
            bcrypt_cost,
            cors_origin: lookup("CORS_ORIGIN")
                .unwrap_or_else(|| "http://localhost:5173".to_string()),
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }

    pub fn session_idle_timeout(&self) -> Duration {
        Duration::minutes(self.session_idle_minutes)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError(format!("{} has an invalid value: '{}'", key, raw))),
        None => Ok(default),
    }
}
