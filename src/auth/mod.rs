pub mod credentials;
pub mod extractors;
pub mod middleware;
pub mod password;
pub mod session;

use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie, SameSite},
    http::header,
    HttpRequest,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub use credentials::CredentialStore;
pub use extractors::AuthenticatedAdmin;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use session::{GuardError, GuardFailure, SessionGuard};

/// Name of the cookie carrying the session token in cookie mode.
pub const AUTH_COOKIE: &str = "auth_token";

/// Payload for `POST /api/auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50))]
    pub login: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Returned by a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Opaque session token; send it back as `Authorization: Bearer <token>` or in the
    /// `auth_token` cookie.
    pub token: String,
    pub admin_id: i32,
    pub login: String,
    /// Idle seconds after which the token stops working.
    pub expires_in: i64,
}

/// Takes the session token from the `Authorization: Bearer` header, falling back to
/// the `auth_token` cookie.
pub fn token_from_request(req: &HttpRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    match bearer {
        Some(token) => Some(token.to_string()),
        None => req
            .cookie(AUTH_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|token| !token.is_empty()),
    }
}

/// The `auth_token` cookie set at login.
pub fn session_cookie(token: &str, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build(AUTH_COOKIE, token.to_string())
        .path("/")
        .max_age(CookieDuration::seconds(max_age_secs))
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

/// A cookie that makes the browser drop `auth_token`.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(AUTH_COOKIE, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish();
    cookie.make_removal();
    cookie
}
