use crate::{
    auth::{
        removal_cookie, session_cookie, token_from_request, AuthResponse, AuthenticatedAdmin,
        CredentialStore, LoginRequest, SessionGuard,
    },
    config::TokenTransport,
    error::AppError,
};
use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Login
///
/// Verifies `{login, password}` and opens a new session. The token is always in the
/// JSON body; in cookie mode it is also set as the `auth_token` cookie.
///
/// ## Responses:
/// - `200 OK`: `AuthResponse`.
/// - `401 Unauthorized`: wrong login or password (one message for both).
/// - `422 Unprocessable Entity`: empty login or password.
#[post("/login")]
pub async fn login(
    credentials: web::Data<CredentialStore>,
    guard: web::Data<SessionGuard>,
    transport: web::Data<TokenTransport>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let admin = credentials
        .verify(&login_data.login, &login_data.password)
        .await?;
    let token = guard.issue(&admin).await?;
    let expires_in = guard.idle_timeout().num_seconds();

    let mut response = HttpResponse::Ok();
    if **transport == TokenTransport::Cookie {
        response.cookie(session_cookie(&token, expires_in));
    }
    Ok(response.json(AuthResponse {
        token,
        admin_id: admin.id,
        login: admin.login,
        expires_in,
    }))
}

/// Logout
///
/// Revokes the presented token (bearer header or cookie). Revoking a token that no
/// longer exists answers `403` so the client knows nothing was revoked.
#[post("/logout")]
pub async fn logout(
    req: HttpRequest,
    guard: web::Data<SessionGuard>,
    transport: web::Data<TokenTransport>,
) -> Result<impl Responder, AppError> {
    let token = token_from_request(&req);
    guard.revoke(token.as_deref()).await?;

    let mut response = HttpResponse::Ok();
    if **transport == TokenTransport::Cookie {
        response.cookie(removal_cookie());
    }
    Ok(response.json(json!({ "message": "Logged out" })))
}

/// The administrator that owns the presented session.
#[get("/me")]
pub async fn me(current: AuthenticatedAdmin) -> impl Responder {
    HttpResponse::Ok().json(current.admin)
}
