use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::Admin;

/// The administrator behind the current request, together with the session token it
/// presented.
///
/// `AuthMiddleware` inserts this into the request extensions after a successful
/// validation; handlers on protected routes take it as an argument. On a route the
/// middleware did not guard, extraction fails with `401 Unauthorized`.
#[derive(Debug, Clone)]
pub struct AuthenticatedAdmin {
    pub admin: Admin,
    pub token: String,
}

impl FromRequest for AuthenticatedAdmin {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedAdmin>().cloned() {
            Some(authenticated) => ready(Ok(authenticated)),
            None => {
                let err = AppError::Unauthorized("Authentication required".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
