use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::extractors::AuthenticatedAdmin;
use crate::auth::session::SessionGuard;
use crate::auth::token_from_request;
use crate::error::AppError;

/// Resource collections anyone may read.
const PUBLIC_READ_PREFIXES: &[&str] = &[
    "/api/pages",
    "/api/content-blocks",
    "/api/services",
    "/api/events",
    "/api/news",
    "/api/posts",
];

/// Whether a request may skip session validation.
pub fn is_public(method: &Method, path: &str) -> bool {
    let path = path.trim_end_matches('/');
    if path == "/health" || path == "/api/auth/login" || path == "/api/auth/logout" {
        return true;
    }
    if *method == Method::POST && path == "/api/needs" {
        return true;
    }
    *method == Method::GET
        && PUBLIC_READ_PREFIXES
            .iter()
            .any(|prefix| path == *prefix || path.starts_with(&format!("{}/", prefix)))
}

/// Validates the session token of every non-public request and stores the resolved
/// [`AuthenticatedAdmin`] in the request extensions.
///
/// Requires a `web::Data<SessionGuard>` in the app data.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if is_public(req.method(), req.path()) {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let Some(guard) = req.app_data::<web::Data<SessionGuard>>().cloned() else {
            let err = AppError::InternalServerError("SessionGuard is not configured".into());
            return Box::pin(async move { Err(err.into()) });
        };

        let token = token_from_request(req.request());
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let admin = guard
                .validate(token.as_deref())
                .await
                .map_err(AppError::from)?;

            if let Some(token) = token {
                req.extensions_mut()
                    .insert(AuthenticatedAdmin { admin, token });
            }
            service.call(req).await
        })
    }
}
