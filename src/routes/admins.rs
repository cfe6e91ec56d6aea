use crate::{
    auth::{AuthenticatedAdmin, CredentialStore},
    error::AppError,
    models::{AdminInput, AdminUpdate},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};

/// Lists all administrators (without password hashes).
#[get("")]
pub async fn list_admins(credentials: web::Data<CredentialStore>) -> Result<impl Responder, AppError> {
    let admins = credentials.list().await?;
    Ok(HttpResponse::Ok().json(admins))
}

#[get("/{id}")]
pub async fn get_admin(
    credentials: web::Data<CredentialStore>,
    admin_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let admin = credentials.get(admin_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(admin))
}

/// Creates an administrator.
///
/// ## Responses:
/// - `201 Created`: the new `Admin`.
/// - `409 Conflict`: the login is taken.
/// - `422 Unprocessable Entity`: invalid login or too short password.
#[post("")]
pub async fn create_admin(
    credentials: web::Data<CredentialStore>,
    current: AuthenticatedAdmin,
    input: web::Json<AdminInput>,
) -> Result<impl Responder, AppError> {
    let admin = credentials.create(&input).await?;
    log::info!(
        "Administrator {} created administrator '{}'",
        current.admin.id,
        admin.login
    );
    Ok(HttpResponse::Created().json(admin))
}

/// Changes login and/or password. Omitted fields stay as they are.
#[put("/{id}")]
pub async fn update_admin(
    credentials: web::Data<CredentialStore>,
    admin_id: web::Path<i32>,
    changes: web::Json<AdminUpdate>,
) -> Result<impl Responder, AppError> {
    let admin = credentials.update(admin_id.into_inner(), &changes).await?;
    Ok(HttpResponse::Ok().json(admin))
}

/// Deletes an administrator and ends all of its sessions.
#[delete("/{id}")]
pub async fn delete_admin(
    credentials: web::Data<CredentialStore>,
    current: AuthenticatedAdmin,
    admin_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let admin_id = admin_id.into_inner();
    credentials.delete(admin_id).await?;
    log::info!(
        "Administrator {} deleted administrator {}",
        current.admin.id,
        admin_id
    );
    Ok(HttpResponse::NoContent().finish())
}
