use crate::{
    error::AppError,
    models::{Service, ServiceInput},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

const SERVICE_COLUMNS: &str = "id, title, description, date, time, location, servant_id, \
                               parishioner_id, created_at, updated_at";

/// Lists the schedule of services in chronological order. Public.
#[get("")]
pub async fn list_services(pool: web::Data<PgPool>) -> Result<impl Responder, AppError> {
    let services = sqlx::query_as::<_, Service>(&format!(
        "SELECT {} FROM services ORDER BY date, time",
        SERVICE_COLUMNS
    ))
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(services))
}

#[get("/{id}")]
pub async fn get_service(
    pool: web::Data<PgPool>,
    service_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let service = sqlx::query_as::<_, Service>(&format!(
        "SELECT {} FROM services WHERE id = $1",
        SERVICE_COLUMNS
    ))
    .bind(service_id.into_inner())
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Service not found".into()))?;

    Ok(HttpResponse::Ok().json(service))
}

/// Schedules a service.
///
/// ## Responses:
/// - `201 Created`: the new `Service`.
/// - `400 Bad Request`: `servant_id` or `parishioner_id` does not exist.
/// - `422 Unprocessable Entity`: a required field is empty.
#[post("")]
pub async fn create_service(
    pool: web::Data<PgPool>,
    service_data: web::Json<ServiceInput>,
) -> Result<impl Responder, AppError> {
    service_data.validate()?;

    let service = sqlx::query_as::<_, Service>(&format!(
        "INSERT INTO services (title, description, date, time, location, servant_id, parishioner_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
        SERVICE_COLUMNS
    ))
    .bind(&service_data.title)
    .bind(&service_data.description)
    .bind(service_data.date)
    .bind(service_data.time)
    .bind(&service_data.location)
    .bind(service_data.servant_id)
    .bind(service_data.parishioner_id)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(service))
}

#[put("/{id}")]
pub async fn update_service(
    pool: web::Data<PgPool>,
    service_id: web::Path<i32>,
    service_data: web::Json<ServiceInput>,
) -> Result<impl Responder, AppError> {
    service_data.validate()?;

    let service = sqlx::query_as::<_, Service>(&format!(
        "UPDATE services
         SET title = $1, description = $2, date = $3, time = $4, location = $5,
             servant_id = $6, parishioner_id = $7, updated_at = NOW()
         WHERE id = $8 RETURNING {}",
        SERVICE_COLUMNS
    ))
    .bind(&service_data.title)
    .bind(&service_data.description)
    .bind(service_data.date)
    .bind(service_data.time)
    .bind(&service_data.location)
    .bind(service_data.servant_id)
    .bind(service_data.parishioner_id)
    .bind(service_id.into_inner())
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Service not found".into()))?;

    Ok(HttpResponse::Ok().json(service))
}

#[delete("/{id}")]
pub async fn delete_service(
    pool: web::Data<PgPool>,
    service_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let result = sqlx::query("DELETE FROM services WHERE id = $1")
        .bind(service_id.into_inner())
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Service not found".into()));
    }

    Ok(HttpResponse::NoContent().finish())
}
