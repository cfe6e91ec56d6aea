use crate::{
    error::AppError,
    models::{Servant, ServantInput},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

const SERVANT_COLUMNS: &str =
    "id, name, surname, email, phone, role, birth_date, created_at, updated_at";

/// Lists the parish staff by surname. Admin only, as the rows carry contact data.
#[get("")]
pub async fn list_servants(pool: web::Data<PgPool>) -> Result<impl Responder, AppError> {
    let servants = sqlx::query_as::<_, Servant>(&format!(
        "SELECT {} FROM servants ORDER BY surname, name",
        SERVANT_COLUMNS
    ))
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(servants))
}

#[get("/{id}")]
pub async fn get_servant(
    pool: web::Data<PgPool>,
    servant_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let servant = sqlx::query_as::<_, Servant>(&format!(
        "SELECT {} FROM servants WHERE id = $1",
        SERVANT_COLUMNS
    ))
    .bind(servant_id.into_inner())
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Servant not found".into()))?;

    Ok(HttpResponse::Ok().json(servant))
}

/// Creates a servant. `409 Conflict` if email or phone is already used.
#[post("")]
pub async fn create_servant(
    pool: web::Data<PgPool>,
    servant_data: web::Json<ServantInput>,
) -> Result<impl Responder, AppError> {
    servant_data.validate()?;

    let servant = sqlx::query_as::<_, Servant>(&format!(
        "INSERT INTO servants (name, surname, email, phone, role, birth_date)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
        SERVANT_COLUMNS
    ))
    .bind(&servant_data.name)
    .bind(&servant_data.surname)
    .bind(&servant_data.email)
    .bind(&servant_data.phone)
    .bind(&servant_data.role)
    .bind(servant_data.birth_date)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(servant))
}

#[put("/{id}")]
pub async fn update_servant(
    pool: web::Data<PgPool>,
    servant_id: web::Path<i32>,
    servant_data: web::Json<ServantInput>,
) -> Result<impl Responder, AppError> {
    servant_data.validate()?;

    let servant = sqlx::query_as::<_, Servant>(&format!(
        "UPDATE servants
         SET name = $1, surname = $2, email = $3, phone = $4, role = $5, birth_date = $6,
             updated_at = NOW()
         WHERE id = $7 RETURNING {}",
        SERVANT_COLUMNS
    ))
    .bind(&servant_data.name)
    .bind(&servant_data.surname)
    .bind(&servant_data.email)
    .bind(&servant_data.phone)
    .bind(&servant_data.role)
    .bind(servant_data.birth_date)
    .bind(servant_id.into_inner())
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Servant not found".into()))?;

    Ok(HttpResponse::Ok().json(servant))
}

/// Deletes a servant; services and events led by them go too.
#[delete("/{id}")]
pub async fn delete_servant(
    pool: web::Data<PgPool>,
    servant_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let result = sqlx::query("DELETE FROM servants WHERE id = $1")
        .bind(servant_id.into_inner())
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Servant not found".into()));
    }

    Ok(HttpResponse::NoContent().finish())
}
