use crate::{
    error::AppError,
    models::{Parishioner, ParishionerInput},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

const PARISHIONER_COLUMNS: &str =
    "id, name, surname, email, phone, birth_date, created_at, updated_at";

#[get("")]
pub async fn list_parishioners(pool: web::Data<PgPool>) -> Result<impl Responder, AppError> {
    let parishioners = sqlx::query_as::<_, Parishioner>(&format!(
        "SELECT {} FROM parishioners ORDER BY surname, name",
        PARISHIONER_COLUMNS
    ))
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(parishioners))
}

#[get("/{id}")]
pub async fn get_parishioner(
    pool: web::Data<PgPool>,
    parishioner_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let parishioner = sqlx::query_as::<_, Parishioner>(&format!(
        "SELECT {} FROM parishioners WHERE id = $1",
        PARISHIONER_COLUMNS
    ))
    .bind(parishioner_id.into_inner())
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Parishioner not found".into()))?;

    Ok(HttpResponse::Ok().json(parishioner))
}

#[post("")]
pub async fn create_parishioner(
    pool: web::Data<PgPool>,
    parishioner_data: web::Json<ParishionerInput>,
) -> Result<impl Responder, AppError> {
    parishioner_data.validate()?;

    let parishioner = sqlx::query_as::<_, Parishioner>(&format!(
        "INSERT INTO parishioners (name, surname, email, phone, birth_date)
         VALUES ($1, $2, $3, $4, $5) RETURNING {}",
        PARISHIONER_COLUMNS
    ))
    .bind(&parishioner_data.name)
    .bind(&parishioner_data.surname)
    .bind(&parishioner_data.email)
    .bind(&parishioner_data.phone)
    .bind(parishioner_data.birth_date)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(parishioner))
}

#[put("/{id}")]
pub async fn update_parishioner(
    pool: web::Data<PgPool>,
    parishioner_id: web::Path<i32>,
    parishioner_data: web::Json<ParishionerInput>,
) -> Result<impl Responder, AppError> {
    parishioner_data.validate()?;

    let parishioner = sqlx::query_as::<_, Parishioner>(&format!(
        "UPDATE parishioners
         SET name = $1, surname = $2, email = $3, phone = $4, birth_date = $5,
             updated_at = NOW()
         WHERE id = $6 RETURNING {}",
        PARISHIONER_COLUMNS
    ))
    .bind(&parishioner_data.name)
    .bind(&parishioner_data.surname)
    .bind(&parishioner_data.email)
    .bind(&parishioner_data.phone)
    .bind(parishioner_data.birth_date)
    .bind(parishioner_id.into_inner())
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Parishioner not found".into()))?;

    Ok(HttpResponse::Ok().json(parishioner))
}

#[delete("/{id}")]
pub async fn delete_parishioner(
    pool: web::Data<PgPool>,
    parishioner_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let result = sqlx::query("DELETE FROM parishioners WHERE id = $1")
        .bind(parishioner_id.into_inner())
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Parishioner not found".into()));
    }

    Ok(HttpResponse::NoContent().finish())
}
