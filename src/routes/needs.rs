use crate::{
    error::AppError,
    models::{Need, NeedInput},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

const NEED_COLUMNS: &str = "id, title, content, email, phone, name, surname, created_at, updated_at";

/// Lists prayer requests, newest first. Admin only.
#[get("")]
pub async fn list_needs(pool: web::Data<PgPool>) -> Result<impl Responder, AppError> {
    let needs = sqlx::query_as::<_, Need>(&format!(
        "SELECT {} FROM needs ORDER BY created_at DESC",
        NEED_COLUMNS
    ))
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(needs))
}

#[get("/{id}")]
pub async fn get_need(
    pool: web::Data<PgPool>,
    need_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let need = sqlx::query_as::<_, Need>(&format!(
        "SELECT {} FROM needs WHERE id = $1",
        NEED_COLUMNS
    ))
    .bind(need_id.into_inner())
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Need not found".into()))?;

    Ok(HttpResponse::Ok().json(need))
}

/// Submits a prayer request. Open to visitors of the site.
#[post("")]
pub async fn create_need(
    pool: web::Data<PgPool>,
    need_data: web::Json<NeedInput>,
) -> Result<impl Responder, AppError> {
    need_data.validate()?;

    let need = sqlx::query_as::<_, Need>(&format!(
        "INSERT INTO needs (title, content, email, phone, name, surname)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
        NEED_COLUMNS
    ))
    .bind(&need_data.title)
    .bind(&need_data.content)
    .bind(&need_data.email)
    .bind(&need_data.phone)
    .bind(&need_data.name)
    .bind(&need_data.surname)
    .fetch_one(&**pool)
    .await?;

    log::info!("Received prayer request {}", need.id);
    Ok(HttpResponse::Created().json(need))
}

#[put("/{id}")]
pub async fn update_need(
    pool: web::Data<PgPool>,
    need_id: web::Path<i32>,
    need_data: web::Json<NeedInput>,
) -> Result<impl Responder, AppError> {
    need_data.validate()?;

    let need = sqlx::query_as::<_, Need>(&format!(
        "UPDATE needs
         SET title = $1, content = $2, email = $3, phone = $4, name = $5, surname = $6,
             updated_at = NOW()
         WHERE id = $7 RETURNING {}",
        NEED_COLUMNS
    ))
    .bind(&need_data.title)
    .bind(&need_data.content)
    .bind(&need_data.email)
    .bind(&need_data.phone)
    .bind(&need_data.name)
    .bind(&need_data.surname)
    .bind(need_id.into_inner())
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Need not found".into()))?;

    Ok(HttpResponse::Ok().json(need))
}

#[delete("/{id}")]
pub async fn delete_need(
    pool: web::Data<PgPool>,
    need_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let result = sqlx::query("DELETE FROM needs WHERE id = $1")
        .bind(need_id.into_inner())
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Need not found".into()));
    }

    Ok(HttpResponse::NoContent().finish())
}
