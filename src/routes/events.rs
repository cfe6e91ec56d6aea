use crate::{
    error::AppError,
    models::{Event, EventInput},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

const EVENT_COLUMNS: &str = "id, title, description, date, time, location, servant_id, \
                             parishioner_id, created_at, updated_at";

/// Lists events by date; events without a time of day come first on their date.
#[get("")]
pub async fn list_events(pool: web::Data<PgPool>) -> Result<impl Responder, AppError> {
    let events = sqlx::query_as::<_, Event>(&format!(
        "SELECT {} FROM events ORDER BY date, time NULLS FIRST",
        EVENT_COLUMNS
    ))
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(events))
}

#[get("/{id}")]
pub async fn get_event(
    pool: web::Data<PgPool>,
    event_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let event = sqlx::query_as::<_, Event>(&format!(
        "SELECT {} FROM events WHERE id = $1",
        EVENT_COLUMNS
    ))
    .bind(event_id.into_inner())
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Event not found".into()))?;

    Ok(HttpResponse::Ok().json(event))
}

#[post("")]
pub async fn create_event(
    pool: web::Data<PgPool>,
    event_data: web::Json<EventInput>,
) -> Result<impl Responder, AppError> {
    event_data.validate()?;

    let event = sqlx::query_as::<_, Event>(&format!(
        "INSERT INTO events (title, description, date, time, location, servant_id, parishioner_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
        EVENT_COLUMNS
    ))
    .bind(&event_data.title)
    .bind(&event_data.description)
    .bind(event_data.date)
    .bind(event_data.time)
    .bind(&event_data.location)
    .bind(event_data.servant_id)
    .bind(event_data.parishioner_id)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(event))
}

#[put("/{id}")]
pub async fn update_event(
    pool: web::Data<PgPool>,
    event_id: web::Path<i32>,
    event_data: web::Json<EventInput>,
) -> Result<impl Responder, AppError> {
    event_data.validate()?;

    let event = sqlx::query_as::<_, Event>(&format!(
        "UPDATE events
         SET title = $1, description = $2, date = $3, time = $4, location = $5,
             servant_id = $6, parishioner_id = $7, updated_at = NOW()
         WHERE id = $8 RETURNING {}",
        EVENT_COLUMNS
    ))
    .bind(&event_data.title)
    .bind(&event_data.description)
    .bind(event_data.date)
    .bind(event_data.time)
    .bind(&event_data.location)
    .bind(event_data.servant_id)
    .bind(event_data.parishioner_id)
    .bind(event_id.into_inner())
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Event not found".into()))?;

    Ok(HttpResponse::Ok().json(event))
}

#[delete("/{id}")]
pub async fn delete_event(
    pool: web::Data<PgPool>,
    event_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let result = sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(event_id.into_inner())
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Event not found".into()));
    }

    Ok(HttpResponse::NoContent().finish())
}
