use crate::{
    error::AppError,
    models::{News, NewsInput},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

const NEWS_COLUMNS: &str = "id, identifier, title, content, created_at, updated_at";

/// Lists news, newest first. Public.
#[get("")]
pub async fn list_news(pool: web::Data<PgPool>) -> Result<impl Responder, AppError> {
    let news = sqlx::query_as::<_, News>(&format!(
        "SELECT {} FROM news ORDER BY created_at DESC",
        NEWS_COLUMNS
    ))
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(news))
}

/// Fetches one news item by its public identifier.
#[get("/{identifier}")]
pub async fn get_news(
    pool: web::Data<PgPool>,
    identifier: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let news = sqlx::query_as::<_, News>(&format!(
        "SELECT {} FROM news WHERE identifier = $1",
        NEWS_COLUMNS
    ))
    .bind(identifier.into_inner())
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("News not found".into()))?;

    Ok(HttpResponse::Ok().json(news))
}

#[post("")]
pub async fn create_news(
    pool: web::Data<PgPool>,
    news_data: web::Json<NewsInput>,
) -> Result<impl Responder, AppError> {
    news_data.validate()?;

    let news = sqlx::query_as::<_, News>(&format!(
        "INSERT INTO news (identifier, title, content) VALUES ($1, $2, $3) RETURNING {}",
        NEWS_COLUMNS
    ))
    .bind(&news_data.identifier)
    .bind(&news_data.title)
    .bind(&news_data.content)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(news))
}

#[put("/{identifier}")]
pub async fn update_news(
    pool: web::Data<PgPool>,
    identifier: web::Path<String>,
    news_data: web::Json<NewsInput>,
) -> Result<impl Responder, AppError> {
    news_data.validate()?;

    let news = sqlx::query_as::<_, News>(&format!(
        "UPDATE news SET identifier = $1, title = $2, content = $3, updated_at = NOW()
         WHERE identifier = $4 RETURNING {}",
        NEWS_COLUMNS
    ))
    .bind(&news_data.identifier)
    .bind(&news_data.title)
    .bind(&news_data.content)
    .bind(identifier.into_inner())
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("News not found".into()))?;

    Ok(HttpResponse::Ok().json(news))
}

#[delete("/{identifier}")]
pub async fn delete_news(
    pool: web::Data<PgPool>,
    identifier: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let result = sqlx::query("DELETE FROM news WHERE identifier = $1")
        .bind(identifier.into_inner())
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("News not found".into()));
    }

    Ok(HttpResponse::NoContent().finish())
}
