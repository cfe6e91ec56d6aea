use crate::{
    error::AppError,
    models::{Post, PostInput},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

const POST_COLUMNS: &str = "id, title, content, created_at, updated_at";

#[get("")]
pub async fn list_posts(pool: web::Data<PgPool>) -> Result<impl Responder, AppError> {
    let posts = sqlx::query_as::<_, Post>(&format!(
        "SELECT {} FROM posts ORDER BY created_at DESC",
        POST_COLUMNS
    ))
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(posts))
}

#[get("/{id}")]
pub async fn get_post(
    pool: web::Data<PgPool>,
    post_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let post = sqlx::query_as::<_, Post>(&format!(
        "SELECT {} FROM posts WHERE id = $1",
        POST_COLUMNS
    ))
    .bind(post_id.into_inner())
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Post not found".into()))?;

    Ok(HttpResponse::Ok().json(post))
}

#[post("")]
pub async fn create_post(
    pool: web::Data<PgPool>,
    post_data: web::Json<PostInput>,
) -> Result<impl Responder, AppError> {
    post_data.validate()?;

    let post = sqlx::query_as::<_, Post>(&format!(
        "INSERT INTO posts (title, content) VALUES ($1, $2) RETURNING {}",
        POST_COLUMNS
    ))
    .bind(&post_data.title)
    .bind(&post_data.content)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(post))
}

#[put("/{id}")]
pub async fn update_post(
    pool: web::Data<PgPool>,
    post_id: web::Path<i32>,
    post_data: web::Json<PostInput>,
) -> Result<impl Responder, AppError> {
    post_data.validate()?;

    let post = sqlx::query_as::<_, Post>(&format!(
        "UPDATE posts SET title = $1, content = $2, updated_at = NOW()
         WHERE id = $3 RETURNING {}",
        POST_COLUMNS
    ))
    .bind(&post_data.title)
    .bind(&post_data.content)
    .bind(post_id.into_inner())
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Post not found".into()))?;

    Ok(HttpResponse::Ok().json(post))
}

#[delete("/{id}")]
pub async fn delete_post(
    pool: web::Data<PgPool>,
    post_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id.into_inner())
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Post not found".into()));
    }

    Ok(HttpResponse::NoContent().finish())
}
