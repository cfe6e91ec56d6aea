use crate::{
    error::AppError,
    models::{ContentBlock, ContentBlockInput, ContentBlockQuery},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

const BLOCK_COLUMNS: &str = "id, page_id, identifier, content, created_at, updated_at";

/// Lists content blocks, optionally only those of `?page_id=`.
#[get("")]
pub async fn list_content_blocks(
    pool: web::Data<PgPool>,
    query_params: web::Query<ContentBlockQuery>,
) -> Result<impl Responder, AppError> {
    let blocks = match query_params.page_id {
        Some(page_id) => {
            sqlx::query_as::<_, ContentBlock>(&format!(
                "SELECT {} FROM content_blocks WHERE page_id = $1 ORDER BY identifier",
                BLOCK_COLUMNS
            ))
            .bind(page_id)
            .fetch_all(&**pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, ContentBlock>(&format!(
                "SELECT {} FROM content_blocks ORDER BY page_id, identifier",
                BLOCK_COLUMNS
            ))
            .fetch_all(&**pool)
            .await?
        }
    };

    Ok(HttpResponse::Ok().json(blocks))
}

#[get("/{id}")]
pub async fn get_content_block(
    pool: web::Data<PgPool>,
    block_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let block = sqlx::query_as::<_, ContentBlock>(&format!(
        "SELECT {} FROM content_blocks WHERE id = $1",
        BLOCK_COLUMNS
    ))
    .bind(block_id.into_inner())
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Content block not found".into()))?;

    Ok(HttpResponse::Ok().json(block))
}

/// Creates a content block. `400` if the page does not exist, `409` if the page
/// already has a block with this identifier.
#[post("")]
pub async fn create_content_block(
    pool: web::Data<PgPool>,
    block_data: web::Json<ContentBlockInput>,
) -> Result<impl Responder, AppError> {
    block_data.validate()?;

    let block = sqlx::query_as::<_, ContentBlock>(&format!(
        "INSERT INTO content_blocks (page_id, identifier, content)
         VALUES ($1, $2, $3) RETURNING {}",
        BLOCK_COLUMNS
    ))
    .bind(block_data.page_id)
    .bind(&block_data.identifier)
    .bind(&block_data.content)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(block))
}

#[put("/{id}")]
pub async fn update_content_block(
    pool: web::Data<PgPool>,
    block_id: web::Path<i32>,
    block_data: web::Json<ContentBlockInput>,
) -> Result<impl Responder, AppError> {
    block_data.validate()?;

    let block = sqlx::query_as::<_, ContentBlock>(&format!(
        "UPDATE content_blocks
         SET page_id = $1, identifier = $2, content = $3, updated_at = NOW()
         WHERE id = $4 RETURNING {}",
        BLOCK_COLUMNS
    ))
    .bind(block_data.page_id)
    .bind(&block_data.identifier)
    .bind(&block_data.content)
    .bind(block_id.into_inner())
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Content block not found".into()))?;

    Ok(HttpResponse::Ok().json(block))
}

#[delete("/{id}")]
pub async fn delete_content_block(
    pool: web::Data<PgPool>,
    block_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let result = sqlx::query("DELETE FROM content_blocks WHERE id = $1")
        .bind(block_id.into_inner())
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Content block not found".into()));
    }

    Ok(HttpResponse::NoContent().finish())
}
