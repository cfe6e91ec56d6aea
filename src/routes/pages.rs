use crate::{
    error::AppError,
    models::{ContentBlock, Page, PageInput, PageWithBlocks},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

const PAGE_COLUMNS: &str = "id, title, slug, created_at, updated_at";

/// Lists all pages ordered by title. Public.
#[get("")]
pub async fn list_pages(pool: web::Data<PgPool>) -> Result<impl Responder, AppError> {
    let pages = sqlx::query_as::<_, Page>(&format!(
        "SELECT {} FROM pages ORDER BY title",
        PAGE_COLUMNS
    ))
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(pages))
}

#[get("/{id}")]
pub async fn get_page(
    pool: web::Data<PgPool>,
    page_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let page = sqlx::query_as::<_, Page>(&format!(
        "SELECT {} FROM pages WHERE id = $1",
        PAGE_COLUMNS
    ))
    .bind(page_id.into_inner())
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Page not found".into()))?;

    Ok(HttpResponse::Ok().json(page))
}

/// Fetches a page by slug together with all of its content blocks, which is what the
/// public site needs to render one page.
///
/// ## Responses:
/// - `200 OK`: `PageWithBlocks`.
/// - `404 Not Found`: no page has this slug.
#[get("/slug/{slug}")]
pub async fn get_page_by_slug(
    pool: web::Data<PgPool>,
    slug: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let page = sqlx::query_as::<_, Page>(&format!(
        "SELECT {} FROM pages WHERE slug = $1",
        PAGE_COLUMNS
    ))
    .bind(slug.into_inner())
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Page not found".into()))?;

    let blocks = sqlx::query_as::<_, ContentBlock>(
        "SELECT id, page_id, identifier, content, created_at, updated_at
         FROM content_blocks WHERE page_id = $1 ORDER BY identifier",
    )
    .bind(page.id)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(PageWithBlocks { page, blocks }))
}

/// Creates a page. `409 Conflict` if the slug is taken.
#[post("")]
pub async fn create_page(
    pool: web::Data<PgPool>,
    page_data: web::Json<PageInput>,
) -> Result<impl Responder, AppError> {
    page_data.validate()?;

    let page = sqlx::query_as::<_, Page>(&format!(
        "INSERT INTO pages (title, slug) VALUES ($1, $2) RETURNING {}",
        PAGE_COLUMNS
    ))
    .bind(&page_data.title)
    .bind(&page_data.slug)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(page))
}

#[put("/{id}")]
pub async fn update_page(
    pool: web::Data<PgPool>,
    page_id: web::Path<i32>,
    page_data: web::Json<PageInput>,
) -> Result<impl Responder, AppError> {
    page_data.validate()?;

    let page = sqlx::query_as::<_, Page>(&format!(
        "UPDATE pages SET title = $1, slug = $2, updated_at = NOW()
         WHERE id = $3 RETURNING {}",
        PAGE_COLUMNS
    ))
    .bind(&page_data.title)
    .bind(&page_data.slug)
    .bind(page_id.into_inner())
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Page not found".into()))?;

    Ok(HttpResponse::Ok().json(page))
}

/// Deletes a page and, through the foreign key, its content blocks.
#[delete("/{id}")]
pub async fn delete_page(
    pool: web::Data<PgPool>,
    page_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let result = sqlx::query("DELETE FROM pages WHERE id = $1")
        .bind(page_id.into_inner())
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Page not found".into()));
    }

    Ok(HttpResponse::NoContent().finish())
}
