use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{Tag, TagInput},
};
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;

/// Lists the authenticated user's tags, ordered by name.
#[get("")]
pub async fn list_tags(
    pool: web::Data<PgPool>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let tags = Tag::list(&pool, user.0).await?;
    Ok(HttpResponse::Ok().json(tags))
}

/// Creates a tag for the authenticated user.
///
/// Names are unique per user; a second tag with the same name is a 409.
/// Another user is free to create a tag with the same name.
#[post("")]
pub async fn create_tag(
    pool: web::Data<PgPool>,
    user: AuthenticatedUserId,
    body: web::Json<TagInput>,
) -> Result<impl Responder, AppError> {
    let tag = Tag::create(&pool, user.0, &body).await?;
    Ok(HttpResponse::Created().json(tag))
}

/// Deletes a tag owned by the authenticated user. Tasks that referenced the
/// tag keep existing; only the references disappear.
#[delete("/{id}")]
pub async fn delete_tag(
    pool: web::Data<PgPool>,
    user: AuthenticatedUserId,
    tag_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    Tag::delete(&pool, user.0, tag_id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
