use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{Task, TaskInput},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

/// Query parameters for listing tasks. `tags` is a comma-separated list of
/// tag ids; a task matches only if it carries every one of them.
#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    pub tags: Option<String>,
}

impl TaskListQuery {
    fn tag_ids(&self) -> Result<Vec<Uuid>, AppError> {
        match &self.tags {
            None => Ok(Vec::new()),
            Some(raw) => raw
                .split(',')
                .filter(|part| !part.is_empty())
                .map(|part| {
                    Uuid::parse_str(part)
                        .map_err(|_| AppError::BadRequest("invalid tag id".into()))
                })
                .collect(),
        }
    }
}

/// Lists the authenticated user's tasks, optionally narrowed to those
/// carrying all of the queried tags.
#[get("")]
pub async fn list_tasks(
    pool: web::Data<PgPool>,
    user: AuthenticatedUserId,
    query: web::Query<TaskListQuery>,
) -> Result<impl Responder, AppError> {
    let filter = query.tag_ids()?;
    let tasks = Task::list(&pool, user.0, &filter).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task for the authenticated user.
///
/// Name, start and end are required; the start instant must not come after
/// the end instant. Referenced tags must already exist and belong to the
/// same user.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    user: AuthenticatedUserId,
    body: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let task = Task::create(&pool, user.0, &body).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Fetches one of the authenticated user's tasks. Another user's task is a
/// 404, never a 403: the scoped query simply finds nothing.
#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    user: AuthenticatedUserId,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = Task::find(&pool, user.0, task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Replaces the name, bounds and tag set of an owned task. The same
/// validation as creation applies.
#[put("/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    user: AuthenticatedUserId,
    task_id: web::Path<Uuid>,
    body: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let task = Task::update(&pool, user.0, task_id.into_inner(), &body).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes an owned task along with its tag references.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    user: AuthenticatedUserId,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    Task::delete(&pool, user.0, task_id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_filter_parsing() {
        let none = TaskListQuery { tags: None };
        assert!(none.tag_ids().unwrap().is_empty());

        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let two = TaskListQuery {
            tags: Some(format!("{},{}", a, b)),
        };
        assert_eq!(two.tag_ids().unwrap(), vec![a, b]);

        let empty = TaskListQuery {
            tags: Some(String::new()),
        };
        assert!(empty.tag_ids().unwrap().is_empty());

        let junk = TaskListQuery {
            tags: Some("not-a-uuid".to_string()),
        };
        assert!(matches!(junk.tag_ids(), Err(AppError::BadRequest(_))));
    }
}
