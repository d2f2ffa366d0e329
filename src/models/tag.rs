use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::AppError;

/// A named label owned by exactly one user. The (owner, name) pair is
/// unique; two users may each have a tag with the same name.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Tag {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
}

/// Input for creating a tag. An absent name deserializes as empty and is
/// rejected by `validate`.
#[derive(Debug, Deserialize)]
pub struct TagInput {
    #[serde(default)]
    pub name: String,
}

impl TagInput {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::MissingField("name"));
        }
        Ok(())
    }
}

impl Tag {
    pub async fn create(pool: &PgPool, user_id: Uuid, input: &TagInput) -> Result<Tag, AppError> {
        input.validate()?;

        sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (id, user_id, name)
             VALUES ($1, $2, $3)
             RETURNING id, user_id, name",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&input.name)
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::from_unique(e, "tag already exists"))
    }

    pub async fn list(pool: &PgPool, user_id: Uuid) -> Result<Vec<Tag>, AppError> {
        let tags =
            sqlx::query_as::<_, Tag>("SELECT id, user_id, name FROM tags WHERE user_id = $1 ORDER BY name")
                .bind(user_id)
                .fetch_all(pool)
                .await?;

        Ok(tags)
    }

    /// Deletes a tag owned by the given user. Join rows referencing the tag
    /// go with it; tasks themselves are untouched.
    pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("tag not found".into()));
        }
        Ok(())
    }

    /// Checks that every id in `tag_ids` names a tag owned by `user_id`.
    /// Tasks may only reference their owner's tags.
    pub async fn all_owned_by(
        pool: &PgPool,
        user_id: Uuid,
        tag_ids: &[Uuid],
    ) -> Result<(), AppError> {
        if tag_ids.is_empty() {
            return Ok(());
        }

        let mut unique = tag_ids.to_vec();
        unique.sort();
        unique.dedup();

        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM tags WHERE user_id = $1 AND id = ANY($2)")
                .bind(user_id)
                .bind(&unique)
                .fetch_one(pool)
                .await?;

        if count as usize != unique.len() {
            return Err(AppError::BadRequest("tag does not exist".into()));
        }
        Ok(())
    }
}
