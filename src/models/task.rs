use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::tag::Tag;

/// A time-bounded unit of work owned by one user, carrying zero or more of
/// that user's tags. Stored columns are `start_at`/`end_at`; on the wire the
/// fields are `start`/`end`.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[serde(rename = "start")]
    pub start_at: DateTime<Utc>,
    #[serde(rename = "end")]
    pub end_at: DateTime<Utc>,
    pub tags: Vec<Uuid>,
}

/// Input for creating or updating a task. `start` and `end` are optional at
/// the deserialization boundary so their absence is reported as a missing
/// field rather than a parse failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskInput {
    #[serde(default)]
    pub name: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<Uuid>,
}

impl TaskInput {
    /// Required-field and cross-field checks, run before any persistence.
    /// The start instant may equal the end instant; only `start > end` is an
    /// ordering violation.
    pub fn validate(&self) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::MissingField("name"));
        }
        let start = self.start.ok_or(AppError::MissingField("start date"))?;
        let end = self.end.ok_or(AppError::MissingField("end date"))?;
        if start > end {
            return Err(AppError::BadRequest(
                "start date should be less than end date".into(),
            ));
        }
        Ok((start, end))
    }

    fn unique_tags(&self) -> Vec<Uuid> {
        let mut tags = self.tags.clone();
        tags.sort();
        tags.dedup();
        tags
    }
}

/// Selects tasks with their tag ids aggregated into one array column.
const TASK_SELECT: &str = "SELECT t.id, t.user_id, t.name, t.start_at, t.end_at, \
     COALESCE(array_agg(tt.tag_id) FILTER (WHERE tt.tag_id IS NOT NULL), ARRAY[]::uuid[]) AS tags \
     FROM tasks t \
     LEFT JOIN task_tags tt ON tt.task_id = t.id";

impl Task {
    pub async fn create(pool: &PgPool, user_id: Uuid, input: &TaskInput) -> Result<Task, AppError> {
        let (start, end) = input.validate()?;
        let tags = input.unique_tags();
        Tag::all_owned_by(pool, user_id, &tags).await?;

        // Task row and tag references land together or not at all.
        let id = Uuid::new_v4();
        let mut tx = pool.begin().await?;
        sqlx::query(
            "INSERT INTO tasks (id, user_id, name, start_at, end_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(user_id)
        .bind(&input.name)
        .bind(start)
        .bind(end)
        .execute(&mut *tx)
        .await?;

        Self::attach_tags(&mut tx, id, &tags).await?;
        tx.commit().await?;

        Ok(Task {
            id,
            user_id,
            name: input.name.clone(),
            start_at: start,
            end_at: end,
            tags,
        })
    }

    /// Fetches one task by id, scoped to its owner.
    pub async fn find(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<Task, AppError> {
        let sql = format!(
            "{} WHERE t.user_id = $1 AND t.id = $2 GROUP BY t.id",
            TASK_SELECT
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(user_id)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        task.ok_or_else(|| AppError::NotFound("task not found".into()))
    }

    /// Lists the owner's tasks. With a non-empty `tag_filter`, only tasks
    /// carrying every one of the given tag ids are returned.
    pub async fn list(
        pool: &PgPool,
        user_id: Uuid,
        tag_filter: &[Uuid],
    ) -> Result<Vec<Task>, AppError> {
        let mut filter = tag_filter.to_vec();
        filter.sort();
        filter.dedup();

        let tasks = if filter.is_empty() {
            let sql = format!(
                "{} WHERE t.user_id = $1 GROUP BY t.id ORDER BY t.start_at",
                TASK_SELECT
            );
            sqlx::query_as::<_, Task>(&sql)
                .bind(user_id)
                .fetch_all(pool)
                .await?
        } else {
            let sql = format!(
                "{} WHERE t.user_id = $1 GROUP BY t.id \
                 HAVING COUNT(DISTINCT tt.tag_id) FILTER (WHERE tt.tag_id = ANY($2)) = $3 \
                 ORDER BY t.start_at",
                TASK_SELECT
            );
            sqlx::query_as::<_, Task>(&sql)
                .bind(user_id)
                .bind(&filter)
                .bind(filter.len() as i64)
                .fetch_all(pool)
                .await?
        };

        Ok(tasks)
    }

    /// Updates name, bounds and tag set of an owned task.
    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        input: &TaskInput,
    ) -> Result<Task, AppError> {
        let (start, end) = input.validate()?;
        let tags = input.unique_tags();
        Tag::all_owned_by(pool, user_id, &tags).await?;

        // The row update and the tag-set swap commit together; a failure
        // anywhere rolls back, leaving the previous tag set intact.
        let mut tx = pool.begin().await?;
        let result = sqlx::query(
            "UPDATE tasks SET name = $1, start_at = $2, end_at = $3
             WHERE id = $4 AND user_id = $5",
        )
        .bind(&input.name)
        .bind(start)
        .bind(end)
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("task not found".into()));
        }

        sqlx::query("DELETE FROM task_tags WHERE task_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        Self::attach_tags(&mut tx, id, &tags).await?;
        tx.commit().await?;

        Ok(Task {
            id,
            user_id,
            name: input.name.clone(),
            start_at: start,
            end_at: end,
            tags,
        })
    }

    pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("task not found".into()));
        }
        Ok(())
    }

    async fn attach_tags(
        conn: &mut PgConnection,
        task_id: Uuid,
        tags: &[Uuid],
    ) -> Result<(), AppError> {
        for tag_id in tags {
            sqlx::query("INSERT INTO task_tags (task_id, tag_id) VALUES ($1, $2)")
                .bind(task_id)
                .bind(tag_id)
                .execute(&mut *conn)
                .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn input(name: &str, start: Option<i64>, end: Option<i64>) -> TaskInput {
        TaskInput {
            name: name.to_string(),
            start: start.map(|s| Utc.timestamp_opt(s, 0).unwrap()),
            end: end.map(|s| Utc.timestamp_opt(s, 0).unwrap()),
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_task_input_required_fields() {
        match input("", Some(0), Some(10)).validate() {
            Err(AppError::MissingField("name")) => {}
            other => panic!("expected missing name, got {:?}", other),
        }
        match input("t", None, Some(10)).validate() {
            Err(AppError::MissingField("start date")) => {}
            other => panic!("expected missing start date, got {:?}", other),
        }
        match input("t", Some(0), None).validate() {
            Err(AppError::MissingField("end date")) => {}
            other => panic!("expected missing end date, got {:?}", other),
        }
    }

    #[test]
    fn test_task_input_date_ordering() {
        // start > end is rejected with a message naming both bounds.
        match input("t", Some(10), Some(5)).validate() {
            Err(AppError::BadRequest(msg)) => {
                assert!(msg.contains("start"));
                assert!(msg.contains("end"));
            }
            other => panic!("expected ordering error, got {:?}", other),
        }

        // Equal bounds are allowed; so is start < end.
        assert!(input("t", Some(10), Some(10)).validate().is_ok());
        assert!(input("t", Some(5), Some(10)).validate().is_ok());
    }

    #[test]
    fn test_task_wire_field_names() {
        let json = serde_json::json!({
            "name": "write report",
            "start": "2018-01-01T00:00:00Z",
            "end": "2018-01-02T00:00:00Z"
        });
        let parsed: TaskInput = serde_json::from_value(json).unwrap();
        let (start, end) = parsed.validate().unwrap();
        assert!(start < end);
        assert!(parsed.tags.is_empty());
    }

    #[test]
    fn test_unique_tags_dedup() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let task = TaskInput {
            name: "t".to_string(),
            start: Some(Utc::now()),
            end: Some(Utc::now()),
            tags: vec![a, b, a],
        };
        let unique = task.unique_tags();
        assert_eq!(unique.len(), 2);
        assert!(unique.contains(&a));
        assert!(unique.contains(&b));
    }
}
