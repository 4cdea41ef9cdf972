/// Task model and database operations
///
/// Tasks belong to a project and may be reassigned to another project via
/// partial update. Member assignment goes through the `task_members` join
/// table (see [`crate::models::assignment`]).
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('todo', 'in_progress', 'done', 'completed');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     title TEXT NOT NULL,
///     status task_status NOT NULL DEFAULT 'todo',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Task progress status
///
/// Both `done` and `completed` exist because historical clients submitted
/// either spelling; the enum accepts both rather than silently rewriting
/// stored data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started
    Todo,

    /// Being worked on
    InProgress,

    /// Finished
    Done,

    /// Finished (legacy spelling)
    Completed,
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Project this task belongs to
    pub project_id: Uuid,

    /// Task title
    pub title: String,

    /// Progress status
    pub status: TaskStatus,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTask {
    /// Project ID
    pub project_id: Uuid,

    /// Task title
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,

    /// Initial status (defaults to Todo)
    #[serde(default = "default_status")]
    pub status: TaskStatus,
}

fn default_status() -> TaskStatus {
    TaskStatus::Todo
}

/// Input for partially updating a task
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTask {
    /// Move the task to another project
    pub project_id: Option<Uuid>,

    /// New title
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: Option<String>,

    /// New status
    pub status: Option<TaskStatus>,
}

impl UpdateTask {
    /// True when no field would be written
    pub fn is_empty(&self) -> bool {
        self.project_id.is_none() && self.title.is_none() && self.status.is_none()
    }
}

impl Task {
    /// Creates a new task
    ///
    /// # Errors
    ///
    /// Returns an error if `project_id` does not reference an existing
    /// project (foreign key violation) or the database operation fails
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (project_id, title, status)
            VALUES ($1, $2, $3)
            RETURNING id, project_id, title, status, created_at
            "#,
        )
        .bind(data.project_id)
        .bind(data.title)
        .bind(data.status)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Lists tasks, newest first, optionally filtered to one project
    pub async fn list(
        pool: &PgPool,
        project_id: Option<Uuid>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = match project_id {
            Some(project_id) => {
                sqlx::query_as::<_, Task>(
                    r#"
                    SELECT id, project_id, title, status, created_at
                    FROM tasks
                    WHERE project_id = $1
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(project_id)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Task>(
                    r#"
                    SELECT id, project_id, title, status, created_at
                    FROM tasks
                    ORDER BY created_at DESC
                    "#,
                )
                .fetch_all(pool)
                .await?
            }
        };

        Ok(tasks)
    }

    /// Partially updates a task
    ///
    /// # Returns
    ///
    /// The updated task, or `None` if no task has this id
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tasks SET");
        let mut clauses: Vec<String> = Vec::new();
        let mut bind_count = 1;

        if data.project_id.is_some() {
            bind_count += 1;
            clauses.push(format!(" project_id = ${}", bind_count));
        }
        if data.title.is_some() {
            bind_count += 1;
            clauses.push(format!(" title = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            clauses.push(format!(" status = ${}", bind_count));
        }

        query.push_str(&clauses.join(","));
        query.push_str(" WHERE id = $1 RETURNING id, project_id, title, status, created_at");

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(project_id) = data.project_id {
            q = q.bind(project_id);
        }
        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task and returns the deleted snapshot
    ///
    /// # Returns
    ///
    /// The deleted task, or `None` if no task has this id
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            DELETE FROM tasks
            WHERE id = $1
            RETURNING id, project_id, title, status, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Counts all tasks
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde_snake_case() {
        let status: TaskStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status, TaskStatus::InProgress);
        assert!(serde_json::from_str::<TaskStatus>("\"inProgress\"").is_err());
    }

    #[test]
    fn test_update_is_empty() {
        assert!(UpdateTask::default().is_empty());

        let update = UpdateTask {
            title: Some("Revised title".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_default_status() {
        assert_eq!(default_status(), TaskStatus::Todo);
    }
}
