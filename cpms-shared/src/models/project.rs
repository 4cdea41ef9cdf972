/// Project model and database operations
///
/// Projects are the top-level resource: tasks belong to a project, and
/// members are assigned to projects through the `project_members` join table
/// (see [`crate::models::assignment`]).
///
/// # Schema
///
/// ```sql
/// CREATE TYPE project_status AS ENUM ('active', 'paused', 'completed');
///
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name TEXT NOT NULL,
///     description TEXT,
///     status project_status NOT NULL DEFAULT 'active',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Deleting a project cascades to its tasks and to both join tables.
///
/// # Example
///
/// ```no_run
/// use cpms_shared::models::project::{Project, CreateProject, UpdateProject, ProjectStatus};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let project = Project::create(&pool, CreateProject {
///     name: "Website redesign".to_string(),
///     description: Some("Q3 marketing site refresh".to_string()),
///     status: ProjectStatus::Active,
/// }).await?;
///
/// let updated = Project::update(&pool, project.id, UpdateProject {
///     status: Some(ProjectStatus::Completed),
///     ..Default::default()
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Project lifecycle status
///
/// Enforced server-side: unknown values are rejected at deserialization
/// rather than stored as free-form strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    /// Work is ongoing
    Active,

    /// Work is on hold
    Paused,

    /// Work has finished
    Completed,
}

/// Project model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,

    /// Project name
    pub name: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Lifecycle status
    pub status: ProjectStatus,

    /// When the project was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProject {
    /// Project name
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Initial status (defaults to Active)
    #[serde(default = "default_status")]
    pub status: ProjectStatus,
}

fn default_status() -> ProjectStatus {
    ProjectStatus::Active
}

/// Input for partially updating a project
///
/// Only `Some` fields are written. An update with every field `None` must be
/// rejected by the caller before reaching the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProject {
    /// New name
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status
    pub status: Option<ProjectStatus>,
}

impl UpdateProject {
    /// True when no field would be written
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.status.is_none()
    }
}

impl Project {
    /// Creates a new project
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn create(pool: &PgPool, data: CreateProject) -> Result<Self, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, description, status)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, status, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.status)
        .fetch_one(pool)
        .await?;

        Ok(project)
    }

    /// Lists all projects, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, status, created_at
            FROM projects
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Partially updates a project
    ///
    /// Builds the SET clause from the fields present in `data`. Callers must
    /// reject an empty update before calling this.
    ///
    /// # Returns
    ///
    /// The updated project, or `None` if no project has this id
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE projects SET");
        let mut clauses: Vec<String> = Vec::new();
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            clauses.push(format!(" name = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            clauses.push(format!(" description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            clauses.push(format!(" status = ${}", bind_count));
        }

        query.push_str(&clauses.join(","));
        query.push_str(" WHERE id = $1 RETURNING id, name, description, status, created_at");

        let mut q = sqlx::query_as::<_, Project>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }

        let project = q.fetch_optional(pool).await?;

        Ok(project)
    }

    /// Deletes a project and returns the deleted snapshot
    ///
    /// Tasks and join rows referencing the project are removed by the
    /// store's ON DELETE CASCADE constraints.
    ///
    /// # Returns
    ///
    /// The deleted project, or `None` if no project has this id
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            DELETE FROM projects
            WHERE id = $1
            RETURNING id, name, description, status, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Counts all projects
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Counts projects with the given status
    pub async fn count_by_status(
        pool: &PgPool,
        status: ProjectStatus,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM projects WHERE status = $1")
                .bind(status)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde_rejects_unknown() {
        assert!(serde_json::from_str::<ProjectStatus>("\"active\"").is_ok());
        assert!(serde_json::from_str::<ProjectStatus>("\"archived\"").is_err());
    }

    #[test]
    fn test_create_default_status() {
        let create: CreateProject =
            serde_json::from_str(r#"{"name": "Redesign"}"#).unwrap();
        assert_eq!(create.status, ProjectStatus::Active);
        assert!(create.description.is_none());
    }

    #[test]
    fn test_update_is_empty() {
        assert!(UpdateProject::default().is_empty());

        let update = UpdateProject {
            status: Some(ProjectStatus::Paused),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    // Integration tests for database operations are in tests/assignment_tests.rs
}
