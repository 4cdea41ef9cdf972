/// Database models for CPMS
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `project`: Client projects
/// - `task`: Tasks within a project
/// - `member`: Team members assignable to projects and tasks
/// - `assignment`: Replace-all management of the two assignment join tables
/// - `user`: Login accounts
/// - `session`: Revocable login sessions
///
/// # Example
///
/// ```no_run
/// use cpms_shared::models::project::{Project, CreateProject, ProjectStatus};
/// use cpms_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let project = Project::create(&pool, CreateProject {
///     name: "Website redesign".to_string(),
///     description: None,
///     status: ProjectStatus::Active,
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod assignment;
pub mod member;
pub mod project;
pub mod session;
pub mod task;
pub mod user;
