/// Dashboard endpoints
///
/// Aggregate counts for the landing view.

use crate::{app::AppState, error::ApiResult, extract::Json, response::{self, Envelope}};
use axum::extract::State;
use cpms_shared::models::{
    project::{Project, ProjectStatus},
    task::Task,
};
use serde::Serialize;

/// Aggregate counts shown on the dashboard
///
/// Field names are camelCase because the frontend consumes this payload
/// directly.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Total number of projects
    pub total_projects: i64,

    /// Total number of tasks
    pub total_tasks: i64,

    /// Number of projects with status `active`
    pub active_projects: i64,
}

/// Dashboard statistics endpoint
///
/// The three counts run concurrently against the pool. They are separate
/// queries, so the totals may straddle a concurrent write; the dashboard
/// refreshes often enough that this does not matter.
///
/// # Endpoint
///
/// ```text
/// GET /api/dashboard/stats
/// ```
pub async fn get_stats(
    State(state): State<AppState>,
) -> ApiResult<Json<Envelope<DashboardStats>>> {
    let (total_projects, total_tasks, active_projects) = tokio::try_join!(
        Project::count(&state.db),
        Task::count(&state.db),
        Project::count_by_status(&state.db, ProjectStatus::Active),
    )?;

    Ok(response::success(
        DashboardStats {
            total_projects,
            total_tasks,
            active_projects,
        },
        "Dashboard stats fetched",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_serialize_camel_case() {
        let stats = DashboardStats {
            total_projects: 3,
            total_tasks: 7,
            active_projects: 2,
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["totalProjects"], 3);
        assert_eq!(json["totalTasks"], 7);
        assert_eq!(json["activeProjects"], 2);
    }
}
