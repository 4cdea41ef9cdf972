/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Login and logout
/// - `projects`: Project CRUD and project↔member assignments
/// - `tasks`: Task CRUD and task↔member assignments
/// - `members`: Member CRUD
/// - `dashboard`: Aggregate counts

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod members;
pub mod projects;
pub mod tasks;
