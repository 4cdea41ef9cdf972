/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use cpms_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = cpms_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use crate::error::ApiError;
use crate::response::Envelope;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use cpms_shared::auth::{context, context::AuthContext, jwt};
use cpms_shared::models::session::Session;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                          # Health check (public)
/// └── /api/
///     ├── /auth/
///     │   ├── POST /login              # Public
///     │   └── POST /logout             # Authenticated
///     ├── /projects/                   # Authenticated
///     │   ├── GET  POST /
///     │   ├── GET /members             # All assignments
///     │   ├── PATCH DELETE /:id
///     │   └── GET PUT /:id/members     # Per-project / replace-all
///     ├── /tasks/                      # Same shape as /projects
///     ├── /members/                    # Member CRUD (authenticated)
///     └── /dashboard/GET /stats        # Aggregate counts
/// ```
///
/// Unknown routes fall through to a 404 in the standard envelope.
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (per-route basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Login is the only public API route; logout requires a valid token
    let auth_routes = Router::new()
        .route("/login", post(routes::auth::login))
        .merge(
            Router::new()
                .route("/logout", post(routes::auth::logout))
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    auth_gate,
                )),
        );

    let project_routes = Router::new()
        .route(
            "/",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        // Static segment must be registered alongside the :id capture;
        // axum prefers the static match.
        .route("/members", get(routes::projects::list_all_project_members))
        .route(
            "/:id",
            axum::routing::patch(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route(
            "/:id/members",
            get(routes::projects::list_project_members)
                .put(routes::projects::replace_project_members),
        );

    let task_routes = Router::new()
        .route(
            "/",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route("/members", get(routes::tasks::list_all_task_members))
        .route(
            "/:id",
            axum::routing::patch(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .route(
            "/:id/members",
            get(routes::tasks::list_task_members).put(routes::tasks::replace_task_members),
        );

    let member_routes = Router::new()
        .route(
            "/",
            get(routes::members::list_members).post(routes::members::create_member),
        )
        .route(
            "/:id",
            axum::routing::patch(routes::members::update_member)
                .delete(routes::members::delete_member),
        );

    let dashboard_routes = Router::new().route("/stats", get(routes::dashboard::get_stats));

    // All resource routes sit behind the auth gate
    let protected_routes = Router::new()
        .nest("/projects", project_routes)
        .nest("/tasks", task_routes)
        .nest("/members", member_routes)
        .nest("/dashboard", dashboard_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_gate,
        ));

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/api/auth", auth_routes)
        .nest("/api", protected_routes)
        .fallback(route_not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Authentication gate applied to every protected route
///
/// Two states: unauthenticated requests are rejected before touching the
/// store; authenticated requests proceed with an [`AuthContext`] attached.
///
/// 1. Extract the bearer token; absent → 401 immediately.
/// 2. Validate signature, expiry, and issuer.
/// 3. Confirm the session named by the token is still unrevoked.
///
/// The session check runs on every request; there is no caching layer.
async fn auth_gate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let token = context::bearer_token(header_value)
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization token".to_string()))?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    if !Session::is_active(&state.db, claims.sid).await? {
        return Err(ApiError::Unauthorized(
            "Invalid or expired token".to_string(),
        ));
    }

    req.extensions_mut()
        .insert(AuthContext::new(claims.sub, claims.sid));

    Ok(next.run(req).await)
}

/// Fallback for unknown routes: 404 in the standard envelope
async fn route_not_found() -> impl IntoResponse {
    let body: Json<Envelope<()>> = Json(Envelope::err("Route not found"));
    (StatusCode::NOT_FOUND, body)
}
