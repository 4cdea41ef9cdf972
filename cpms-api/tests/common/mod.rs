/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup and cleanup
/// - Test user and session creation
/// - Bearer token generation
/// - Request/response helpers

use axum::body::Body;
use axum::http::{Request, StatusCode};
use cpms_api::app::{build_router, AppState};
use cpms_api::config::Config;
use cpms_shared::auth::jwt::{create_token, Claims};
use cpms_shared::auth::password::hash_password;
use cpms_shared::models::session::Session;
use cpms_shared::models::user::{CreateUser, User};
use sqlx::PgPool;
use tower::Service as _;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub user: User,
    pub session: Session,
    pub token: String,
}

impl TestContext {
    /// Creates a new test context against the database from the environment
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Path is relative to Cargo.toml, not this file
        sqlx::migrate!("../migrations").run(&db).await?;

        let user = User::create(
            &db,
            CreateUser {
                email: format!("test-{}@example.com", Uuid::new_v4()),
                password_hash: hash_password("secret123")?,
                name: Some("Test User".to_string()),
            },
        )
        .await?;

        let session = Session::create(&db, user.id).await?;

        let claims = Claims::new(user.id, session.id);
        let token = create_token(&claims, &config.jwt.secret)?;

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            user,
            session,
            token,
        })
    }

    /// Returns authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Sends a JSON request through the router and returns status + parsed body
    pub async fn request(
        &mut self,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
        authenticated: bool,
    ) -> anyhow::Result<(StatusCode, serde_json::Value)> {
        let mut builder = Request::builder().method(method).uri(uri);

        if authenticated {
            builder = builder.header("authorization", self.auth_header());
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.app.call(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let json: serde_json::Value = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        Ok((status, json))
    }

    /// Removes rows created during the test
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        // Sessions cascade from the user
        User::delete(&self.db, self.user.id).await?;
        Ok(())
    }
}
