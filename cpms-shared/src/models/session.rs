/// Session model and database operations
///
/// A session row is created at login and named by the token's `sid` claim.
/// The auth gate confirms the session is still unrevoked on every protected
/// request, so revoking it (logout) invalidates the token immediately even
/// though the JWT itself remains structurally valid until expiry.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE sessions (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     revoked_at TIMESTAMPTZ
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Session model representing one login
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    /// Unique session ID (the token's `sid` claim)
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// When the session was created (login time)
    pub created_at: DateTime<Utc>,

    /// When the session was revoked (None while active)
    pub revoked_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Creates a new session for a user
    pub async fn create(pool: &PgPool, user_id: Uuid) -> Result<Self, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (user_id)
            VALUES ($1)
            RETURNING id, user_id, created_at, revoked_at
            "#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(session)
    }

    /// Checks whether a session exists and has not been revoked
    pub async fn is_active(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let active: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM sessions
                WHERE id = $1 AND revoked_at IS NULL
            )
            "#,
        )
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(active)
    }

    /// Revokes a session
    ///
    /// # Returns
    ///
    /// True if an active session was revoked, false if the session was
    /// already revoked or does not exist
    pub async fn revoke(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions SET revoked_at = NOW() WHERE id = $1 AND revoked_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
