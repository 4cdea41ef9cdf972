/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/login` - Exchange email+password for a bearer token
/// - `POST /api/auth/logout` - Revoke the caller's session

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::Json,
    response::{self, Envelope},
};
use axum::{extract::State, Extension};
use cpms_shared::{
    auth::{context::AuthContext, jwt, password},
    models::{
        session::Session,
        user::{PublicUser, User},
    },
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Valid email is required"))]
    pub email: String,

    /// Password
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Login response payload
#[derive(Debug, Serialize)]
pub struct LoginData {
    /// Bearer token for subsequent requests (24h)
    pub token: String,

    /// The authenticated user
    pub user: PublicUser,
}

/// Login endpoint
///
/// Verifies credentials, opens a session, and returns a bearer token bound
/// to it.
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "secret123" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: malformed email or short password
/// - `401 Unauthorized`: unknown email or wrong password, both reported as
///   "Invalid credentials" so the response does not reveal which
/// - `500 Internal Server Error`: store failure
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<Envelope<LoginData>>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let session = Session::create(&state.db, user.id).await?;
    User::update_last_login(&state.db, user.id).await?;

    let claims = jwt::Claims::new(user.id, session.id);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(response::success(
        LoginData {
            token,
            user: user.public(),
        },
        "Login successful",
    ))
}

/// Logout endpoint
///
/// Revokes the session behind the presented token. The token stops working
/// on the next request even though it has not yet expired.
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/logout
/// Authorization: Bearer <token>
/// ```
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Envelope<serde_json::Value>>> {
    Session::revoke(&state.db, auth.session_id).await?;

    Ok(response::success(serde_json::Value::Null, "Logout successful"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_validation() {
        let valid = LoginRequest {
            email: "user@example.com".to_string(),
            password: "secret123".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = LoginRequest {
            email: "not-an-email".to_string(),
            password: "secret123".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let short_password = LoginRequest {
            email: "user@example.com".to_string(),
            password: "short".to_string(),
        };
        assert!(short_password.validate().is_err());
    }
}
