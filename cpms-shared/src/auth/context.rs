/// Per-request authentication context
///
/// After the auth gate validates a bearer token, it inserts an [`AuthContext`]
/// into the request extensions. Handlers extract it with Axum's `Extension`
/// extractor.
///
/// # Example
///
/// ```
/// use cpms_shared::auth::context::{bearer_token, AuthContext};
/// use uuid::Uuid;
///
/// let token = bearer_token(Some("Bearer abc.def.ghi"));
/// assert_eq!(token, Some("abc.def.ghi"));
///
/// let ctx = AuthContext::new(Uuid::new_v4(), Uuid::new_v4());
/// assert_ne!(ctx.user_id, ctx.session_id);
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authentication context added to request extensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Session backing the presented token
    pub session_id: Uuid,
}

impl AuthContext {
    /// Creates an auth context from validated JWT claims
    pub fn new(user_id: Uuid, session_id: Uuid) -> Self {
        Self {
            user_id,
            session_id,
        }
    }
}

/// Extracts the bearer token from an `Authorization` header value
///
/// Returns `None` when the header is absent or not a `Bearer` scheme.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    header?.strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(Some("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(Some("")), None);
        assert_eq!(bearer_token(None), None);
    }
}
