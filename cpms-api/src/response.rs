/// Uniform response envelope
///
/// Every API response, success or failure, is wrapped in the same shape:
///
/// ```json
/// { "success": true, "message": "Projects fetched", "data": [...] }
/// ```
///
/// On failures the `data` field is omitted entirely (see
/// [`crate::error::ApiError`]); some successes carry an explicit `null`
/// (e.g. logout).

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::extract::Json;

/// The `{success, message, data}` wrapper applied to every response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Whether the request succeeded
    pub success: bool,

    /// Human-readable outcome description
    pub message: String,

    /// Payload; omitted from serialization when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Builds a success envelope around a payload
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Builds a failure envelope with no payload
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// 200 OK success response
pub fn success<T: Serialize>(data: T, message: &str) -> Json<Envelope<T>> {
    Json(Envelope::ok(data, message))
}

/// 201 Created success response
pub fn created<T: Serialize>(data: T, message: &str) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::CREATED, Json(Envelope::ok(data, message)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let envelope = Envelope::ok(vec![1, 2, 3], "Fetched");
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Fetched");
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn test_error_envelope_omits_data() {
        let envelope: Envelope<()> = Envelope::err("Invalid credentials");
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Invalid credentials");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_null_data_is_kept() {
        let envelope = Envelope::ok(serde_json::Value::Null, "Logout successful");
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["success"], true);
        assert!(json.get("data").is_some());
        assert!(json["data"].is_null());
    }
}
