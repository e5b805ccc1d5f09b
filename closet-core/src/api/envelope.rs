//! Response wrappers used by every API endpoint

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, ApiResult};

/// `{ responseType, path, timestamp, payload }` wrapper around each response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope<T> {
    /// Server-side classification of the response
    #[serde(default)]
    pub response_type: Option<String>,
    /// Request path echoed back
    #[serde(default)]
    pub path: Option<String>,
    /// Server timestamp
    #[serde(default)]
    pub timestamp: Option<String>,
    /// The actual data
    pub payload: T,
}

/// List payload, either `{ items: [...] }` or a bare array
///
/// Groups come back as a bare array; credentials, types and workspaces are
/// wrapped in `items`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    /// `[...]`
    Bare(Vec<T>),
    /// `{ items: [...] }`
    Items {
        /// The entries
        items: Vec<T>,
    },
}

impl<T> ListPayload<T> {
    /// Unwraps the entries
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Items { items } => items,
        }
    }
}

/// Error body returned with non-success statuses
#[derive(Debug, Clone, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Decodes an enveloped payload from a response body
///
/// # Errors
///
/// Returns [`ApiError::Decode`] if the body does not match.
pub fn decode_payload<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
    let envelope: ResponseEnvelope<T> = serde_json::from_str(body)?;
    Ok(envelope.payload)
}

/// Decodes an enveloped list payload
///
/// # Errors
///
/// Returns [`ApiError::Decode`] if the body does not match.
pub fn decode_list<T: DeserializeOwned>(body: &str) -> ApiResult<Vec<T>> {
    decode_payload::<ListPayload<T>>(body).map(ListPayload::into_vec)
}

/// Human-readable message from an error body, if it carries one
///
/// `message` may be a string or a list of validation messages.
#[must_use]
pub fn error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let message = match parsed.message {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Array(items)) => Some(
            items
                .iter()
                .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_string))
                .collect::<Vec<_>>()
                .join("; "),
        ),
        _ => None,
    };
    message.or(parsed.error).filter(|m| !m.trim().is_empty())
}

/// Maps a non-success status and its body to an [`ApiError`]
#[must_use]
pub fn status_error(status: u16, body: &str) -> ApiError {
    let message = error_message(body).unwrap_or_else(|| format!("HTTP {status}"));
    match status {
        401 | 403 => ApiError::Unauthorized(message),
        404 => ApiError::NotFound(message),
        _ => ApiError::Status { status, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CredentialGroup, GroupType};

    #[test]
    fn test_decode_items_list() {
        let body = r#"{
            "responseType": "SUCCESS",
            "path": "/credential-group-type",
            "timestamp": "2025-01-10T12:00:00Z",
            "payload": { "items": [
                { "id": "0b9b5f6e-4d2a-4f0a-8d37-3a5c2b1e9f00", "name": "email", "isActive": true }
            ] }
        }"#;
        let types: Vec<GroupType> = decode_list(body).unwrap();
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].name, "email");
    }

    #[test]
    fn test_decode_bare_list() {
        let body = r#"{ "payload": [
            { "id": "6a1c1c9e-0d4e-4a55-9a43-4a3f0c1e2b10", "name": "Email", "children": [] }
        ] }"#;
        let groups: Vec<CredentialGroup> = decode_list(body).unwrap();
        assert_eq!(groups[0].name, "Email");
    }

    #[test]
    fn test_decode_missing_payload() {
        let result = decode_payload::<Vec<GroupType>>(r#"{ "path": "/x" }"#);
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_error_message_shapes() {
        assert_eq!(
            error_message(r#"{ "message": "Group not found" }"#).as_deref(),
            Some("Group not found")
        );
        assert_eq!(
            error_message(r#"{ "message": ["name too short", "type missing"] }"#).as_deref(),
            Some("name too short; type missing")
        );
        assert_eq!(
            error_message(r#"{ "error": "Bad Request" }"#).as_deref(),
            Some("Bad Request")
        );
        assert_eq!(error_message("<html>"), None);
    }

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(status_error(401, ""), ApiError::Unauthorized(_)));
        assert!(matches!(status_error(403, ""), ApiError::Unauthorized(_)));
        assert!(status_error(404, "").is_not_found());
        match status_error(409, r#"{ "message": "duplicate" }"#) {
            ApiError::Status { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, "duplicate");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
