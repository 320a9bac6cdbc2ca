use serde::Serialize;
use utoipa::ToSchema;

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorPayload {
    pub message: String,
    /// The HTTP status code
    pub code: u16,
    /// e.g. `VALIDATION_ERROR`, `NOT_FOUND`
    pub r#type: String,
    /// Inline field errors, `{ "email": ["This email address already exists"] }`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
