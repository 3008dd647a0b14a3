use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;

/// Canonical JSON payload for API error responses, matching the
/// `{"error": ...}` shape the viewer and editor scripts expect.
#[derive(Debug, Serialize, Clone)]
pub struct ApiError {
    pub error: String,
    /// Raw error detail, present only outside production.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: None,
        }
    }
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ApiError>) {
    (status, Json(ApiError::new(message)))
}

/// Write-path failures surface an inline message; the raw detail is only
/// attached when debug errors are enabled.
pub fn json_error_with_detail(
    status: StatusCode,
    message: impl Into<String>,
    debug_errors: bool,
    err: &anyhow::Error,
) -> (StatusCode, Json<ApiError>) {
    let mut payload = ApiError::new(message);
    if debug_errors {
        payload.detail = Some(format!("{err:#}"));
    }
    (status, Json(payload))
}
