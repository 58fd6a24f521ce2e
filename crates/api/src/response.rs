//! Response envelopes for API handlers.
//!
//! Every response carries a `success` flag. Failures are produced by
//! [`crate::error::AppError`]; the types here cover the success cases.

use serde::Serialize;

/// Body of a successful `GET /get-sounds`.
#[derive(Debug, Serialize)]
pub struct SoundsResponse {
    pub success: bool,
    /// Fetchable sample URLs, least exposed first.
    pub sounds: Vec<String>,
    /// Number of entries in `sounds`.
    pub count: usize,
}

/// Body of a successful `POST /submit`.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: &'static str,
    /// Participant code of the recorded submission.
    pub code: String,
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `healthy` or `unhealthy`.
    pub status: &'static str,
    /// `connected` or `disconnected`.
    pub database: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
