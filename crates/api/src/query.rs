//! Query parameter types for API handlers.

use serde::Deserialize;

/// Parameters of `GET /get-sounds?count=N`.
///
/// `count` is kept as raw text so an unparsable value becomes a structured
/// validation error instead of an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct SoundsParams {
    pub count: Option<String>,
}
