pub mod health;
pub mod pages;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{sounds, submission};
use crate::state::AppState;

/// Build the survey route tree.
///
/// Mounted at the root so existing survey pages keep working:
///
/// ```text
/// /get-sounds?count=N                              exposure-balanced batch (GET)
/// /submit                                          record questionnaire (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/get-sounds", get(sounds::get_sounds))
        .route("/submit", post(submission::submit))
}
