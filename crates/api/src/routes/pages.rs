//! Static delivery: the survey page and the sample files.

use axum::Router;
use survey_core::delivery::STATIC_MOUNT;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::ServerConfig;
use crate::state::AppState;

/// Name of the survey page inside the static directory.
pub const INDEX_FILE: &str = "index.html";

/// Routes serving files from the configured static directory.
///
/// ```text
/// /                 survey page
/// /static/*         sample files and page assets
/// ```
pub fn router(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .route_service("/", ServeFile::new(config.static_dir.join(INDEX_FILE)))
        .nest_service(STATIC_MOUNT, ServeDir::new(&config.static_dir))
}
