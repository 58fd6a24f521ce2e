//! Startup reconciliation of the sample catalog with the sample directory.

use survey_core::error::CoreError;
use survey_core::sample_source::{discover_samples, SAMPLE_EXTENSION};
use survey_db::models::sample::ReconcileSummary;
use survey_db::repositories::SampleRepo;
use survey_db::DbPool;

use crate::config::ServerConfig;
use crate::error::AppResult;

/// Register every sample file found in the sample directory.
///
/// A missing or empty directory is not fatal: the server still starts and
/// `/get-sounds` reports the problem to clients. In that case `None` is
/// returned.
pub async fn reconcile_sample_catalog(
    pool: &DbPool,
    config: &ServerConfig,
) -> AppResult<Option<ReconcileSummary>> {
    let dir = config.sample_dir();
    let samples = match discover_samples(&dir, SAMPLE_EXTENSION).await {
        Ok(samples) => samples,
        Err(CoreError::Configuration(msg)) => {
            tracing::warn!(dir = %dir.display(), "{msg}");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(count = samples.len(), dir = %dir.display(), "Found sample files");

    let sample_ids: Vec<String> = samples.into_iter().map(|s| s.sample_id).collect();
    let summary = SampleRepo::reconcile(pool, &sample_ids).await?;
    Ok(Some(summary))
}
