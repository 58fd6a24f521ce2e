//! Handler for `/get-sounds`: exposure-balanced sample batches.

use std::collections::HashMap;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use survey_core::delivery::sample_url;
use survey_core::exposure::parse_requested_count;
use survey_core::sample_source::{discover_samples, SAMPLE_EXTENSION};
use survey_db::repositories::SampleRepo;

use crate::error::{AppError, AppResult};
use crate::query::SoundsParams;
use crate::response::SoundsResponse;
use crate::state::AppState;

/// GET /get-sounds?count=N
///
/// Enumerate the sample directory, pick the `N` least exposed samples and
/// return their URLs in that order.
pub async fn get_sounds(
    State(state): State<AppState>,
    params: Result<Query<SoundsParams>, QueryRejection>,
) -> AppResult<Json<SoundsResponse>> {
    let Query(params) = params.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let requested =
        parse_requested_count(params.count.as_deref(), state.config.default_batch_size)?;

    let samples = discover_samples(&state.config.sample_dir(), SAMPLE_EXTENSION).await?;
    let sample_ids: Vec<String> = samples.iter().map(|s| s.sample_id.clone()).collect();
    let file_names: HashMap<&str, &str> = samples
        .iter()
        .map(|s| (s.sample_id.as_str(), s.file_name.as_str()))
        .collect();

    let batch = SampleRepo::select_batch(&state.pool, &sample_ids, requested).await?;

    let sounds: Vec<String> = batch
        .iter()
        .filter_map(|id| file_names.get(id.as_str()))
        .map(|file_name| sample_url(&state.config.sound_folder, file_name))
        .collect();

    Ok(Json(SoundsResponse {
        success: true,
        count: sounds.len(),
        sounds,
    }))
}
