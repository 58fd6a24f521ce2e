//! Handler for `/submit`: recording a completed questionnaire.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use survey_core::submission::{validate_submission, SubmissionForm, SUBMISSION_THANKS};
use survey_db::repositories::SubmissionRepo;

use crate::error::{AppError, AppResult};
use crate::response::SubmitResponse;
use crate::state::AppState;

/// POST /submit
///
/// Validate the questionnaire, then record the submission, its responses and
/// the exposure increments in one transaction.
pub async fn submit(
    State(state): State<AppState>,
    payload: Result<Json<SubmissionForm>, JsonRejection>,
) -> AppResult<Json<SubmitResponse>> {
    let Json(form) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let submission = validate_submission(&form)?;
    let recorded = SubmissionRepo::record(&state.pool, &submission).await?;

    Ok(Json(SubmitResponse {
        success: true,
        message: SUBMISSION_THANKS,
        code: recorded.participant_code,
    }))
}
