use serde::Serialize;
use sqlx::FromRow;
use survey_core::types::{DbId, Timestamp};

/// A row from the `submissions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Submission {
    pub id: DbId,
    pub participant_code: String,
    pub age: i32,
    pub gender: String,
    pub education_level: String,
    pub prior_participation: bool,
    pub feedback: Option<String>,
    pub submitted_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `responses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Response {
    pub id: DbId,
    pub submission_id: DbId,
    pub sample_id: String,
    pub emotion_primary: String,
    pub rating_primary: f64,
    pub emotion_secondary: Option<String>,
    pub rating_secondary: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
