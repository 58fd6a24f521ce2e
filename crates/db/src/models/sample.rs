use serde::Serialize;
use sqlx::FromRow;
use survey_core::exposure::SampleExposure;
use survey_core::types::Timestamp;

/// A row from the `samples` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Sample {
    pub sample_id: String,
    pub exposure_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Sample> for SampleExposure {
    fn from(sample: Sample) -> Self {
        SampleExposure::new(sample.sample_id, sample.exposure_count)
    }
}

/// Outcome of registering a set of discovered samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    /// Samples inserted with a zero counter.
    pub added: usize,
    /// Samples that were already registered.
    pub skipped: usize,
    /// Samples considered.
    pub total: usize,
}
