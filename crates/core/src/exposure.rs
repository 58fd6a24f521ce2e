//! Exposure balancing: ranking samples so the least-heard ones are served first.
//!
//! Counters only ever grow and selection always prefers the lowest counter,
//! so repeated batches drift toward uniform exposure without randomization.
//! Ties are broken on the sample identifier, which makes a batch fully
//! determined by the catalog state it was computed from.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Batch size used when the client does not send `count`.
pub const DEFAULT_BATCH_SIZE: usize = 10;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A sample identifier paired with its current exposure counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleExposure {
    pub sample_id: String,
    pub exposure_count: i64,
}

impl SampleExposure {
    pub fn new(sample_id: impl Into<String>, exposure_count: i64) -> Self {
        Self {
            sample_id: sample_id.into(),
            exposure_count,
        }
    }
}

// ---------------------------------------------------------------------------
// Requested count
// ---------------------------------------------------------------------------

/// Parse the raw `count` query value into a batch size.
///
/// - `None` falls back to `default`.
/// - Any signed integer is accepted; zero or negative values mean an empty batch.
/// - Anything else is a validation error.
pub fn parse_requested_count(raw: Option<&str>, default: usize) -> Result<usize, CoreError> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| CoreError::Validation("Count is not convertible to int.".to_string()))?;

    Ok(usize::try_from(value).unwrap_or(0))
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Order samples by `(exposure_count, sample_id)` ascending and keep the first
/// `requested` identifiers.
///
/// Returns every sample when fewer than `requested` are available.
pub fn rank_by_exposure(mut samples: Vec<SampleExposure>, requested: usize) -> Vec<String> {
    samples.sort_by(|a, b| {
        a.exposure_count
            .cmp(&b.exposure_count)
            .then_with(|| a.sample_id.cmp(&b.sample_id))
    });

    samples
        .into_iter()
        .take(requested)
        .map(|s| s.sample_id)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
