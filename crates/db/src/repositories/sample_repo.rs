//! Repository for the `samples` table: the sample catalog and the reads
//! behind exposure-balanced batch selection.

use std::collections::HashSet;

use sqlx::PgPool;
use survey_core::error::CoreError;
use survey_core::exposure::{rank_by_exposure, SampleExposure};

use crate::error::StoreError;
use crate::models::sample::{ReconcileSummary, Sample};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "sample_id, exposure_count, created_at, updated_at";

/// Provides catalog operations for audio samples.
pub struct SampleRepo;

impl SampleRepo {
    /// Register a sample with a zero counter. Existing samples are left untouched.
    ///
    /// Returns `true` if a new row was inserted.
    pub async fn register(pool: &PgPool, sample_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO samples (sample_id) VALUES ($1) \
             ON CONFLICT (sample_id) DO NOTHING",
        )
        .bind(sample_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Register every identifier in `sample_ids` and report what changed.
    pub async fn reconcile(
        pool: &PgPool,
        sample_ids: &[String],
    ) -> Result<ReconcileSummary, sqlx::Error> {
        let mut summary = ReconcileSummary {
            total: sample_ids.len(),
            ..ReconcileSummary::default()
        };

        for sample_id in sample_ids {
            if Self::register(pool, sample_id).await? {
                tracing::debug!(sample_id = %sample_id, "Registered sample");
                summary.added += 1;
            } else {
                summary.skipped += 1;
            }
        }

        tracing::info!(
            added = summary.added,
            skipped = summary.skipped,
            total = summary.total,
            "Sample catalog reconciled"
        );
        Ok(summary)
    }

    /// Find a sample by its identifier.
    pub async fn find(pool: &PgPool, sample_id: &str) -> Result<Option<Sample>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM samples WHERE sample_id = $1");
        sqlx::query_as::<_, Sample>(&query)
            .bind(sample_id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch the exposure counters of the given samples.
    ///
    /// The identifier set is bound as a single array parameter. Fails with
    /// `NotFound` naming the first identifier that is not registered.
    pub async fn list_with_counts(
        pool: &PgPool,
        sample_ids: &[String],
    ) -> Result<Vec<SampleExposure>, StoreError> {
        if sample_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!("SELECT {COLUMNS} FROM samples WHERE sample_id = ANY($1)");
        let rows = sqlx::query_as::<_, Sample>(&query)
            .bind(sample_ids)
            .fetch_all(pool)
            .await?;

        let found: HashSet<&str> = rows.iter().map(|r| r.sample_id.as_str()).collect();
        if let Some(missing) = sample_ids.iter().find(|id| !found.contains(id.as_str())) {
            return Err(CoreError::NotFound {
                entity: "Sample",
                key: missing.clone(),
            }
            .into());
        }

        Ok(rows.into_iter().map(SampleExposure::from).collect())
    }

    /// Atomically add one to a sample's exposure counter.
    ///
    /// Accepts the pool or an open transaction. The single-row `UPDATE`
    /// takes a row lock, so concurrent increments never lose updates.
    pub async fn increment<'e, E>(executor: E, sample_id: &str) -> Result<Sample, StoreError>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE samples SET exposure_count = exposure_count + 1 \
             WHERE sample_id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Sample>(&query)
            .bind(sample_id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "Sample",
                    key: sample_id.to_string(),
                }
                .into()
            })
    }

    /// Select up to `requested` of `available_ids`, least exposed first.
    ///
    /// Duplicate identifiers are collapsed. Ties are broken on the identifier,
    /// so the same catalog state always yields the same batch.
    pub async fn select_batch(
        pool: &PgPool,
        available_ids: &[String],
        requested: usize,
    ) -> Result<Vec<String>, StoreError> {
        let mut unique: Vec<String> = available_ids.to_vec();
        unique.sort();
        unique.dedup();

        let counts = Self::list_with_counts(pool, &unique).await?;
        let batch = rank_by_exposure(counts, requested);

        tracing::debug!(
            available = unique.len(),
            requested,
            selected = batch.len(),
            "Selected sample batch"
        );
        Ok(batch)
    }
}
