//! Repository for the `submissions` and `responses` tables.
//!
//! [`SubmissionRepo::record`] is the submission recorder: the submission row,
//! every response row, and every exposure increment are written in one
//! transaction. An early return drops the transaction, which rolls it back.

use sqlx::PgPool;
use survey_core::error::CoreError;
use survey_core::submission::{
    generate_participant_code, NewResponse, NewSubmission, MAX_CODE_ATTEMPTS,
};

use crate::error::StoreError;
use crate::models::submission::{Response, Submission};
use crate::repositories::SampleRepo;

/// Column list for the `submissions` table.
const COLUMNS: &str = "id, participant_code, age, gender, education_level, \
    prior_participation, feedback, submitted_at, created_at, updated_at";

/// Column list for the `responses` table.
const RESPONSE_COLUMNS: &str = "id, submission_id, sample_id, emotion_primary, rating_primary, \
    emotion_secondary, rating_secondary, created_at, updated_at";

/// Provides the submission recorder and read access to recorded submissions.
pub struct SubmissionRepo;

impl SubmissionRepo {
    /// Record a validated submission with a freshly generated participant code.
    pub async fn record(pool: &PgPool, input: &NewSubmission) -> Result<Submission, StoreError> {
        Self::record_with_codes(pool, input, generate_participant_code).await
    }

    /// Record a validated submission, drawing participant codes from `next_code`.
    ///
    /// A code already taken counts as a collision and the next one is tried,
    /// up to [`MAX_CODE_ATTEMPTS`] codes. Running out fails with `NotUnique`.
    pub async fn record_with_codes<F>(
        pool: &PgPool,
        input: &NewSubmission,
        mut next_code: F,
    ) -> Result<Submission, StoreError>
    where
        F: FnMut() -> String,
    {
        let mut tx = pool.begin().await?;

        let submission = match Self::write_all(&mut tx, input, &mut next_code).await {
            Ok(row) => row,
            Err(err) => {
                tracing::warn!(error = %err, "Submission rolled back");
                return Err(err);
            }
        };

        tx.commit().await?;

        tracing::info!(
            participant_code = %submission.participant_code,
            responses = input.responses.len(),
            "Submission recorded"
        );
        Ok(submission)
    }

    /// Find a submission by its participant code.
    pub async fn find_by_code(
        pool: &PgPool,
        participant_code: &str,
    ) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM submissions WHERE participant_code = $1");
        sqlx::query_as::<_, Submission>(&query)
            .bind(participant_code)
            .fetch_optional(pool)
            .await
    }

    /// List the responses of a submission in insertion order.
    pub async fn list_responses(
        pool: &PgPool,
        submission_id: i64,
    ) -> Result<Vec<Response>, sqlx::Error> {
        let query = format!(
            "SELECT {RESPONSE_COLUMNS} FROM responses WHERE submission_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, Response>(&query)
            .bind(submission_id)
            .fetch_all(pool)
            .await
    }

    /// Count all recorded submissions.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM submissions")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    // -----------------------------------------------------------------------
    // Transaction helpers
    // -----------------------------------------------------------------------

    /// Write the submission, its responses, and the counter increments.
    async fn write_all<F>(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        input: &NewSubmission,
        next_code: &mut F,
    ) -> Result<Submission, StoreError>
    where
        F: FnMut() -> String,
    {
        let mut submission = None;
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = next_code();
            match Self::insert_submission(tx, &code, input).await? {
                Some(row) => {
                    submission = Some(row);
                    break;
                }
                None => {
                    tracing::warn!(attempt, "Participant code collision, regenerating");
                }
            }
        }
        let submission = submission.ok_or_else(|| {
            CoreError::NotUnique(format!(
                "Could not generate a unique participant code after {MAX_CODE_ATTEMPTS} attempts"
            ))
        })?;

        // Row locks are taken in sample order so concurrent submissions
        // listing the same samples in different orders cannot deadlock.
        let mut lock_order: Vec<&str> = input
            .responses
            .iter()
            .map(|r| r.sample_id.as_str())
            .collect();
        lock_order.sort_unstable();
        for sample_id in lock_order {
            SampleRepo::increment(&mut **tx, sample_id).await?;
        }

        for response in &input.responses {
            Self::insert_response(tx, submission.id, response).await?;
        }

        Ok(submission)
    }

    /// Insert the submission row. Returns `None` when `code` is already taken.
    async fn insert_submission(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        code: &str,
        input: &NewSubmission,
    ) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!(
            "INSERT INTO submissions \
                (participant_code, age, gender, education_level, prior_participation, feedback) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (participant_code) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(code)
            .bind(input.age)
            .bind(&input.gender)
            .bind(&input.education_level)
            .bind(input.prior_participation)
            .bind(&input.feedback)
            .fetch_optional(&mut **tx)
            .await
    }

    async fn insert_response(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        submission_id: i64,
        response: &NewResponse,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO responses \
                (submission_id, sample_id, emotion_primary, rating_primary, \
                 emotion_secondary, rating_secondary) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(submission_id)
        .bind(&response.sample_id)
        .bind(&response.emotion_primary)
        .bind(response.rating_primary)
        .bind(&response.emotion_secondary)
        .bind(response.rating_secondary)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
