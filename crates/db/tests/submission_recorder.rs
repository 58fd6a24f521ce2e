//! Integration tests for the submission recorder.
//!
//! Every test checks that a failed `record` call leaves no submission row,
//! no response rows, and no counter increments behind.

use assert_matches::assert_matches;
use sqlx::PgPool;
use survey_core::error::CoreError;
use survey_core::submission::{NewResponse, NewSubmission, MAX_CODE_ATTEMPTS};
use survey_db::error::StoreError;
use survey_db::repositories::{SampleRepo, SubmissionRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn response(sample_id: &str, emotion: &str, rating: f64) -> NewResponse {
    NewResponse {
        sample_id: sample_id.to_string(),
        emotion_primary: emotion.to_string(),
        rating_primary: rating,
        emotion_secondary: None,
        rating_secondary: None,
    }
}

fn submission(responses: Vec<NewResponse>) -> NewSubmission {
    NewSubmission {
        age: 29,
        gender: "non-binary".to_string(),
        education_level: "bachelor".to_string(),
        prior_participation: false,
        feedback: Some("fun".to_string()),
        responses,
    }
}

async fn register(pool: &PgPool, sample_ids: &[&str]) {
    for sample_id in sample_ids {
        SampleRepo::register(pool, sample_id).await.unwrap();
    }
}

async fn count_of(pool: &PgPool, sample_id: &str) -> i64 {
    SampleRepo::find(pool, sample_id)
        .await
        .unwrap()
        .expect("sample should exist")
        .exposure_count
}

async fn response_rows(pool: &PgPool) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM responses")
        .fetch_one(pool)
        .await
        .unwrap();
    count
}

async fn assert_nothing_written(pool: &PgPool, sample_ids: &[&str]) {
    assert_eq!(SubmissionRepo::count(pool).await.unwrap(), 0);
    assert_eq!(response_rows(pool).await, 0);
    for sample_id in sample_ids {
        assert_eq!(count_of(pool, sample_id).await, 0, "{sample_id} was incremented");
    }
}

// ---------------------------------------------------------------------------
// Test: successful recording
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_record_writes_rows_and_bumps_counters(pool: PgPool) {
    register(&pool, &["rain", "siren", "birds"]).await;

    let mut second = response("siren", "fear", 4.0);
    second.emotion_secondary = Some("surprise".to_string());
    second.rating_secondary = Some(2.5);
    let input = submission(vec![response("rain", "calm", 5.0), second]);

    let recorded = SubmissionRepo::record(&pool, &input).await.unwrap();
    assert_eq!(recorded.participant_code.len(), 10);
    assert_eq!(recorded.age, 29);
    assert_eq!(recorded.education_level, "bachelor");

    let found = SubmissionRepo::find_by_code(&pool, &recorded.participant_code)
        .await
        .unwrap()
        .expect("submission should exist");
    assert_eq!(found.id, recorded.id);

    let responses = SubmissionRepo::list_responses(&pool, recorded.id)
        .await
        .unwrap();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0].sample_id, "rain");
    assert_eq!(responses[1].emotion_secondary.as_deref(), Some("surprise"));
    assert_eq!(responses[1].rating_secondary, Some(2.5));

    assert_eq!(count_of(&pool, "rain").await, 1);
    assert_eq!(count_of(&pool, "siren").await, 1);
    assert_eq!(count_of(&pool, "birds").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_record_without_responses(pool: PgPool) {
    let recorded = SubmissionRepo::record(&pool, &submission(vec![])).await.unwrap();
    assert!(SubmissionRepo::list_responses(&pool, recorded.id)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(SubmissionRepo::count(&pool).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_repeated_sample_increments_once_per_response(pool: PgPool) {
    register(&pool, &["rain"]).await;

    let input = submission(vec![
        response("rain", "calm", 5.0),
        response("rain", "sad", 2.0),
    ]);
    SubmissionRepo::record(&pool, &input).await.unwrap();

    assert_eq!(count_of(&pool, "rain").await, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_records_do_not_lose_increments(pool: PgPool) {
    register(&pool, &["shared"]).await;

    const N: usize = 20;
    let tasks = (0..N).map(|_| {
        let pool = pool.clone();
        tokio::spawn(async move {
            let input = submission(vec![response("shared", "calm", 3.0)]);
            SubmissionRepo::record(&pool, &input).await
        })
    });

    for result in futures::future::join_all(tasks).await {
        result.unwrap().unwrap();
    }

    assert_eq!(count_of(&pool, "shared").await, N as i64);
    assert_eq!(SubmissionRepo::count(&pool).await.unwrap(), N as i64);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_records_in_opposite_orders_all_commit(pool: PgPool) {
    let ids = ["a", "b", "c", "d"];
    register(&pool, &ids).await;

    const N: usize = 40;
    let tasks = (0..N).map(|i| {
        let pool = pool.clone();
        let mut order: Vec<&str> = ids.to_vec();
        if i % 2 == 1 {
            order.reverse();
        }
        let input = submission(
            order
                .into_iter()
                .map(|id| response(id, "calm", 3.0))
                .collect(),
        );
        tokio::spawn(async move { SubmissionRepo::record(&pool, &input).await })
    });

    for result in futures::future::join_all(tasks).await {
        result.unwrap().unwrap();
    }

    for sample_id in ids {
        assert_eq!(count_of(&pool, sample_id).await, N as i64);
    }
    assert_eq!(SubmissionRepo::count(&pool).await.unwrap(), N as i64);
}

// ---------------------------------------------------------------------------
// Test: atomicity
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_sample_rolls_back_everything(pool: PgPool) {
    register(&pool, &["rain", "siren"]).await;

    let input = submission(vec![
        response("rain", "calm", 5.0),
        response("ghost", "fear", 1.0),
        response("siren", "fear", 4.0),
    ]);

    let result = SubmissionRepo::record(&pool, &input).await;
    assert_matches!(
        result,
        Err(StoreError::Core(CoreError::NotFound { key, .. })) => assert_eq!(key, "ghost")
    );

    assert_nothing_written(&pool, &["rain", "siren"]).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_response_insert_rolls_back_everything(pool: PgPool) {
    register(&pool, &["rain", "siren"]).await;

    // A blank label bypasses validation here and trips the table CHECK,
    // failing the second response insert after the first one succeeded.
    let input = submission(vec![
        response("rain", "calm", 5.0),
        response("siren", "  ", 4.0),
    ]);

    let result = SubmissionRepo::record(&pool, &input).await;
    assert_matches!(result, Err(StoreError::Database(_)));

    assert_nothing_written(&pool, &["rain", "siren"]).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_out_of_range_age_is_rejected_by_schema(pool: PgPool) {
    let mut input = submission(vec![]);
    input.age = 150;

    let result = SubmissionRepo::record(&pool, &input).await;
    assert_matches!(result, Err(StoreError::Database(_)));
    assert_eq!(SubmissionRepo::count(&pool).await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Test: participant code collisions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_code_collision_is_retried(pool: PgPool) {
    register(&pool, &["rain"]).await;

    let first = SubmissionRepo::record_with_codes(&pool, &submission(vec![]), || {
        "TAKEN00000".to_string()
    })
    .await
    .unwrap();
    assert_eq!(first.participant_code, "TAKEN00000");

    let mut codes = vec!["FRESH00000", "TAKEN00000"];
    let second = SubmissionRepo::record_with_codes(
        &pool,
        &submission(vec![response("rain", "calm", 1.0)]),
        || codes.pop().unwrap().to_string(),
    )
    .await
    .unwrap();

    assert_eq!(second.participant_code, "FRESH00000");
    assert_eq!(count_of(&pool, "rain").await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_exhausted_code_attempts_fail_without_writes(pool: PgPool) {
    register(&pool, &["rain"]).await;

    SubmissionRepo::record_with_codes(&pool, &submission(vec![]), || "TAKEN00000".to_string())
        .await
        .unwrap();

    let mut attempts = 0;
    let result = SubmissionRepo::record_with_codes(
        &pool,
        &submission(vec![response("rain", "calm", 1.0)]),
        || {
            attempts += 1;
            "TAKEN00000".to_string()
        },
    )
    .await;

    assert_matches!(result, Err(StoreError::Core(CoreError::NotUnique(_))));
    assert_eq!(attempts, MAX_CODE_ATTEMPTS);
    assert_eq!(SubmissionRepo::count(&pool).await.unwrap(), 1);
    assert_eq!(count_of(&pool, "rain").await, 0);
}

// ---------------------------------------------------------------------------
// Test: ownership
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_submission_cascades_to_responses(pool: PgPool) {
    register(&pool, &["rain"]).await;
    let recorded = SubmissionRepo::record(&pool, &submission(vec![response("rain", "calm", 5.0)]))
        .await
        .unwrap();

    sqlx::query("DELETE FROM submissions WHERE id = $1")
        .bind(recorded.id)
        .execute(&pool)
        .await
        .unwrap();

    assert_eq!(response_rows(&pool).await, 0);
    // Counters are never decremented.
    assert_eq!(count_of(&pool, "rain").await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_referenced_sample_cannot_be_deleted(pool: PgPool) {
    register(&pool, &["rain"]).await;
    SubmissionRepo::record(&pool, &submission(vec![response("rain", "calm", 5.0)]))
        .await
        .unwrap();

    let result = sqlx::query("DELETE FROM samples WHERE sample_id = 'rain'")
        .execute(&pool)
        .await;
    assert!(result.is_err(), "referenced sample must not be deletable");
}
