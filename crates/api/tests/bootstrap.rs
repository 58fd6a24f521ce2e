//! Tests for startup reconciliation of the sample catalog.

mod common;

use common::{static_dir_with_samples, test_config};
use sqlx::PgPool;
use survey_api::bootstrap::reconcile_sample_catalog;
use survey_db::repositories::SampleRepo;

#[sqlx::test(migrations = "../../db/migrations")]
async fn registers_discovered_samples_once(pool: PgPool) {
    let dir = static_dir_with_samples(&["a.wav", "b.wav", "notes.txt"]);
    let config = test_config(dir.path());

    let summary = reconcile_sample_catalog(&pool, &config)
        .await
        .unwrap()
        .expect("directory has samples");
    assert_eq!((summary.added, summary.skipped, summary.total), (2, 0, 2));

    SampleRepo::increment(&pool, "a").await.unwrap();

    let again = reconcile_sample_catalog(&pool, &config)
        .await
        .unwrap()
        .expect("directory has samples");
    assert_eq!((again.added, again.skipped), (0, 2));

    let a = SampleRepo::find(&pool, "a").await.unwrap().unwrap();
    assert_eq!(a.exposure_count, 1, "reconciliation must not reset counters");
    assert!(SampleRepo::find(&pool, "notes").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_directory_is_not_fatal(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let summary = reconcile_sample_catalog(&pool, &config).await.unwrap();
    assert!(summary.is_none());
}
