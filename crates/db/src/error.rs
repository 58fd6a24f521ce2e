use survey_core::error::CoreError;

/// Error returned by repository operations that mix domain checks with
/// database access.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A domain-level failure (unknown sample, code collision, ...).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The underlying query or transaction failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
