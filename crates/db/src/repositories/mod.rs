//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or an executor) as the first argument.

pub mod sample_repo;
pub mod submission_repo;

pub use sample_repo::SampleRepo;
pub use submission_repo::SubmissionRepo;
