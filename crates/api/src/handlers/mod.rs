//! Request handlers.
//!
//! Handlers validate input through `survey_core`, delegate persistence to the
//! repositories in `survey_db`, and map errors via [`crate::error::AppError`].

pub mod health;
pub mod sounds;
pub mod submission;
