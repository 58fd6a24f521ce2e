//! Row models for the survey tables.
//!
//! Each submodule contains a `FromRow` + `Serialize` struct matching a
//! database row. Validated insert inputs live in `survey_core::submission`.

pub mod sample;
pub mod submission;
