//! Domain logic for the sound survey service.
//!
//! Nothing in this crate talks to the database or the network. The `db`
//! crate feeds it catalog state and the `api` crate feeds it request input.

pub mod delivery;
pub mod error;
pub mod exposure;
pub mod sample_source;
pub mod submission;
pub mod types;
