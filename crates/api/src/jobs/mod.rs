//! Process-local tracking of asynchronous video generation jobs.
//!
//! The generation worker reports progress through the HTTP layer; polling
//! clients read the latest record. Nothing is persisted.

pub mod registry;

pub use registry::{JobRegistry, UpdateOutcome};
