//! Domain types shared by the pulse crates.
//!
//! Nothing in here touches I/O: the job model and its transition rules, the
//! SMS event shape, and the error type used at crate boundaries.

pub mod error;
pub mod jobs;
pub mod sms;
pub mod types;
