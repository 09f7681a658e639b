//! Pulse API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes, the
//! job registry and the live SMS stream) so integration tests and the binary
//! entrypoint can both access them.

pub mod app;
pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod jobs;
pub mod response;
pub mod routes;
pub mod sse;
pub mod state;
