//! Server-sent event infrastructure for the live SMS feed.
//!
//! Each connection subscribes to the [`EventHub`](pulse_events::EventHub)
//! for as long as its response body is alive and interleaves hub frames with
//! its own heartbeat.

mod stream;

pub use stream::{connection_stream, EVENT_STREAM_CONTENT_TYPE};
