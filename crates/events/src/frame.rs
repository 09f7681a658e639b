//! Server-sent event framing.
//!
//! Each event is one `data:` line holding compact JSON followed by a blank
//! line. Heartbeats are comment frames, which conforming clients ignore.

use serde::Serialize;

/// Keep-alive comment frame.
pub const HEARTBEAT: &str = ": ping\n\n";

/// Encode `payload` as a single `data: <JSON>\n\n` frame.
///
/// Compact `serde_json` output escapes embedded newlines, so the payload
/// always fits on one `data:` line.
pub fn data<T: Serialize>(payload: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(payload)?;
    Ok(format!("data: {json}\n\n"))
}
