//! Session counters.

use serde::Serialize;

/// Running counters for one session, reset on every `start()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Frames decoded successfully.
    pub frames: u64,
    /// Interleaved samples emitted.
    pub samples: u64,
    /// Batches forwarded to consumers.
    pub batches: u64,
    /// Synchronized frames the decoder rejected.
    pub failures: u64,
    /// Bytes dropped as garbage, failed frames or unrecoverable data.
    pub discarded: u64,
    /// Times the staging buffer was reset while full.
    pub resets: u64,
}
