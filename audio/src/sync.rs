//! Frame synchronization over the staging buffer.
//!
//! A frame starts with a sync word: eleven set bits (`0xFFE`) spanning the
//! first two bytes. A frame is known to be complete once a second sync word
//! follows it, so [`locate`] reports the span between two markers.

use std::ops::Range;

use madstream_buffer::StagingBuffer;
use tracing::{debug, warn};

use crate::stats::Stats;

/// Returns true if the two bytes start a frame marker.
#[inline]
pub fn is_marker(b0: u8, b1: u8) -> bool {
    b0 == 0xFF && (b1 & 0xE0) == 0xE0
}

/// Returns the offset of the first marker at or after `from`.
pub fn find_marker(bytes: &[u8], from: usize) -> Option<usize> {
    if from >= bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(2)
        .position(|w| is_marker(w[0], w[1]))
        .map(|pos| pos + from)
}

/// Byte span of the next candidate frame inside the staging buffer.
///
/// `None` means unknown: no marker for `start`, no following marker for
/// `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameRange {
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl FrameRange {
    /// No marker found.
    pub const UNKNOWN: FrameRange = FrameRange {
        start: None,
        end: None,
    };

    /// Returns the complete frame span, if both ends are known.
    pub fn frame(&self) -> Option<Range<usize>> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if end > start => Some(start..end),
            _ => None,
        }
    }

    /// Returns the complete frame span if it lies within `len` buffered
    /// bytes.
    pub fn checked(&self, len: usize) -> Option<Range<usize>> {
        self.frame().filter(|r| r.end <= len)
    }
}

/// Finds the next frame in `buf`.
///
/// Bytes before the first marker are discarded so that a located frame
/// always starts at offset 0. A full buffer that holds no marker, or holds
/// a marker with no room left for the next one, is reset: that data can
/// never become a decodable frame.
pub fn locate(buf: &mut StagingBuffer, stats: &mut Stats) -> FrameRange {
    let bytes = buf.as_slice();

    let Some(start) = find_marker(bytes, 0) else {
        if buf.is_full() {
            warn!("sync: no marker in {} bytes, data was ignored", buf.len());
            stats.discarded += buf.len() as u64;
            stats.resets += 1;
            buf.reset();
        }
        return FrameRange::UNKNOWN;
    };
    let end = find_marker(bytes, start + 2);

    if start > 0 {
        debug!("sync: skipping {} bytes before marker", start);
        stats.discarded += start as u64;
        buf.compact(start);
    }

    let range = FrameRange {
        start: Some(0),
        end: end.map(|e| e - start),
    };

    if range.end.is_none() && buf.is_full() {
        warn!(
            "sync: frame exceeds staging capacity {}, data was ignored",
            buf.capacity()
        );
        stats.discarded += buf.len() as u64;
        stats.resets += 1;
        buf.reset();
        return FrameRange::UNKNOWN;
    }

    range
}
