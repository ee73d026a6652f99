//! Audio format descriptor for decoded streams.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Bit depth of every sample the session emits.
pub const OUTPUT_BITS_PER_SAMPLE: u16 = 16;

/// Describes the decoded audio: sample rate, channel count and bit depth.
///
/// A new value is computed for every decoded frame. Sessions compare it with
/// the last published value and only notify consumers when it differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioFormat {
    /// Sample rate in Hz (0 until the first frame is decoded).
    pub sample_rate: u32,
    /// Number of interleaved channels (0 until the first frame is decoded).
    pub channels: u16,
    /// Bits per output sample.
    pub bits_per_sample: u16,
}

impl AudioFormat {
    /// Creates a 16-bit format with the given rate and channel count.
    pub const fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
            bits_per_sample: OUTPUT_BITS_PER_SAMPLE,
        }
    }

    /// Returns true once rate and channel count are both known.
    pub fn is_known(&self) -> bool {
        self.sample_rate > 0 && self.channels > 0
    }
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}Hz {}ch {}bit",
            self.sample_rate, self.channels, self.bits_per_sample
        )
    }
}
