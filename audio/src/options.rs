//! Session configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default staging buffer size in bytes.
pub const DEFAULT_STAGING_CAPACITY: usize = 1024;

/// Default number of samples per emitted batch.
pub const DEFAULT_BATCH_CAPACITY: usize = 1024;

/// Which bytes are submitted to the decoder for a located frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeWindow {
    /// Only the span between the frame's marker and the next marker.
    Frame,
    /// Everything from the frame's marker to the end of the buffered data.
    ///
    /// The decoder reports the physical frame length, so a marker-like byte
    /// pair inside the frame payload does not split the frame.
    #[default]
    Tail,
}

/// Session options.
///
/// # Example
///
/// ```
/// use madstream_audio::{DecodeWindow, SessionOptions};
///
/// let opts = SessionOptions::default()
///     .with_staging_capacity(4096)
///     .with_batch_capacity(576)
///     .with_window(DecodeWindow::Frame);
/// assert!(opts.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    /// Staging buffer capacity in bytes. Bounds the largest frame that can
    /// be decoded.
    pub staging_capacity: usize,
    /// Maximum number of interleaved samples per emitted batch.
    pub batch_capacity: usize,
    /// Decode submission window.
    pub window: DecodeWindow,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            staging_capacity: DEFAULT_STAGING_CAPACITY,
            batch_capacity: DEFAULT_BATCH_CAPACITY,
            window: DecodeWindow::default(),
        }
    }
}

impl SessionOptions {
    /// Sets the staging buffer capacity.
    pub fn with_staging_capacity(mut self, capacity: usize) -> Self {
        self.staging_capacity = capacity;
        self
    }

    /// Sets the batch capacity.
    pub fn with_batch_capacity(mut self, capacity: usize) -> Self {
        self.batch_capacity = capacity;
        self
    }

    /// Sets the decode window.
    pub fn with_window(mut self, window: DecodeWindow) -> Self {
        self.window = window;
        self
    }

    /// Checks that both capacities are non-zero.
    pub fn validate(&self) -> Result<()> {
        if self.staging_capacity == 0 {
            return Err(Error::ZeroStagingCapacity);
        }
        if self.batch_capacity == 0 {
            return Err(Error::ZeroBatchCapacity);
        }
        Ok(())
    }
}
