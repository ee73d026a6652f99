//! Frame decoder seam.
//!
//! The session never decodes audio itself. It hands one synchronized frame
//! at a time to a [`FrameDecoder`] and reads back a [`PcmFrame`]:
//!
//! - `mp3`: MP3 decoding using nanomp3 (feature `nanomp3`)

#[cfg(feature = "nanomp3")]
mod mp3;

#[cfg(feature = "nanomp3")]
pub use mp3::Mp3FrameDecoder;

use thiserror::Error;

use crate::fixed::Fixed;
use crate::format::AudioFormat;

/// Failure to decode a submitted frame.
///
/// These are routine on corrupted or mis-synchronized input. The session
/// logs them and skips past the frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// No frame could be decoded from the input.
    #[error("decode: no frame found")]
    NoFrame,
    /// The frame header announces more bytes than were submitted.
    #[error("decode: truncated frame: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },
    /// The frame is structurally invalid.
    #[error("decode: malformed frame: {0}")]
    Malformed(String),
}

/// Decodes exactly one frame per call.
///
/// `input` starts with a frame marker. On success the decoder fills `out`
/// and returns the number of input bytes the frame physically occupied,
/// which may be shorter than `input`. Internal codec state advances by one
/// frame per successful call.
pub trait FrameDecoder {
    /// Decodes the frame at the start of `input` into `out`.
    fn decode_frame(&mut self, input: &[u8], out: &mut PcmFrame) -> Result<usize, DecodeError>;

    /// Discards codec state carried between frames.
    fn reset(&mut self) {}
}

impl<D: FrameDecoder + ?Sized> FrameDecoder for Box<D> {
    fn decode_frame(&mut self, input: &[u8], out: &mut PcmFrame) -> Result<usize, DecodeError> {
        (**self).decode_frame(input, out)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// A decoded frame: one fixed-point sample sequence per channel, all of the
/// same length, plus the format they were decoded at.
///
/// The storage is reused across frames.
#[derive(Debug, Clone, Default)]
pub struct PcmFrame {
    format: AudioFormat,
    channels: Vec<Vec<Fixed>>,
    len: usize,
}

impl PcmFrame {
    /// Creates an empty frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sizes the frame for `format.channels` channels of `len` samples each,
    /// zero-filled.
    pub fn prepare(&mut self, format: AudioFormat, len: usize) {
        let channels = format.channels as usize;
        self.channels.truncate(channels);
        self.channels.resize_with(channels, Vec::new);
        for ch in &mut self.channels {
            ch.clear();
            ch.resize(len, 0);
        }
        self.format = format;
        self.len = len;
    }

    /// Empties the frame, keeping its format.
    pub fn clear(&mut self) {
        self.len = 0;
        for ch in &mut self.channels {
            ch.clear();
        }
    }

    /// Returns the format the samples were decoded at.
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Returns the number of channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Returns the number of samples per channel.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the frame holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len == 0 || self.channels.is_empty()
    }

    /// Returns the total number of samples across all channels.
    pub fn sample_count(&self) -> usize {
        self.len * self.channels.len()
    }

    /// Returns the samples of channel `ch`.
    pub fn channel(&self, ch: usize) -> &[Fixed] {
        &self.channels[ch][..self.len]
    }

    /// Returns the samples of channel `ch` for writing.
    pub fn channel_mut(&mut self, ch: usize) -> &mut [Fixed] {
        let len = self.len;
        &mut self.channels[ch][..len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pcm_frame_prepare() {
        let mut frame = PcmFrame::new();
        assert!(frame.is_empty());

        frame.prepare(AudioFormat::new(44100, 2), 4);
        assert_eq!(frame.channel_count(), 2);
        assert_eq!(frame.len(), 4);
        assert_eq!(frame.sample_count(), 8);
        assert_eq!(frame.channel(1), &[0, 0, 0, 0]);
        assert_eq!(frame.format(), AudioFormat::new(44100, 2));
    }

    #[test]
    fn test_pcm_frame_reuse_zero_fills() {
        let mut frame = PcmFrame::new();
        frame.prepare(AudioFormat::new(16000, 2), 3);
        frame.channel_mut(0).copy_from_slice(&[1, 2, 3]);

        frame.prepare(AudioFormat::new(16000, 1), 2);
        assert_eq!(frame.channel_count(), 1);
        assert_eq!(frame.channel(0), &[0, 0]);
    }

    #[test]
    fn test_pcm_frame_clear() {
        let mut frame = PcmFrame::new();
        frame.prepare(AudioFormat::new(8000, 1), 10);
        frame.clear();
        assert!(frame.is_empty());
        assert_eq!(frame.format(), AudioFormat::new(8000, 1));
    }

    #[test]
    fn test_decode_error_display() {
        assert!(DecodeError::NoFrame.to_string().contains("no frame"));
        let err = DecodeError::Truncated {
            needed: 417,
            available: 100,
        };
        assert!(err.to_string().contains("417"));
        assert!(
            DecodeError::Malformed("bad header".into())
                .to_string()
                .contains("bad header")
        );
    }
}
