//! Streaming frame decoder adaptor.
//!
//! This crate feeds arbitrarily sized and aligned chunks of a compressed
//! audio bitstream into a frame-oriented decoder and republishes the
//! decoded audio in bounded batches:
//!
//! - `sync`: locating frame markers in the staging buffer
//! - `dispatch`: decoding one frame at a time and compacting after it
//! - `batch`: interleaving, 16-bit scaling and format-change notification
//! - `session`: lifecycle plus the push and pull entry points
//! - `codec`: the [`FrameDecoder`] seam and the MP3 backend
//!
//! # Example
//!
//! ```rust
//! use madstream_audio::{AudioFormat, DecodeError, FrameDecoder, PcmFrame, Session, SessionOptions};
//!
//! // Marker, then a sample count byte; every sample is silence.
//! struct Silence;
//!
//! impl FrameDecoder for Silence {
//!     fn decode_frame(&mut self, input: &[u8], out: &mut PcmFrame) -> Result<usize, DecodeError> {
//!         let n = *input.get(2).ok_or(DecodeError::NoFrame)? as usize;
//!         out.prepare(AudioFormat::new(16000, 1), n);
//!         Ok(3)
//!     }
//! }
//!
//! let mut session = Session::new(Silence, SessionOptions::default()).unwrap();
//! session.on_data(|format, samples| println!("{} samples at {}", samples.len(), format));
//! session.start();
//!
//! // A frame split across two pushes.
//! session.push(&[0xFF, 0xE0]);
//! session.push(&[4, 0xFF, 0xE0, 2]);
//! session.finish();
//!
//! assert_eq!(session.stats().frames, 2);
//! assert_eq!(session.current_format(), AudioFormat::new(16000, 1));
//! ```

pub mod batch;
pub mod codec;
pub mod dispatch;
mod error;
pub mod fixed;
mod format;
mod options;
mod session;
mod stats;
pub mod sync;

pub use codec::{DecodeError, FrameDecoder, PcmFrame};
pub use error::{Error, Result};
pub use format::{AudioFormat, OUTPUT_BITS_PER_SAMPLE};
pub use madstream_buffer::StagingBuffer;
pub use options::{DecodeWindow, SessionOptions, DEFAULT_BATCH_CAPACITY, DEFAULT_STAGING_CAPACITY};
pub use session::Session;
pub use stats::Stats;
pub use sync::FrameRange;

#[cfg(feature = "nanomp3")]
pub use codec::Mp3FrameDecoder;
