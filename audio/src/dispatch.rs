//! Hands synchronized frames to the decoder and compacts after each one.

use std::ops::Range;

use madstream_buffer::StagingBuffer;
use tracing::{debug, warn};

use crate::batch::Batcher;
use crate::codec::{FrameDecoder, PcmFrame};
use crate::options::DecodeWindow;
use crate::stats::Stats;

/// Outcome of one decode attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatched {
    /// True if the decoder produced a frame.
    pub decoded: bool,
    /// Bytes removed from the front of the staging buffer for this frame,
    /// excluding any bytes before the frame start.
    pub consumed: usize,
}

/// Owns the decoder and its reusable output frame.
pub struct Dispatcher<D> {
    decoder: D,
    frame: PcmFrame,
    window: DecodeWindow,
}

impl<D: FrameDecoder> Dispatcher<D> {
    pub fn new(decoder: D, window: DecodeWindow) -> Self {
        Self {
            decoder,
            frame: PcmFrame::new(),
            window,
        }
    }

    pub fn window(&self) -> DecodeWindow {
        self.window
    }

    pub fn set_window(&mut self, window: DecodeWindow) {
        self.window = window;
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Drops codec state and the last decoded frame.
    pub fn reset(&mut self) {
        self.decoder.reset();
        self.frame.clear();
    }

    /// Decodes the frame at `range` of `buf`.
    ///
    /// On success the buffer is compacted by the physical frame length the
    /// decoder reports and the samples go to `batcher`. On failure the
    /// whole range is dropped; it is never retried.
    ///
    /// # Panics
    ///
    /// Panics if `range` is empty or extends past the buffered bytes.
    pub fn decode(
        &mut self,
        buf: &mut StagingBuffer,
        range: Range<usize>,
        batcher: &mut Batcher,
        stats: &mut Stats,
    ) -> Dispatched {
        assert!(
            range.start < range.end && range.end <= buf.len(),
            "frame range {:?} outside {} buffered bytes",
            range,
            buf.len()
        );
        let submitted = match self.window {
            DecodeWindow::Frame => range.clone(),
            DecodeWindow::Tail => range.start..buf.len(),
        };
        self.submit(buf, range, submitted, batcher, stats)
    }

    /// Decodes a trailing frame that has no following marker, submitting
    /// everything buffered. Used once the input has ended.
    pub fn decode_tail(
        &mut self,
        buf: &mut StagingBuffer,
        batcher: &mut Batcher,
        stats: &mut Stats,
    ) -> Dispatched {
        if buf.is_empty() {
            return Dispatched {
                decoded: false,
                consumed: 0,
            };
        }
        let range = 0..buf.len();
        self.submit(buf, range.clone(), range, batcher, stats)
    }

    fn submit(
        &mut self,
        buf: &mut StagingBuffer,
        range: Range<usize>,
        submitted: Range<usize>,
        batcher: &mut Batcher,
        stats: &mut Stats,
    ) -> Dispatched {
        let input = &buf.as_slice()[submitted.clone()];
        match self.decoder.decode_frame(input, &mut self.frame) {
            Ok(consumed) => {
                assert!(
                    consumed <= submitted.len(),
                    "decoder consumed {} of {} submitted bytes",
                    consumed,
                    submitted.len()
                );
                // A frame always occupies at least its own span.
                let consumed = if consumed == 0 { range.len() } else { consumed };
                debug!(
                    "dispatch: decoded {} bytes, {} samples",
                    consumed,
                    self.frame.sample_count()
                );
                buf.compact(range.start + consumed);
                stats.frames += 1;
                if !self.frame.is_empty() {
                    batcher.emit(&self.frame, stats);
                }
                Dispatched {
                    decoded: true,
                    consumed,
                }
            }
            Err(e) => {
                warn!("dispatch: {}, dropping {} bytes", e, range.len());
                stats.failures += 1;
                stats.discarded += range.len() as u64;
                buf.compact(range.end);
                Dispatched {
                    decoded: false,
                    consumed: range.len(),
                }
            }
        }
    }
}
