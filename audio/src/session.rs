//! Session lifecycle and the push/pull entry points.

use std::io::{self, Read, Write};

use madstream_buffer::StagingBuffer;
use tracing::{debug, info, warn};

use crate::batch::Batcher;
use crate::codec::FrameDecoder;
use crate::dispatch::Dispatcher;
use crate::error::{Error, Result};
use crate::format::AudioFormat;
use crate::options::{DecodeWindow, SessionOptions};
use crate::stats::Stats;
use crate::sync;

/// A streaming decode session.
///
/// Bitstream bytes go in through [`push`](Session::push) (or a registered
/// source, see [`pump`](Session::pump)) in chunks of any size and
/// alignment. Complete frames are decoded as soon as they can be delimited
/// and the samples come out through the registered consumers.
///
/// All work happens on the caller's thread inside `push`; nothing blocks
/// waiting for more input. The staging buffer exists only while the
/// session is active.
pub struct Session<D> {
    options: SessionOptions,
    staging: Option<StagingBuffer>,
    dispatcher: Dispatcher<D>,
    batcher: Batcher,
    source: Option<Box<dyn Read + Send>>,
    scratch: Vec<u8>,
    on_yield: Option<Box<dyn FnMut() + Send>>,
    stats: Stats,
}

impl<D: FrameDecoder> Session<D> {
    /// Creates an inactive session.
    pub fn new(decoder: D, options: SessionOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            staging: None,
            dispatcher: Dispatcher::new(decoder, options.window),
            batcher: Batcher::new(options.batch_capacity),
            source: None,
            scratch: Vec::new(),
            on_yield: None,
            stats: Stats::default(),
        })
    }

    /// Returns the configured options.
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Sets the staging and batch capacities.
    ///
    /// The new sizes apply from the next [`start`](Session::start); the
    /// buffers of an active session are left alone.
    pub fn configure(&mut self, staging_capacity: usize, batch_capacity: usize) -> Result<()> {
        let options = self
            .options
            .with_staging_capacity(staging_capacity)
            .with_batch_capacity(batch_capacity);
        options.validate()?;
        self.options = options;
        Ok(())
    }

    /// Sets the decode window, applied from the next `start`.
    pub fn set_window(&mut self, window: DecodeWindow) {
        self.options.window = window;
    }

    /// Registers the consumer of decoded sample batches.
    pub fn on_data<F>(&mut self, f: F)
    where
        F: FnMut(&AudioFormat, &[i16]) + Send + 'static,
    {
        self.batcher.set_data_callback(Some(Box::new(f)));
    }

    /// Registers the consumer of format changes.
    pub fn on_format<F>(&mut self, f: F)
    where
        F: FnMut(&AudioFormat) + Send + 'static,
    {
        self.batcher.set_format_callback(Some(Box::new(f)));
    }

    /// Registers a hook called between the internal sub-writes of a push.
    pub fn on_yield<F>(&mut self, f: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.on_yield = Some(Box::new(f));
    }

    /// Registers a byte sink that receives every batch as little-endian
    /// `i16` samples.
    pub fn set_sink<W: Write + Send + 'static>(&mut self, sink: W) {
        self.batcher.set_sink(Some(Box::new(sink)));
    }

    /// Registers a pull source. While a source is set the session is driven
    /// by [`pump`](Session::pump) and `push` accepts nothing.
    pub fn set_source<R: Read + Send + 'static>(&mut self, source: R) {
        self.source = Some(Box::new(source));
    }

    /// Removes the pull source, returning the session to the push API.
    pub fn clear_source(&mut self) {
        self.source = None;
    }

    /// Starts (or restarts) the session.
    ///
    /// Allocates the staging buffer, resets the decoder and forgets the
    /// published format and the counters.
    pub fn start(&mut self) {
        if self.is_active() {
            self.stop();
        }
        self.staging = Some(StagingBuffer::new(self.options.staging_capacity));
        self.dispatcher.reset();
        self.dispatcher.set_window(self.options.window);
        self.batcher.reset(self.options.batch_capacity);
        self.stats = Stats::default();
        info!(
            "session: started, staging {} bytes, batch {} samples, {:?} window",
            self.options.staging_capacity, self.options.batch_capacity, self.options.window
        );
    }

    /// Stops the session and releases the staging buffer and codec state.
    ///
    /// Undecoded bytes are dropped; call [`finish`](Session::finish) first
    /// to decode a trailing frame.
    pub fn stop(&mut self) {
        if let Some(staging) = self.staging.take() {
            self.stats.discarded += staging.len() as u64;
            self.dispatcher.reset();
            self.batcher.flush_sink();
            self.scratch = Vec::new();
            info!("session: stopped, {} frames decoded", self.stats.frames);
        }
    }

    /// Returns true between `start` and `stop`.
    pub fn is_active(&self) -> bool {
        self.staging.is_some()
    }

    /// Returns the last published audio format.
    pub fn current_format(&self) -> AudioFormat {
        self.batcher.format()
    }

    /// Returns the session counters.
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Returns the number of undecoded bytes held in the staging buffer.
    pub fn buffered(&self) -> usize {
        self.staging.as_ref().map_or(0, |s| s.len())
    }

    pub fn decoder(&self) -> &D {
        self.dispatcher.decoder()
    }

    /// Feeds bitstream bytes and decodes every frame they complete.
    ///
    /// The input is split into writes no larger than the free staging
    /// space. Returns the number of bytes accepted: all of them while the
    /// session is active, 0 when inactive or when a pull source drives the
    /// session.
    pub fn push(&mut self, bytes: &[u8]) -> usize {
        if !self.is_active() {
            return 0;
        }
        if self.source.is_some() {
            warn!("session: push ignored, a pull source is registered");
            return 0;
        }
        self.feed(bytes)
    }

    /// Decodes what is left once the input has ended: the last frame has
    /// no following marker, so it is submitted on its own. Remaining bytes
    /// that cannot form a frame are dropped.
    pub fn finish(&mut self) {
        let Self {
            staging,
            dispatcher,
            batcher,
            stats,
            ..
        } = self;
        let Some(staging) = staging.as_mut() else {
            return;
        };

        while !staging.is_empty() {
            let range = sync::locate(staging, stats);
            if range.start.is_none() {
                break;
            }
            let done = match range.checked(staging.len()) {
                Some(frame) => dispatcher.decode(staging, frame, batcher, stats),
                None => dispatcher.decode_tail(staging, batcher, stats),
            };
            debug!(
                "session: finish, {} bytes consumed (decoded: {})",
                done.consumed, done.decoded
            );
        }

        if !staging.is_empty() {
            debug!("session: dropping {} trailing bytes", staging.len());
            stats.discarded += staging.len() as u64;
            staging.reset();
        }
        batcher.flush_sink();
    }

    /// Reads one chunk from the registered source and feeds it.
    ///
    /// Returns the number of bytes read; 0 means the source is exhausted.
    pub fn pump(&mut self) -> Result<usize> {
        if !self.is_active() {
            return Err(Error::Inactive);
        }
        let capacity = self.options.staging_capacity;
        let Some(source) = self.source.as_mut() else {
            return Err(Error::NoSource);
        };

        let mut scratch = std::mem::take(&mut self.scratch);
        scratch.resize(capacity, 0);
        let read = loop {
            match source.read(&mut scratch) {
                Ok(n) => break Ok(n),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => break Err(e),
            }
        };

        let result = match read {
            Ok(n) => {
                self.feed(&scratch[..n]);
                Ok(n)
            }
            Err(e) => Err(Error::Io(e)),
        };
        self.scratch = scratch;
        result
    }

    /// Pumps the source until it is exhausted, then [`finish`](Session::finish)es.
    ///
    /// Returns the total number of bytes read.
    pub fn run(&mut self) -> Result<u64> {
        let mut total = 0u64;
        loop {
            let n = self.pump()?;
            if n == 0 {
                break;
            }
            total += n as u64;
        }
        self.finish();
        Ok(total)
    }

    fn feed(&mut self, bytes: &[u8]) -> usize {
        debug!("session: write {}", bytes.len());
        let mut accepted = 0;
        while accepted < bytes.len() {
            let n = self.write_chunk(&bytes[accepted..]);
            if n == 0 {
                warn!("session: staging buffer refused data");
                break;
            }
            accepted += n;
            debug!("session: written {} of {}", accepted, bytes.len());
            if accepted < bytes.len() {
                if let Some(hook) = self.on_yield.as_mut() {
                    hook();
                }
            }
        }
        accepted
    }

    /// Appends what fits, then decodes every complete frame in the buffer.
    fn write_chunk(&mut self, chunk: &[u8]) -> usize {
        let Self {
            staging,
            dispatcher,
            batcher,
            stats,
            ..
        } = self;
        let Some(staging) = staging.as_mut() else {
            return 0;
        };

        let written = staging.append(chunk);
        loop {
            let range = sync::locate(staging, stats);
            let Some(frame) = range.checked(staging.len()) else {
                break;
            };
            let done = dispatcher.decode(staging, frame, batcher, stats);
            if !done.decoded {
                debug!("session: skipped {} bytes of a rejected frame", done.consumed);
            }
        }
        written
    }
}

impl<D> Drop for Session<D> {
    fn drop(&mut self) {
        if self.staging.take().is_some() {
            self.batcher.flush_sink();
        }
    }
}
