//! Output batching and format-change notification.

use std::io::Write;

use tracing::{debug, trace, warn};

use crate::codec::PcmFrame;
use crate::fixed;
use crate::format::AudioFormat;
use crate::stats::Stats;

/// Receives each batch of interleaved 16-bit samples.
///
/// The slice is only valid for the duration of the call; its storage is
/// reused for the next batch.
pub type DataCallback = Box<dyn FnMut(&AudioFormat, &[i16]) + Send>;

/// Receives the new format whenever it changes.
pub type FormatCallback = Box<dyn FnMut(&AudioFormat) + Send>;

/// Byte sink receiving every batch as little-endian `i16` samples.
pub type Sink = Box<dyn Write + Send>;

/// Converts decoded frames into bounded batches of interleaved samples.
pub struct Batcher {
    capacity: usize,
    samples: Vec<i16>,
    bytes: Vec<u8>,
    format: AudioFormat,
    on_data: Option<DataCallback>,
    on_format: Option<FormatCallback>,
    sink: Option<Sink>,
}

impl Batcher {
    /// Creates a batcher emitting at most `capacity` samples per batch.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be greater than 0");
        Self {
            capacity,
            samples: Vec::with_capacity(capacity),
            bytes: Vec::new(),
            format: AudioFormat::default(),
            on_data: None,
            on_format: None,
            sink: None,
        }
    }

    /// Returns the batch capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Changes the batch capacity and forgets the published format.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn reset(&mut self, capacity: usize) {
        assert!(capacity > 0, "capacity must be greater than 0");
        self.capacity = capacity;
        self.samples = Vec::with_capacity(capacity);
        self.format = AudioFormat::default();
    }

    /// Returns the last published format.
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn set_data_callback(&mut self, cb: Option<DataCallback>) {
        self.on_data = cb;
    }

    pub fn set_format_callback(&mut self, cb: Option<FormatCallback>) {
        self.on_format = cb;
    }

    pub fn set_sink(&mut self, sink: Option<Sink>) {
        self.sink = sink;
    }

    /// Publishes `frame`: notifies a format change, then forwards its
    /// samples interleaved per sample index, in batches of at most
    /// `capacity`.
    pub fn emit(&mut self, frame: &PcmFrame, stats: &mut Stats) {
        let current = frame.format();
        if current != self.format {
            debug!("batch: format changed {} -> {}", self.format, current);
            if let Some(cb) = self.on_format.as_mut() {
                cb(&current);
            }
            self.format = current;
        }

        let channels = frame.channel_count();
        for j in 0..frame.len() {
            for ch in 0..channels {
                self.samples.push(fixed::scale(frame.channel(ch)[j]));
                if self.samples.len() == self.capacity {
                    self.flush(stats);
                }
            }
        }
        if !self.samples.is_empty() {
            self.flush(stats);
        }
    }

    /// Flushes the sink, if any.
    pub fn flush_sink(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            if let Err(e) = sink.flush() {
                warn!("batch: sink flush failed: {}", e);
            }
        }
    }

    fn flush(&mut self, stats: &mut Stats) {
        let format = self.format;
        if let Some(cb) = self.on_data.as_mut() {
            cb(&format, &self.samples);
        }
        if let Some(sink) = self.sink.as_mut() {
            self.bytes.clear();
            for sample in &self.samples {
                self.bytes.extend_from_slice(&sample.to_le_bytes());
            }
            if let Err(e) = sink.write_all(&self.bytes) {
                warn!("batch: sink write failed: {}", e);
            }
        }

        trace!("batch: flushed {} samples", self.samples.len());
        stats.batches += 1;
        stats.samples += self.samples.len() as u64;
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn frame(format: AudioFormat, channels: &[&[i16]]) -> PcmFrame {
        let len = channels.first().map_or(0, |c| c.len());
        let mut f = PcmFrame::new();
        f.prepare(format, len);
        for (ch, samples) in channels.iter().enumerate() {
            for (dst, &s) in f.channel_mut(ch).iter_mut().zip(samples.iter()) {
                *dst = fixed::from_i16(s);
            }
        }
        f
    }

    fn collect(batcher: &mut Batcher) -> Arc<Mutex<Vec<Vec<i16>>>> {
        let batches = Arc::new(Mutex::new(Vec::new()));
        let sink = batches.clone();
        batcher.set_data_callback(Some(Box::new(move |_: &AudioFormat, samples: &[i16]| {
            sink.lock().unwrap().push(samples.to_vec());
        })));
        batches
    }

    #[test]
    fn test_batcher_interleaves() {
        let mut batcher = Batcher::new(16);
        let batches = collect(&mut batcher);
        let mut stats = Stats::default();

        let f = frame(AudioFormat::new(44100, 2), &[&[1, 2, 3], &[-1, -2, -3]]);
        batcher.emit(&f, &mut stats);

        let batches = batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0], vec![1, -1, 2, -2, 3, -3]);
        assert_eq!(stats.batches, 1);
        assert_eq!(stats.samples, 6);
    }

    #[test]
    fn test_batcher_splits_at_capacity() {
        let mut batcher = Batcher::new(4);
        let batches = collect(&mut batcher);
        let mut stats = Stats::default();

        let left: Vec<i16> = (0..5).collect();
        let right: Vec<i16> = (100..105).collect();
        let f = frame(AudioFormat::new(48000, 2), &[&left[..], &right[..]]);
        batcher.emit(&f, &mut stats);

        let batches = batches.lock().unwrap();
        let sizes: Vec<usize> = batches.iter().map(|b| b.len()).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
        let flat: Vec<i16> = batches.concat();
        assert_eq!(flat, vec![0, 100, 1, 101, 2, 102, 3, 103, 4, 104]);
    }

    #[test]
    fn test_batcher_exact_multiple_has_no_empty_batch() {
        let mut batcher = Batcher::new(3);
        let batches = collect(&mut batcher);
        let mut stats = Stats::default();

        let f = frame(AudioFormat::new(8000, 1), &[&[1, 2, 3, 4, 5, 6]]);
        batcher.emit(&f, &mut stats);

        let batches = batches.lock().unwrap();
        assert_eq!(batches.len(), 2);
        assert!(batches.iter().all(|b| b.len() == 3));
    }

    #[test]
    fn test_batcher_format_notified_once() {
        let mut batcher = Batcher::new(8);
        let formats = Arc::new(Mutex::new(Vec::new()));
        let seen = formats.clone();
        batcher.set_format_callback(Some(Box::new(move |f: &AudioFormat| {
            seen.lock().unwrap().push(*f);
        })));
        let mut stats = Stats::default();

        let a = AudioFormat::new(44100, 2);
        let b = AudioFormat::new(22050, 1);
        for fmt in [a, a, b, b, a] {
            let channels: Vec<&[i16]> = (0..fmt.channels).map(|_| &[0i16, 0][..]).collect();
            batcher.emit(&frame(fmt, &channels), &mut stats);
        }

        assert_eq!(*formats.lock().unwrap(), vec![a, b, a]);
        assert_eq!(batcher.format(), a);
    }

    #[test]
    fn test_batcher_empty_frame_updates_format() {
        let mut batcher = Batcher::new(8);
        let batches = collect(&mut batcher);
        let mut stats = Stats::default();

        let f = frame(AudioFormat::new(32000, 1), &[&[]]);
        batcher.emit(&f, &mut stats);

        assert!(batches.lock().unwrap().is_empty());
        assert_eq!(batcher.format(), AudioFormat::new(32000, 1));
        assert_eq!(stats.batches, 0);
    }

    #[derive(Clone, Default)]
    struct SharedSink(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_batcher_sink_receives_le_bytes() {
        let mut batcher = Batcher::new(2);
        let sink = SharedSink::default();
        batcher.set_sink(Some(Box::new(sink.clone())));
        let mut stats = Stats::default();

        let f = frame(AudioFormat::new(16000, 1), &[&[1, -2, 0x0102]]);
        batcher.emit(&f, &mut stats);
        batcher.flush_sink();

        assert_eq!(
            *sink.0.lock().unwrap(),
            vec![0x01, 0x00, 0xFE, 0xFF, 0x02, 0x01]
        );
    }

    #[test]
    fn test_batcher_reset() {
        let mut batcher = Batcher::new(8);
        let mut stats = Stats::default();
        batcher.emit(&frame(AudioFormat::new(44100, 1), &[&[1]]), &mut stats);
        batcher.reset(2);
        assert_eq!(batcher.capacity(), 2);
        assert_eq!(batcher.format(), AudioFormat::default());
    }
}
