#![allow(dead_code)]

use std::io::Write;
use std::sync::{Arc, Mutex};

use madstream_audio::fixed;
use madstream_audio::sync::is_marker;
use madstream_audio::{AudioFormat, DecodeError, FrameDecoder, PcmFrame, Session, SessionOptions};
use tracing_subscriber::EnvFilter;

/// Routes library logs to the test harness; `RUST_LOG` selects the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Sample rates addressable by the toy header.
pub const RATES: [u32; 4] = [8000, 16000, 44100, 48000];

/// Toy codec.
///
/// Header: `0xFF`, `0xE0 | rate_index << 1 | (channels - 1)`, samples per
/// channel. Payload: interleaved little-endian `i16` samples. Payload bytes
/// are never `0xFF`, so markers only appear at frame starts.
#[derive(Debug, Default)]
pub struct ToyCodec {
    pub calls: usize,
    pub resets: usize,
}

impl FrameDecoder for ToyCodec {
    fn decode_frame(&mut self, input: &[u8], out: &mut PcmFrame) -> Result<usize, DecodeError> {
        self.calls += 1;
        if input.len() < 3 || !is_marker(input[0], input[1]) {
            return Err(DecodeError::NoFrame);
        }
        let rate = RATES[((input[1] >> 1) & 0x3) as usize];
        let channels = (input[1] & 0x1) as usize + 1;
        let len = input[2] as usize;
        if len == 0 {
            return Err(DecodeError::Malformed("empty frame".into()));
        }
        let needed = 3 + len * channels * 2;
        if input.len() < needed {
            return Err(DecodeError::Truncated {
                needed,
                available: input.len(),
            });
        }

        out.prepare(AudioFormat::new(rate, channels as u16), len);
        for j in 0..len {
            for ch in 0..channels {
                let off = 3 + (j * channels + ch) * 2;
                let v = i16::from_le_bytes([input[off], input[off + 1]]);
                out.channel_mut(ch)[j] = fixed::from_i16(v);
            }
        }
        Ok(needed)
    }

    fn reset(&mut self) {
        self.resets += 1;
    }
}

/// An encoded toy frame and the interleaved samples it decodes to.
#[derive(Debug, Clone)]
pub struct Frame {
    pub bytes: Vec<u8>,
    pub samples: Vec<i16>,
    pub format: AudioFormat,
}

fn sample_value(seed: u32, j: usize, ch: usize) -> i16 {
    let v = (seed * 131 + j as u32 * 17 + ch as u32 * 7919) % 0x7E00;
    let v = if v & 0xFF == 0xFF { v - 1 } else { v };
    v as i16
}

/// Builds a toy frame.
pub fn frame(rate_index: u8, channels: u8, len: u8, seed: u32) -> Frame {
    assert!(rate_index < 4 && (1..=2).contains(&channels));
    let mut bytes = vec![0xFF, 0xE0 | (rate_index << 1) | (channels - 1), len];
    let mut samples = Vec::new();
    for j in 0..len as usize {
        for ch in 0..channels as usize {
            let v = sample_value(seed, j, ch);
            bytes.extend_from_slice(&v.to_le_bytes());
            samples.push(v);
        }
    }
    Frame {
        bytes,
        samples,
        format: AudioFormat::new(RATES[rate_index as usize], channels as u16),
    }
}

/// A frame whose header is recognized but which fails to decode.
pub fn broken_frame(payload: usize) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xE0, 0];
    bytes.extend(std::iter::repeat_n(0x33, payload));
    bytes
}

/// Concatenates frames into one stream.
pub fn stream(frames: &[Frame]) -> Vec<u8> {
    frames.iter().flat_map(|f| f.bytes.iter().copied()).collect()
}

/// Concatenates the expected samples of `frames`.
pub fn expected(frames: &[Frame]) -> Vec<i16> {
    frames.iter().flat_map(|f| f.samples.iter().copied()).collect()
}

/// Deterministic bytes in `0x00..0x80`, never a marker.
pub fn garbage(n: usize, seed: u64) -> Vec<u8> {
    lcg(n, seed).into_iter().map(|b| b & 0x7F).collect()
}

/// Deterministic bytes over the full range.
pub fn lcg(n: usize, seed: u64) -> Vec<u8> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 33) as u8
        })
        .collect()
}

/// What the consumers of a session saw.
#[derive(Clone, Default)]
pub struct Collected {
    pub batches: Arc<Mutex<Vec<(AudioFormat, Vec<i16>)>>>,
    pub formats: Arc<Mutex<Vec<AudioFormat>>>,
}

impl Collected {
    pub fn batches(&self) -> Vec<(AudioFormat, Vec<i16>)> {
        self.batches.lock().unwrap().clone()
    }

    pub fn samples(&self) -> Vec<i16> {
        self.batches
            .lock()
            .unwrap()
            .iter()
            .flat_map(|(_, s)| s.iter().copied())
            .collect()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().unwrap().iter().map(|(_, s)| s.len()).collect()
    }

    pub fn formats(&self) -> Vec<AudioFormat> {
        self.formats.lock().unwrap().clone()
    }
}

/// Creates a started session with collecting consumers.
pub fn session(options: SessionOptions) -> (Session<ToyCodec>, Collected) {
    init_tracing();
    let mut session = Session::new(ToyCodec::default(), options).unwrap();
    let collected = Collected::default();

    let batches = collected.batches.clone();
    session.on_data(move |format, samples| {
        batches.lock().unwrap().push((*format, samples.to_vec()));
    });
    let formats = collected.formats.clone();
    session.on_format(move |format| {
        formats.lock().unwrap().push(*format);
    });

    session.start();
    (session, collected)
}

/// A `Write` whose bytes can be inspected after it has been moved into a
/// session.
#[derive(Clone, Default)]
pub struct SharedSink(pub Arc<Mutex<Vec<u8>>>);

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
