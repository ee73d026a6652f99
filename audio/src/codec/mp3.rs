//! MP3 frame decoder using nanomp3.

use super::{DecodeError, FrameDecoder, PcmFrame};
use crate::fixed;
use crate::format::AudioFormat;

/// MP3 frame decoder backed by the pure-Rust nanomp3 crate.
///
/// nanomp3 keeps no input buffering of its own: every call must carry the
/// complete frame, which is what the session's synchronizer guarantees.
/// Its float output is converted to fixed point so that scaling to 16-bit
/// follows the same truncation rules as every other backend.
pub struct Mp3FrameDecoder {
    inner: nanomp3::Decoder,
    pcm: Vec<f32>,
}

impl Mp3FrameDecoder {
    /// Creates a new MP3 decoder.
    pub fn new() -> Self {
        Self {
            inner: nanomp3::Decoder::new(),
            pcm: vec![0.0f32; nanomp3::MAX_SAMPLES_PER_FRAME],
        }
    }
}

impl Default for Mp3FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder for Mp3FrameDecoder {
    fn decode_frame(&mut self, input: &[u8], out: &mut PcmFrame) -> Result<usize, DecodeError> {
        if input.is_empty() {
            return Err(DecodeError::NoFrame);
        }

        let (consumed, info) = self.inner.decode(input, &mut self.pcm);
        let Some(info) = info else {
            return Err(DecodeError::NoFrame);
        };

        let channels = (info.channels.num() as usize).max(1);
        let len = info.samples_produced.min(self.pcm.len() / channels);
        out.prepare(AudioFormat::new(info.sample_rate, channels as u16), len);

        // nanomp3 output is interleaved.
        for ch in 0..channels {
            let dst = out.channel_mut(ch);
            for (j, sample) in dst.iter_mut().enumerate() {
                *sample = fixed::from_f32(self.pcm[j * channels + ch]);
            }
        }

        Ok(consumed.min(input.len()))
    }

    fn reset(&mut self) {
        self.inner = nanomp3::Decoder::new();
    }
}
