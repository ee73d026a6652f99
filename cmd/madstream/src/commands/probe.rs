//! Probe command.

use std::sync::{Arc, Mutex};

use clap::Args;
use serde::Serialize;

use madstream_audio::{AudioFormat, Mp3FrameDecoder, Session, Stats};

use super::{load_options, open_input, print_stats, push_all};
use crate::Cli;

/// Decode without writing PCM and report what was found.
#[derive(Args)]
pub struct ProbeCommand {
    /// Input MP3 file (default: stdin)
    input: Option<String>,

    /// Output as JSON (for piping)
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct ProbeReport {
    bytes: u64,
    formats: Vec<AudioFormat>,
    stats: Stats,
}

impl ProbeCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let options = load_options(cli)?;
        let mut session = Session::new(Mp3FrameDecoder::new(), options)?;

        let formats = Arc::new(Mutex::new(Vec::new()));
        let seen = formats.clone();
        session.on_format(move |format: &AudioFormat| {
            if let Ok(mut formats) = seen.lock() {
                formats.push(*format);
            }
        });
        session.start();

        let mut input = open_input(self.input.as_deref())?;
        let bytes = push_all(&mut session, &mut input, cli.chunk)?;
        let stats = session.stats();
        session.stop();

        let formats = formats
            .lock()
            .map_err(|_| anyhow::anyhow!("format list poisoned"))?
            .clone();
        let report = ProbeReport {
            bytes,
            formats,
            stats,
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("bytes: {}", report.bytes);
            for line in format_lines(&report.formats) {
                println!("{}", line);
            }
            print_stats(&report.stats);
        }
        Ok(())
    }
}

fn format_lines(formats: &[AudioFormat]) -> Vec<String> {
    let known: Vec<&AudioFormat> = formats.iter().filter(|f| f.is_known()).collect();
    if known.is_empty() {
        return vec!["format: none (no frames decoded)".to_string()];
    }
    known
        .iter()
        .enumerate()
        .map(|(i, format)| format!("format[{}]: {}", i, format))
        .collect()
}
