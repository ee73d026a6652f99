//! CLI commands module.

mod decode;
mod probe;

pub use decode::DecodeCommand;
pub use probe::ProbeCommand;

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::Context;
use madstream_audio::{FrameDecoder, Session, SessionOptions, Stats};

use crate::Cli;

/// Loads session options from the config file, then applies flag overrides.
pub(crate) fn load_options(cli: &Cli) -> anyhow::Result<SessionOptions> {
    let mut options = match &cli.config {
        Some(path) => read_config(Path::new(path))?,
        None => SessionOptions::default(),
    };
    if let Some(staging) = cli.staging {
        options.staging_capacity = staging;
    }
    if let Some(batch) = cli.batch {
        options.batch_capacity = batch;
    }
    if let Some(window) = cli.window {
        options.window = window.into();
    }
    options.validate()?;
    Ok(options)
}

fn read_config(path: &Path) -> anyhow::Result<SessionOptions> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let options = serde_yaml::from_str(&content)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(options)
}

/// Opens the input file, or stdin for `None` and `-`.
pub(crate) fn open_input(path: Option<&str>) -> anyhow::Result<Box<dyn Read + Send>> {
    match path {
        None | Some("-") => Ok(Box::new(io::stdin())),
        Some(path) => {
            let file = File::open(path).with_context(|| format!("failed to open {}", path))?;
            Ok(Box::new(BufReader::new(file)))
        }
    }
}

/// Creates the output file, or stdout for `None` and `-`.
pub(crate) fn open_output(path: Option<&str>) -> anyhow::Result<Box<dyn Write + Send>> {
    match path {
        None | Some("-") => Ok(Box::new(BufWriter::new(io::stdout()))),
        Some(path) => {
            let file = File::create(path).with_context(|| format!("failed to create {}", path))?;
            Ok(Box::new(BufWriter::new(file)))
        }
    }
}

/// Feeds `input` to `session` in `chunk`-sized pushes, then finishes.
pub(crate) fn push_all<D: FrameDecoder>(
    session: &mut Session<D>,
    input: &mut dyn Read,
    chunk: usize,
) -> anyhow::Result<u64> {
    let mut buf = vec![0u8; chunk.max(1)];
    let mut total = 0u64;
    loop {
        let n = match input.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).context("failed to read input"),
        };
        session.push(&buf[..n]);
        total += n as u64;
    }
    session.finish();
    Ok(total)
}

pub(crate) fn print_verbose(cli: &Cli, message: &str) {
    if cli.verbose {
        eprintln!("[verbose] {}", message);
    }
}

pub(crate) fn print_stats(stats: &Stats) {
    eprintln!(
        "frames: {}, samples: {}, batches: {}, failures: {}, discarded: {} bytes, resets: {}",
        stats.frames, stats.samples, stats.batches, stats.failures, stats.discarded, stats.resets
    );
}
