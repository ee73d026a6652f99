//! madstream CLI - decode MP3 streams through a push or pull session.

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use madstream_audio::DecodeWindow;

mod commands;

use commands::{DecodeCommand, ProbeCommand};

/// madstream CLI - decode MP3 streams through a frame-synchronizing session.
///
/// Input bytes are fed to the session in fixed-size pushes (or pulled from
/// the input with --pull), exactly as a network or device stream would
/// deliver them. Session settings come from an optional YAML config file,
/// overridden by the flags below.
#[derive(Parser)]
#[command(name = "madstream")]
#[command(about = "Streaming MP3 frame decoder")]
#[command(version)]
pub struct Cli {
    /// Session config file (YAML)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Staging buffer capacity in bytes
    #[arg(long, global = true)]
    pub staging: Option<usize>,

    /// Maximum samples per output batch
    #[arg(long, global = true)]
    pub batch: Option<usize>,

    /// Bytes submitted to the decoder per frame
    #[arg(long, global = true, value_enum)]
    pub window: Option<WindowArg>,

    /// Bytes per push
    #[arg(long, global = true, default_value_t = 4096)]
    pub chunk: usize,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode MP3 to raw s16le PCM
    Decode(DecodeCommand),
    /// Report stream formats and decode statistics
    Probe(ProbeCommand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WindowArg {
    /// From the frame marker to the end of buffered data
    Tail,
    /// From the frame marker to the next marker
    Frame,
}

impl From<WindowArg> for DecodeWindow {
    fn from(arg: WindowArg) -> Self {
        match arg {
            WindowArg::Tail => DecodeWindow::Tail,
            WindowArg::Frame => DecodeWindow::Frame,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging; stdout may carry PCM.
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Decode(cmd) => cmd.run(&cli),
        Commands::Probe(cmd) => cmd.run(&cli),
    }
}
