//! Decode command.

use clap::Args;
use madstream_audio::{AudioFormat, Mp3FrameDecoder, Session};

use super::{load_options, open_input, open_output, print_stats, print_verbose, push_all};
use crate::Cli;

/// Decode MP3 to raw interleaved s16le PCM.
#[derive(Args)]
pub struct DecodeCommand {
    /// Input MP3 file (default: stdin)
    input: Option<String>,

    /// Output PCM file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<String>,

    /// Pull from the input through the session instead of pushing chunks
    #[arg(long)]
    pull: bool,
}

impl DecodeCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let options = load_options(cli)?;
        print_verbose(cli, &format!("Options: {:?}", options));

        let mut session = Session::new(Mp3FrameDecoder::new(), options)?;
        session.on_format(|format: &AudioFormat| eprintln!("format: {}", format));
        session.set_sink(open_output(self.output.as_deref())?);
        session.start();

        let mut input = open_input(self.input.as_deref())?;
        let read = if self.pull {
            session.set_source(input);
            session.run()?
        } else {
            push_all(&mut session, &mut input, cli.chunk)?
        };

        tracing::debug!("decode: read {} bytes", read);
        print_verbose(cli, &format!("Read {} bytes", read));
        let stats = session.stats();
        session.stop();
        print_stats(&stats);
        Ok(())
    }
}
