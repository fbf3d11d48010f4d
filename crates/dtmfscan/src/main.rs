use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use dtmfscan_decode::{Decoder, DecoderConfig};
use dtmfscan_synth::{synthesize, SynthConfig};

mod batch;
mod loader;
mod logging;
mod recording;

#[derive(Parser, Debug)]
#[command(name = "dtmfscan", about = "Decode DTMF digits from audio recordings")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level for stderr output; RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "warn", value_parser = logging::parse_log_level)]
    log_level: tracing::Level,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode the dialed digits in each file and print `<path>: <digits>`.
    Decode {
        /// WAV or Ogg/Opus files.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// TOML file overriding decoder settings.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Worker threads; defaults to the available parallelism.
        #[arg(long)]
        jobs: Option<usize>,
    },
    /// Render a dial string as audio. Digits 0-9, `,` for a pause.
    Synth {
        digits: String,

        /// Output file; `.wav`, `.ogg` or `.opus`.
        #[arg(short, long)]
        output: PathBuf,

        #[arg(long, default_value_t = 8000)]
        sample_rate: u32,

        #[arg(long, default_value_t = 100)]
        tone_ms: u32,

        #[arg(long, default_value_t = 50)]
        gap_ms: u32,

        /// Peak amplitude of each tone.
        #[arg(long, default_value_t = 0.25)]
        level: f32,

        /// Standard deviation of added noise.
        #[arg(long, default_value_t = 0.0)]
        noise: f32,
    },
    /// Print the effective decoder configuration as TOML.
    Config {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_level);

    match cli.command {
        Command::Decode {
            files,
            config,
            jobs,
        } => {
            let decoder = Decoder::new(load_config(config.as_deref())?)
                .context("invalid decoder configuration")?;
            let jobs = jobs.unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            });
            let reports = batch::decode_files(&decoder, &files, jobs)
                .context("starting decode workers")?;
            for report in reports {
                println!("{}", report.line());
            }
        }
        Command::Synth {
            digits,
            output,
            sample_rate,
            tone_ms,
            gap_ms,
            level,
            noise,
        } => {
            let config = SynthConfig {
                sample_rate_hz: sample_rate,
                tone_secs: tone_ms as f32 / 1000.0,
                gap_secs: gap_ms as f32 / 1000.0,
                level,
                noise_level: noise,
                ..SynthConfig::default()
            };
            let samples = synthesize(&digits, &config)?;
            loader::save_waveform(&output, sample_rate, &samples)
                .with_context(|| format!("writing {}", output.display()))?;
            tracing::info!(path = %output.display(), samples = samples.len(), "wrote dial tones");
        }
        Command::Config { config } => {
            let config = load_config(config.as_deref())?;
            print!("{}", config.to_toml_string()?);
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<DecoderConfig> {
    let Some(path) = path else {
        return Ok(DecoderConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    DecoderConfig::from_toml_str(&text).with_context(|| format!("parsing config {}", path.display()))
}
