use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::broadcast::error::TryRecvError;

use soundlens::analysis::classifier::Classification;
use soundlens::config::AppConfig;
use soundlens::engine::EngineHandle;

#[derive(Parser, Debug)]
#[command(
    name = "soundlens_cli",
    about = "Acoustic analysis and sound identification console"
)]
struct Cli {
    /// Override path to the JSON config file (defaults to assets/soundlens_config.json)
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Capture live audio for a fixed duration and identify the sound
    Listen {
        #[arg(long, default_value_t = 5.0)]
        seconds: f64,
        /// Suppress per-tick readouts
        #[arg(long)]
        quiet: bool,
    },
    /// Run one analysis session over a WAV file
    Analyze {
        file: PathBuf,
        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the active band table
    Bands {
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = match cli.config {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::load(),
    };
    let engine = EngineHandle::with_config(config);

    match cli.command {
        Commands::Listen { seconds, quiet } => run_listen(&engine, seconds, quiet),
        Commands::Analyze { file, json } => run_analyze(&engine, &file, json),
        Commands::Bands { json } => run_bands(&engine, json),
    }
}

fn run_listen(engine: &EngineHandle, seconds: f64, quiet: bool) -> Result<ExitCode> {
    engine.start_live().context("starting live capture")?;
    let mut readouts = engine
        .subscribe_readouts()
        .context("readout channel not initialized")?;

    println!("Listening for {seconds:.1}s...");
    let deadline = Instant::now() + Duration::from_secs_f64(seconds);

    while Instant::now() < deadline {
        match readouts.try_recv() {
            Ok(readout) => {
                if !quiet {
                    println!(
                        "{:>6} Hz  {:>5.1}%  {:>6} dB  {:>6.2}s",
                        readout.frequency_hz,
                        readout.magnitude_percent,
                        readout.decibels.to_string(),
                        readout.elapsed_seconds
                    );
                }
            }
            Err(TryRecvError::Empty) => std::thread::sleep(Duration::from_millis(10)),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::debug!("readout subscriber lagged by {skipped}")
            }
            Err(TryRecvError::Closed) => break,
        }
    }

    let classification = engine.stop_live().context("stopping live capture")?;
    print_classification(&classification);
    Ok(ExitCode::from(0))
}

fn run_analyze(engine: &EngineHandle, file: &PathBuf, json: bool) -> Result<ExitCode> {
    let classification = engine
        .analyze_file(file)
        .with_context(|| format!("analyzing {}", file.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&classification)?);
    } else {
        print_classification(&classification);
    }
    Ok(ExitCode::from(0))
}

fn run_bands(engine: &EngineHandle, json: bool) -> Result<ExitCode> {
    let table = engine.band_table();

    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(ExitCode::from(0));
    }

    for band in table {
        println!(
            "{:>5}-{:<5} Hz  [{}] {} - {}",
            band.freq_range[0], band.freq_range[1], band.category, band.label, band.description
        );
    }
    Ok(ExitCode::from(0))
}

fn print_classification(classification: &Classification) {
    println!();
    println!("[{}]", classification.category.to_uppercase());
    println!("{}", classification.label);
    println!("{}", classification.description);
    println!("confidence: {:.1}%", classification.confidence_percent);
}
