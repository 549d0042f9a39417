use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use fasttrack::{Detector, DetectorConfig, TraceFormat, TraceReader};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// FastTrack race detector
/// Replays recorded per-thread event traces and reports data races
#[derive(Parser)]
#[command(name = "fasttrack", version)]
#[command(about = "FastTrack dynamic data-race detector", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv per-event debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a trace file through a fresh detector
    Replay {
        /// Trace file
        file: PathBuf,

        /// Trace encoding (guessed from the extension when omitted)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Detector configuration (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Log statistics every N operations
        #[arg(long)]
        stats_interval: Option<u64>,

        /// Print threads, variables and locks after the replay
        #[arg(long)]
        report: bool,

        /// Print the final detector state as JSON
        #[arg(long)]
        snapshot_json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Jsonl,
}

impl From<FormatArg> for TraceFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => TraceFormat::Text,
            FormatArg::Jsonl => TraceFormat::JsonLines,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = run(cli);
    if let Err(err) = &outcome {
        eprintln!("error: {err:#}");
    }
    ExitCode::from(exit_status(&outcome))
}

/// 0 clean, 1 races found, 2 fatal error
fn exit_status(outcome: &Result<u64>) -> u8 {
    match outcome {
        Ok(0) => 0,
        Ok(_) => 1,
        Err(_) => 2,
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Returns the number of races found
fn run(cli: Cli) -> Result<u64> {
    match cli.command {
        Commands::Replay {
            file,
            format,
            config,
            stats_interval,
            report,
            snapshot_json,
        } => {
            let mut config = match config {
                Some(path) => DetectorConfig::from_json_file(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => DetectorConfig::default(),
            };
            if stats_interval.is_some() {
                config.stats_interval = stats_interval.filter(|&n| n > 0);
            }
            if cli.verbose >= 2 {
                config.log_events = true;
            }
            // races are printed below
            config.log_races = false;
            config.race_log_limit = Some(0);

            let format = format.map_or_else(|| TraceFormat::from_path(&file), TraceFormat::from);
            replay_file(&file, format, config, report, snapshot_json)
        }
    }
}

fn replay_file(
    file: &Path,
    format: TraceFormat,
    config: DetectorConfig,
    report: bool,
    snapshot_json: bool,
) -> Result<u64> {
    info!("Replaying {} ({:?})", file.display(), format);

    let reader = TraceReader::open(file, format)
        .with_context(|| format!("opening trace {}", file.display()))?;
    let mut detector = Detector::with_config(config);

    for (index, event) in reader.enumerate() {
        let event = event.with_context(|| format!("parsing {}", file.display()))?;
        let races = event
            .apply(&mut detector)
            .with_context(|| format!("event {index} ({event}) rejected"))?;
        for race in races {
            debug!(event = index, kind = %race.kind, "data race");
            println!("{race}");
        }
    }

    let stats = detector.stats();
    info!("{}", stats);

    if report {
        print!("{}", detector.report());
    }
    if snapshot_json {
        println!("{}", detector.snapshot().to_json()?);
    }

    if stats.races > 0 {
        eprintln!("{} data race(s) found", stats.races);
    }
    Ok(stats.races)
}
