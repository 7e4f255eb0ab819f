//! mailcorrupt - find Emerald mail corruption frames.

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::io;
use std::path::PathBuf;

use mailcorrupt::easy_chat::EasyChatCatalogue;
use mailcorrupt::format::{computed_message, format_corruptions, frame_report};
use mailcorrupt::output::{write_frame_report, write_output, OutputFormat};
use mailcorrupt::search::{search, SearchOptions, SearchParameters, WorkerCount};
use mailcorrupt::FrameEvaluator;

#[derive(Parser)]
#[command(name = "mailcorrupt")]
#[command(about = "Find RNG frames for the Emerald mail corruption setup")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Search a frame range for checksum-preserving corruptions
    Search {
        /// First RNG frame (inclusive)
        #[arg(long)]
        min: Option<u32>,

        /// Last RNG frame (inclusive)
        #[arg(long)]
        max: Option<u32>,

        /// Trainer ID
        #[arg(long)]
        tid: Option<u16>,

        /// Worker threads (default: 3/4 of logical cores)
        #[arg(long)]
        threads: Option<usize>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Show the full derivation of one frame
    Frame {
        /// RNG frame
        #[arg(long)]
        frame: u32,

        /// Trainer ID
        #[arg(long)]
        tid: u16,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Measure frame evaluation throughput
    Bench {
        /// Frames to evaluate
        #[arg(long, default_value_t = 1 << 24)]
        frames: u32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: logging disabled ({})", e);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Search {
            min,
            max,
            tid,
            threads,
            format,
            output,
            no_progress,
        } => {
            let options = SearchOptions {
                workers: threads.map_or(WorkerCount::Auto, WorkerCount::Fixed),
                show_progress: !no_progress,
            };
            run_search(min, max, tid, options, format, output)
        }

        Command::Frame { frame, tid, json } => run_frame(frame, tid, json),

        Command::Bench { frames, json } => mailcorrupt::benchmark::run_benchmark(frames, json),
    }
}

fn run_search(
    min: Option<u32>,
    max: Option<u32>,
    tid: Option<u16>,
    options: SearchOptions,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let params = SearchParameters::collect(min, max, tid)?;

    eprintln!(
        "Searching frames {}..={} for trainer ID {} ({} frames)...",
        params.rng_frame_min(),
        params.rng_frame_max(),
        params.trainer_id(),
        params.frame_count()
    );

    let report = search(&params, &options)?;

    if let Some(msg) = report.empty_message() {
        eprintln!("{}", msg);
        return Ok(());
    }

    let rows = format_corruptions(EasyChatCatalogue::emerald(), report.candidates);
    write_output(&format.render(&rows)?, output.as_deref())?;

    eprintln!(
        "{} ({} workers, {:.2}s)",
        computed_message(rows.len()),
        report.workers,
        report.elapsed.as_secs_f64()
    );

    Ok(())
}

fn run_frame(frame: u32, tid: u16, json: bool) -> Result<()> {
    let details = FrameEvaluator::new(tid).inspect(frame);
    let report = frame_report(EasyChatCatalogue::emerald(), &details);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        write_frame_report(&mut io::stdout().lock(), &report)?;
    }

    Ok(())
}
