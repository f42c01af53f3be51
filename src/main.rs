use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use commercial_chapters::{DEFAULT_MARKER, Ffmpeg, ProcessOptions, ToolPaths, process_target};

/// Turns commercial-break markers in a recording's .srt captions into
/// chapters inside the video.
#[derive(Parser, Debug)]
#[command(name = "commercial-chapters", version)]
struct Cli {
    /// Video file (.mp4, .mkv, .ts), or a directory with -r
    path: PathBuf,

    /// Process every video under PATH
    #[arg(short, long)]
    recursive: bool,

    /// Caption line prefix that marks a commercial break
    #[arg(long, value_name = "TOKEN", default_value = DEFAULT_MARKER)]
    marker: String,

    /// Print the chapters as JSON without modifying any file
    #[arg(long)]
    dry_run: bool,

    /// Keep the <name>_METADATA.txt file after remuxing
    #[arg(long)]
    keep_metadata: bool,

    #[arg(long, env = "FFMPEG", value_name = "PATH")]
    ffmpeg: Option<PathBuf>,

    #[arg(long, env = "FFPROBE", value_name = "PATH")]
    ffprobe: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    // Nothing is touched until both tools are known to exist.
    let tools = Ffmpeg::new(ToolPaths::resolve(cli.ffmpeg, cli.ffprobe)?);

    if cli.recursive && !cli.path.is_dir() {
        anyhow::bail!("Path must be a directory if using -r");
    }

    let options = ProcessOptions {
        marker: cli.marker,
        dry_run: cli.dry_run,
        keep_metadata: cli.keep_metadata,
    };

    let summary = process_target(&cli.path, cli.recursive, &options, &tools)?;

    if options.dry_run {
        println!("{}", serde_json::to_string_pretty(&summary.planned)?);
    }

    log::info!(
        "Done: {} tagged, {} without breaks, {} skipped, {} failed",
        summary.tagged,
        summary.no_breaks,
        summary.skipped,
        summary.failed
    );

    Ok(if summary.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
