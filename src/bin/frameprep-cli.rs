use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use frameprep::{
    DecoderLogLevel, FrameStore, SampleOptions, VideoSource, ordered_frames,
    prepare_frames, prepare_frames_with_progress, set_decoder_log_level,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  frameprep prepare 'https://example.com/watch?v=abc123' abc123.mp4 --interval-ms 1000 --progress\n  frameprep list data/images/abc123_1000\n  frameprep probe abc123.mp4 --json\n  frameprep completions zsh > _frameprep";

#[derive(Debug, Parser)]
#[command(
    name = "frameprep",
    version,
    about = "Prepare evenly time-spaced, letterboxed video frames",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// FFmpeg log level (quiet, error, warning, info, debug).
    #[arg(long, global = true)]
    decoder_log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sample frames into the store, reusing a cached directory if present.
    #[command(
        about = "Prepare letterboxed frames for a video",
        after_help = "Examples:\n  frameprep prepare 'https://example.com/watch?v=abc123' abc123.mp4 --interval-ms 1000\n  frameprep prepare 'x?v=abc' abc.mp4 --interval-ms 2000 --category n01440764 --progress"
    )]
    Prepare {
        /// Locator string containing the video identity (`...v=<token>`).
        url: String,
        /// Path to the downloaded video file.
        video: PathBuf,
        /// Milliseconds between captured frames.
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
        /// Number of initial capture slots to skip.
        #[arg(long, default_value_t = 1)]
        skip: u64,
        /// Maximum number of frames to produce.
        #[arg(long, default_value_t = 100)]
        max_frames: u64,
        /// Side length of the square output canvas in pixels.
        #[arg(long, default_value_t = 256)]
        canvas: u32,
        /// Optional dataset category routing the output directory.
        #[arg(long)]
        category: Option<String>,
        /// Store root directory.
        #[arg(long, default_value = "data")]
        root: PathBuf,
        /// Show a progress bar while sampling.
        #[arg(long)]
        progress: bool,
    },

    /// Print the frame files of a directory in numeric offset order.
    #[command(
        about = "List a frame directory in offset order",
        visible_alias = "ls"
    )]
    List {
        /// A frame directory produced by `prepare`.
        directory: PathBuf,
    },

    /// Print properties of a video file (alias: info).
    #[command(about = "Print video stream properties", visible_alias = "info")]
    Probe {
        /// Input video path.
        input: PathBuf,

        /// Output properties as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_decoder_log_level(value: &str) -> Option<DecoderLogLevel> {
    match value.to_ascii_lowercase().as_str() {
        "quiet" => Some(DecoderLogLevel::Quiet),
        "error" => Some(DecoderLogLevel::Error),
        "warning" | "warn" => Some(DecoderLogLevel::Warning),
        "info" => Some(DecoderLogLevel::Info),
        "debug" => Some(DecoderLogLevel::Debug),
        _ => None,
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(level) = &cli.decoder_log_level {
        let parsed = parse_decoder_log_level(level)
            .ok_or(format!("unsupported --decoder-log-level: {level}"))?;
        set_decoder_log_level(parsed);
    }

    match cli.command {
        Commands::Prepare {
            url,
            video,
            interval_ms,
            skip,
            max_frames,
            canvas,
            category,
            root,
            progress,
        } => {
            let store = FrameStore::new(root);
            let options = SampleOptions::new(interval_ms)
                .with_skip_count(skip)
                .with_max_frames(max_frames)
                .with_canvas_size(canvas);

            let directory = if progress {
                let progress_bar = ProgressBar::no_length();
                let style = ProgressStyle::with_template(
                    "{spinner:.green} {bar:40.cyan/blue} {pos}/{len} frames",
                )?;
                progress_bar.set_style(style.progress_chars("##-"));

                let directory = prepare_frames_with_progress(
                    &store,
                    &url,
                    &video,
                    category.as_deref(),
                    &options,
                    |produced, planned| {
                        progress_bar.set_length(planned as u64);
                        progress_bar.set_position(produced as u64);
                    },
                )?;
                progress_bar.finish_and_clear();
                directory
            } else {
                prepare_frames(&store, &url, &video, category.as_deref(), &options)?
            };

            println!(
                "{} {}",
                "prepared".green().bold(),
                directory.display(),
            );
        }
        Commands::List { directory } => {
            for frame in ordered_frames(&directory)? {
                println!("{}", frame.display());
            }
        }
        Commands::Probe { input, json } => {
            let info = VideoSource::probe(&input)?;
            if json {
                let payload = json!({
                    "width": info.width,
                    "height": info.height,
                    "fps": info.frames_per_second,
                    "frame_count": info.frame_count,
                    "duration_seconds": info.duration.as_secs_f64(),
                    "codec": info.codec,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!(
                    "Video: {}x{} @ {:.2} fps [{}]",
                    info.width, info.height, info.frames_per_second, info.codec,
                );
                println!("Frames: ~{}", info.frame_count);
                println!("Duration: {:.2}s", info.duration.as_secs_f64());
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
