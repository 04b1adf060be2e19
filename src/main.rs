//! # Video Compress - Main Entry Point
//!
//! ## Responsibilities:
//! - Parse the command line with `clap`
//! - Initialise `tracing` logging (INFO, DEBUG with `--verbose`, or `RUST_LOG`)
//! - Merge the config file with command line overrides
//! - Check the encoder is installed, then run the compressor
//!
//! ## Example:
//! ```bash
//! vc ~/Movies holiday.mov --threads 4 --crf 28 --delete
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

use video_compress::encoder::FfmpegEncoder;
use video_compress::json_output::JsonMessage;
use video_compress::{compress_all, Config};

#[derive(Parser)]
#[command(name = "vc", version)]
#[command(about = "Compress videos with ffmpeg, safely re-runnable over the same tree")]
struct Args {
    /// Video files or directories to compress
    #[arg(value_name = "VIDEO PATH")]
    inputs: Vec<PathBuf>,

    /// Show verbose log
    #[arg(long)]
    verbose: bool,

    /// Max threads to use for compression (default: number of CPUs)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Constant rate factor, 0-51. Higher values mean smaller files but lower quality (default: 30)
    #[arg(long)]
    crf: Option<u8>,

    /// Delete input video after it was compressed successfully
    #[arg(long = "delete")]
    delete_after_success: bool,

    /// Encoder executable (default: ffmpeg)
    #[arg(long)]
    encoder: Option<PathBuf>,

    /// Append encoder commands and output to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// JSON config file (default: <config dir>/video-compress/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print start and final stats as JSON on stdout
    #[arg(long)]
    json: bool,
}

fn init_logging(verbose: bool, json: bool) -> Result<()> {
    // RUST_LOG wins over --verbose when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(true)
        .with_line_number(true);

    // keep stdout clean for the JSON lines
    if json {
        tracing::subscriber::set_global_default(builder.with_writer(std::io::stderr).finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

fn default_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("video_compress=debug,vc=debug,info")
    } else {
        EnvFilter::new("info")
    }
}

async fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) if !path.exists() => {
            return Err(anyhow::anyhow!("Config file does not exist: {}", path.display()));
        }
        Some(path) => Config::from_file(path).await?,
        None => match Config::default_file() {
            Some(path) => Config::from_file(&path).await?,
            None => Config::default(),
        },
    };

    if let Some(threads) = args.threads {
        config.max_threads = threads;
    }
    if let Some(crf) = args.crf {
        config.crf = crf;
    }
    if let Some(ref encoder) = args.encoder {
        config.encoder = encoder.clone();
    }
    if let Some(ref log_file) = args.log_file {
        config.log_path = log_file.clone();
    }
    config.delete_after_success |= args.delete_after_success;
    config.json_output |= args.json;

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.json)?;

    let result = run(&args).await;
    if let Err(ref e) = result {
        if args.json {
            JsonMessage::error(format!("{:#}", e)).emit();
        }
    }
    result
}

async fn run(args: &Args) -> Result<()> {
    let config = load_config(args).await?;
    info!("Got {} input videos", args.inputs.len());

    FfmpegEncoder::new(config.encoder.clone())
        .check_available()
        .await?;

    if config.json_output {
        JsonMessage::start(&args.inputs, &config).emit();
    }

    let json_output = config.json_output;
    let started = Instant::now();
    let stats = compress_all(config, &args.inputs).await?;
    info!("{}", stats.format_summary());

    if json_output {
        JsonMessage::complete(&stats, started.elapsed().as_secs_f64()).emit();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_filter_raises_own_crates_only() {
        let verbose = default_filter(true).to_string();
        assert!(verbose.contains("video_compress=debug"), "{verbose}");
        assert!(verbose.contains("info"), "{verbose}");

        let quiet = default_filter(false).to_string();
        assert!(!quiet.contains("debug"), "{quiet}");
    }

    #[tokio::test]
    async fn test_cli_overrides_config() {
        let args = Args::parse_from(["vc", "--config", "/nonexistent/vc.json", "a.mkv"]);
        assert!(load_config(&args).await.is_err());

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("vc.json");
        Config::default().save_to_file(&path).await.unwrap();
        let args = Args::parse_from(video_compress::os_args![
            "vc", "--config", &path, "--crf", "24", "--delete", "a.mkv"
        ]);
        let config = load_config(&args).await.unwrap();
        assert_eq!(config.crf, 24);
        assert!(config.delete_after_success);
    }
}
