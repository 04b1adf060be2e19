//! # Video Compress Library
//!
//! Batch video compression: walk files and directories, re-encode every
//! video with ffmpeg on a bounded worker pool, and count what happened.
//!
//! ## Modules:
//! - `config`: run configuration and validation
//! - `error`: skip reasons and compression errors
//! - `file_manager`: video detection, sizes, atomic commit
//! - `encode_log`: append-only log shared by all encoder processes
//! - `encoder`: the external encoder invocation
//! - `stats`: thread-safe success/failure/skip counters
//! - `compressor`: classifier, per-file task and orchestrator
//! - `json_output`: machine-readable run messages
//!
//! ## Usage:
//! ```rust,no_run
//! use video_compress::{compress_all, Config};
//! use std::path::PathBuf;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let stats = compress_all(Config::default(), &[PathBuf::from("/videos")]).await?;
//! println!("{}", stats);
//! # Ok(())
//! # }
//! ```

pub mod compressor;
pub mod config;
pub mod encode_log;
pub mod encoder;
pub mod error;
pub mod file_manager;
pub mod json_output;
pub mod stats;
pub mod utils;

pub use compressor::{compress_all, Classifier, VideoCompressor};
pub use config::Config;
pub use error::{CompressError, SkipReason};
pub use stats::{StatsCounter, StatsSnapshot};
