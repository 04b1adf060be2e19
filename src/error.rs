//! # Error Types Module
//!
//! Error types shared by the classifier, the encoder invocation and the
//! per-file pipeline.
//!
//! ## Categories:
//! - `SkipReason`: why a discovered file is not compressed (never an error)
//! - `CompressError`: why an eligible file could not be compressed
//!
//! Per-file errors are always contained in the job that produced them: they
//! are logged and counted, never propagated to the orchestrator.
//!
//! ## Example:
//! ```rust
//! use video_compress::error::CompressError;
//!
//! let err = CompressError::MissingDependency("ffmpeg".to_string());
//! assert_eq!(err.to_string(), "Dependency missing: ffmpeg");
//! ```

use std::path::PathBuf;
use std::process::ExitStatus;

/// Why the classifier rejected a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// File name carries the compressed-output marker
    AlreadyCompressed,
    /// Extension is not in the video allow-list
    NotVideo,
    /// The derived output file is already on disk
    OutputExists,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::AlreadyCompressed => "already compressed",
            Self::NotVideo => "not a video",
            Self::OutputExists => "output already exists",
        };
        f.write_str(text)
    }
}

/// Custom error types for video compression
#[derive(thiserror::Error, Debug)]
pub enum CompressError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encoder exited with {0}")]
    EncoderExit(ExitStatus),

    #[error("Failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to commit {from} -> {to}: {source}")]
    Commit {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Dependency missing: {0}")]
    MissingDependency(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
