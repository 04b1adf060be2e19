//! # Configuration Management Module
//!
//! Holds every knob of a compression run.
//!
//! ## Parameters:
//! - `max_threads`: concurrent encoder processes (default: available parallelism)
//! - `crf`: constant rate factor passed to the encoder (0-51, default: 30)
//! - `delete_after_success`: remove the source once its compressed copy is committed
//! - `encoder`: encoder program (default: `ffmpeg`)
//! - `log_path`: append-only log receiving every command and its output
//! - `json_output`: print the final stats as JSON
//!
//! ## Example:
//! ```rust
//! use video_compress::Config;
//!
//! let config = Config {
//!     max_threads: 2,
//!     crf: 28,
//!     ..Default::default()
//! };
//! config.validate().unwrap();
//! ```

use crate::error::CompressError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default constant rate factor
pub const DEFAULT_CRF: u8 = 30;

/// Name of the encoder log inside the system temp directory
pub const ENCODE_LOG_NAME: &str = "video-compress-ffmpeg.log";

/// Configuration for a compression run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of concurrent encodes
    pub max_threads: usize,
    /// Constant rate factor (0-51, lower = better quality, larger file)
    pub crf: u8,
    /// Delete the input once the compressed output is committed
    pub delete_after_success: bool,
    /// Encoder program, looked up in PATH when not absolute
    pub encoder: PathBuf,
    /// Append-only encoder log
    pub log_path: PathBuf,
    /// Output final stats as JSON for programmatic use
    pub json_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_threads: default_threads(),
            crf: DEFAULT_CRF,
            delete_after_success: false,
            encoder: PathBuf::from(if cfg!(windows) { "ffmpeg.exe" } else { "ffmpeg" }),
            log_path: std::env::temp_dir().join(ENCODE_LOG_NAME),
            json_output: false,
        }
    }
}

fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.max_threads == 0 {
            return Err(CompressError::Config("Number of threads must be greater than 0".into()).into());
        }

        if self.crf > 51 {
            return Err(CompressError::Config("CRF must be between 0 and 51".into()).into());
        }

        if self.encoder.as_os_str().is_empty() {
            return Err(CompressError::Config("Encoder program must not be empty".into()).into());
        }

        Ok(())
    }

    /// Default location of the config file, if the platform has a config dir
    pub fn default_file() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("video-compress").join("config.json"))
    }

    /// Load configuration from file
    pub async fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}
