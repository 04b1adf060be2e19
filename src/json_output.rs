//! # JSON Output Module
//!
//! Structured messages on stdout for callers driving `vc` from another
//! program. Logs stay on the tracing subscriber; only these lines are JSON.
//!
//! ## Message types:
//! - `start`: run configuration and roots
//! - `complete`: final counters and bytes saved
//! - `error`: the run could not start or finish

use crate::{config::Config, stats::StatsSnapshot};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// JSON message, tagged by `type`
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JsonMessage {
    Start {
        inputs: Vec<PathBuf>,
        config: JsonConfig,
    },

    Complete {
        success: usize,
        failure: usize,
        skip: usize,
        bytes_saved: u64,
        reduction_percent: f64,
        duration_seconds: f64,
    },

    Error {
        message: String,
    },
}

/// Subset of the config worth reporting
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonConfig {
    pub max_threads: usize,
    pub crf: u8,
    pub delete_after_success: bool,
}

impl From<&Config> for JsonConfig {
    fn from(config: &Config) -> Self {
        Self {
            max_threads: config.max_threads,
            crf: config.crf,
            delete_after_success: config.delete_after_success,
        }
    }
}

impl JsonMessage {
    /// Emit the message as one line on stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    pub fn start(inputs: &[PathBuf], config: &Config) -> Self {
        Self::Start {
            inputs: inputs.to_vec(),
            config: config.into(),
        }
    }

    pub fn complete(stats: &StatsSnapshot, duration_seconds: f64) -> Self {
        Self::Complete {
            success: stats.success,
            failure: stats.failure,
            skip: stats.skip,
            bytes_saved: stats.bytes_saved(),
            reduction_percent: crate::file_manager::FileManager::calculate_reduction(
                stats.bytes_in,
                stats.bytes_out,
            ),
            duration_seconds,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}
