//! # Video Compressor Orchestrator
//!
//! Owns the worker pool, the encoder log and the counters for one run.
//!
//! ## Lifecycle:
//! 1. `new()` validates the config, opens the log and sizes the pool
//! 2. `run()` walks every root and dispatches each regular file
//! 3. `finish()` waits for every dispatched job and reports the stats
//!
//! ## Concurrency:
//! - A semaphore with `max_threads` permits bounds concurrent jobs
//! - Dispatch waits for a free permit before spawning, so jobs start in
//!   submission order and the walk advances in step with job completion:
//!   while the pool is full, no further directory entries are read
//! - Each output path is claimed by the first input mapping to it; later
//!   siblings (`a.mov` after `a.mkv`) are skipped without being spawned
//! - The log is shared through `Arc` and closes when the last job is done
//!
//! ## Example:
//! ```rust,no_run
//! use video_compress::{Config, VideoCompressor};
//! use std::path::PathBuf;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let mut compressor = VideoCompressor::new(Config::default())?;
//! compressor.run(&[PathBuf::from("/videos")]).await?;
//! let stats = compressor.finish().await?;
//! println!("{}", stats);
//! # Ok(())
//! # }
//! ```

use crate::{
    compressor::classifier::Classifier,
    compressor::task::{CompressTask, Outcome},
    config::Config,
    encode_log::EncodeLog,
    encoder::{Encoder, FfmpegEncoder},
    error::SkipReason,
    stats::{StatsCounter, StatsSnapshot},
};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

/// Batch compressor over a set of files and directories
pub struct VideoCompressor<E = FfmpegEncoder> {
    config: Config,
    task: CompressTask<E>,
    semaphore: Arc<Semaphore>,
    tasks: Vec<JoinHandle<Outcome>>,
    dispatched: HashSet<PathBuf>,
    claimed_outputs: HashSet<PathBuf>,
}

impl VideoCompressor<FfmpegEncoder> {
    /// Create a compressor driving the encoder named in the config
    pub fn new(config: Config) -> Result<Self> {
        let encoder = FfmpegEncoder::new(config.encoder.clone());
        Self::with_encoder(config, Arc::new(encoder))
    }
}

impl<E: Encoder> VideoCompressor<E> {
    pub fn with_encoder(config: Config, encoder: Arc<E>) -> Result<Self> {
        config.validate()?;

        let log = EncodeLog::open(&config.log_path)
            .with_context(|| format!("Failed to open encoder log {}", config.log_path.display()))?;

        info!("Start compressing...");
        debug!(
            "threads: {}, crf: {}, delete after success: {}, log: {}",
            config.max_threads,
            config.crf,
            config.delete_after_success,
            log.path().display()
        );

        let task = CompressTask {
            encoder,
            log: Arc::new(log),
            stats: Arc::new(StatsCounter::new()),
            crf: config.crf,
            delete_after_success: config.delete_after_success,
        };

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(config.max_threads)),
            config,
            task,
            tasks: Vec::new(),
            dispatched: HashSet::new(),
            claimed_outputs: HashSet::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Live counters, readable while jobs are still running
    pub fn stats(&self) -> Arc<StatsCounter> {
        self.task.stats.clone()
    }

    /// Number of distinct files dispatched so far
    pub fn dispatched(&self) -> usize {
        self.dispatched.len()
    }

    /// Dispatch every input, in order
    pub async fn run(&mut self, inputs: &[PathBuf]) -> Result<()> {
        for input in inputs {
            self.iter(input).await?;
        }
        Ok(())
    }

    /// Dispatch a file, or every regular file below a directory
    pub async fn iter(&mut self, file_or_dir: &Path) -> Result<()> {
        if file_or_dir.is_file() {
            return self.dispatch(file_or_dir.to_path_buf()).await;
        }

        if !file_or_dir.is_dir() {
            warn!("{} is neither a file nor a directory, ignoring", file_or_dir.display());
            return Ok(());
        }

        // sorting reads each directory in full when it is opened, so outputs
        // written by running jobs do not show up later in the same walk
        for entry in WalkDir::new(file_or_dir).sort_by_file_name() {
            match entry {
                Ok(entry) if entry.file_type().is_file() => {
                    self.dispatch(entry.into_path()).await?;
                }
                Ok(_) => {}
                Err(e) => warn!("Failed to walk {}: {}", file_or_dir.display(), e),
            }
        }

        Ok(())
    }

    async fn dispatch(&mut self, file_path: PathBuf) -> Result<()> {
        let key = file_path
            .canonicalize()
            .unwrap_or_else(|_| file_path.clone());
        if !self.dispatched.insert(key) {
            debug!("{} already dispatched", file_path.display());
            return Ok(());
        }

        if let Ok(job) = Classifier::classify(&file_path) {
            if !self.claimed_outputs.insert(output_key(&job.output)) {
                warn!(
                    "{} is already produced by another input, skipping {}...",
                    job.output.display(),
                    file_path.display()
                );
                Outcome::Skipped(SkipReason::OutputExists).record(&self.task.stats);
                return Ok(());
            }
        }

        let permit = self.semaphore.clone().acquire_owned().await?;
        let task = self.task.clone();

        self.tasks.push(tokio::spawn(async move {
            let _permit = permit;
            task.run(file_path).await
        }));

        Ok(())
    }

    /// Wait for every dispatched job, release the log and report the stats
    pub async fn finish(self) -> Result<StatsSnapshot> {
        let stats = self.task.stats.clone();

        for task in self.tasks {
            if let Err(e) = task.await {
                error!("Compress task did not complete: {}", e);
                stats.inc_failure();
            }
        }
        drop(self.task);

        let snapshot = stats.snapshot();
        info!("Compress done, stats:[{}]", snapshot);
        Ok(snapshot)
    }
}

/// The output does not exist yet, so only its directory can be canonicalized
fn output_key(output: &Path) -> PathBuf {
    let dir = match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    match (dir.canonicalize(), output.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => output.to_path_buf(),
    }
}

/// Compress every input with the encoder named in `config`, start to finish
pub async fn compress_all(config: Config, inputs: &[PathBuf]) -> Result<StatsSnapshot> {
    let mut compressor = VideoCompressor::new(config)?;
    compressor.run(inputs).await?;
    compressor.finish().await
}
