//! # Compress Task Module
//!
//! Worker for a single file: classify, encode, commit, account.
//! Every error stays inside the task; the returned [`Outcome`] and the shared
//! counters are the only things the orchestrator sees.

use crate::{
    compressor::classifier::{Classifier, CompressionJob},
    encode_log::EncodeLog,
    encoder::Encoder,
    error::{CompressError, SkipReason},
    file_manager::FileManager,
    stats::StatsCounter,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Terminal state of one job
#[derive(Debug)]
pub enum Outcome {
    /// Output committed and not larger than the input
    Compressed {
        input_size: u64,
        output_size: u64,
        deleted_input: bool,
    },
    /// Output came out larger; the original now sits at the output path
    Reverted { input_size: u64, output_size: u64 },
    Skipped(SkipReason),
    Failed(CompressError),
}

impl Outcome {
    /// Record this outcome in the counters
    pub fn record(&self, stats: &StatsCounter) {
        match self {
            Self::Compressed {
                input_size,
                output_size,
                ..
            } => stats.add_success(*input_size, *output_size),
            Self::Reverted { .. } | Self::Skipped(_) => stats.inc_skip(),
            Self::Failed(_) => stats.inc_failure(),
        }
    }
}

/// Everything a worker needs, cheap to clone into each spawned task
pub struct CompressTask<E> {
    pub encoder: Arc<E>,
    pub log: Arc<EncodeLog>,
    pub stats: Arc<StatsCounter>,
    pub crf: u8,
    pub delete_after_success: bool,
}

impl<E> Clone for CompressTask<E> {
    fn clone(&self) -> Self {
        Self {
            encoder: self.encoder.clone(),
            log: self.log.clone(),
            stats: self.stats.clone(),
            crf: self.crf,
            delete_after_success: self.delete_after_success,
        }
    }
}

impl<E: Encoder> CompressTask<E> {
    /// Process one file and record the result in the shared counters
    pub async fn run(&self, input: PathBuf) -> Outcome {
        let outcome = self.process(input).await;
        outcome.record(&self.stats);
        outcome
    }

    async fn process(&self, input: PathBuf) -> Outcome {
        let job = match Classifier::classify(&input) {
            Ok(job) => job,
            Err(reason) => {
                match reason {
                    SkipReason::OutputExists => warn!(
                        "{} already exists, skipping...",
                        CompressionJob::new(input.clone()).output.display()
                    ),
                    _ => warn!("{} is {}, skipping...", input.display(), reason),
                }
                return Outcome::Skipped(reason);
            }
        };

        match self.compress(&job).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("{} compress failed: {}", job.input.display(), e);
                Outcome::Failed(e)
            }
        }
    }

    async fn compress(&self, job: &CompressionJob) -> Result<Outcome, CompressError> {
        remove_stale_partial(&job.temp_output).await;

        info!("Compressing {} to {}...", job.input.display(), job.output.display());
        self.encoder
            .encode(&job.input, &job.temp_output, self.crf, &self.log)
            .await?;

        // a sibling such as `a.mov` for `a.mkv` may have committed first
        if job.output.exists() {
            warn!(
                "{} appeared while encoding {}, discarding this encode",
                job.output.display(),
                job.input.display()
            );
            if let Err(e) = tokio::fs::remove_file(&job.temp_output).await {
                debug!("Could not remove {}: {}", job.temp_output.display(), e);
            }
            return Ok(Outcome::Skipped(SkipReason::OutputExists));
        }

        FileManager::commit(&job.temp_output, &job.output).await?;

        let input_size = FileManager::file_size(&job.input).await?;
        let output_size = FileManager::file_size(&job.output).await?;

        if output_size > input_size {
            warn!(
                "{} grew from {} to {}, keeping the original as {}",
                job.input.display(),
                FileManager::format_size(input_size),
                FileManager::format_size(output_size),
                job.output.display()
            );
            FileManager::commit(&job.input, &job.output).await?;
            return Ok(Outcome::Reverted {
                input_size,
                output_size,
            });
        }

        info!(
            "{} size raw:{}, compressed:{}, compress rate:{:.2}%",
            job.input.display(),
            FileManager::format_size(input_size),
            FileManager::format_size(output_size),
            FileManager::calculate_reduction(input_size, output_size)
        );

        let deleted_input = self.delete_after_success && delete_input(&job.input).await;

        Ok(Outcome::Compressed {
            input_size,
            output_size,
            deleted_input,
        })
    }
}

/// A partial output left by an interrupted run would make `-n` fail forever
async fn remove_stale_partial(temp_output: &Path) {
    match tokio::fs::remove_file(temp_output).await {
        Ok(()) => warn!("Removed stale partial output {}", temp_output.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => debug!("Could not remove {}: {}", temp_output.display(), e),
    }
}

async fn delete_input(input: &Path) -> bool {
    warn!("Delete {}", input.display());
    match tokio::fs::remove_file(input).await {
        Ok(()) => true,
        Err(e) => {
            error!("Failed to delete {}: {}", input.display(), e);
            false
        }
    }
}
