//! # Classifier Module
//!
//! Decides which discovered files get compressed and derives their output
//! paths.
//!
//! `movie.mkv` becomes `movie-compressed.mp4`. While the encoder runs, it
//! writes to `movie.mkv-compressed.part.mp4`; the partial keeps the whole
//! input name so `movie.mkv` and `movie.mov` never share one. Files carrying
//! either marker are never compressed again, so reruns over the same tree
//! are idempotent.

use crate::error::SkipReason;
use crate::file_manager::FileManager;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Marker appended to the input stem to name the final output
pub const COMPRESS_SUFFIX: &str = "-compressed.mp4";

/// Marker of an encode that has not been committed yet
pub const PARTIAL_SUFFIX: &str = "-compressed.part.mp4";

/// One input file and the paths derived from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub temp_output: PathBuf,
}

impl CompressionJob {
    pub fn new(input: PathBuf) -> Self {
        let output = with_suffix(&input, input.file_stem(), COMPRESS_SUFFIX);
        let temp_output = with_suffix(&input, input.file_name(), PARTIAL_SUFFIX);
        Self {
            input,
            output,
            temp_output,
        }
    }
}

fn with_suffix(input: &Path, base: Option<&OsStr>, suffix: &str) -> PathBuf {
    let mut name = base.map(OsStr::to_os_string).unwrap_or_else(OsString::new);
    name.push(suffix);
    input.with_file_name(name)
}

/// Eligibility rules for compression
pub struct Classifier;

impl Classifier {
    /// Classify a path, yielding its job when eligible
    pub fn classify(path: &Path) -> Result<CompressionJob, SkipReason> {
        let file_name = match path.file_name() {
            Some(name) => name.to_string_lossy(),
            None => return Err(SkipReason::NotVideo),
        };

        if file_name.ends_with(COMPRESS_SUFFIX) || file_name.ends_with(PARTIAL_SUFFIX) {
            return Err(SkipReason::AlreadyCompressed);
        }

        if !FileManager::is_video(path) {
            return Err(SkipReason::NotVideo);
        }

        let job = CompressionJob::new(path.to_path_buf());
        // point-in-time check; a concurrent writer can still race the commit
        if job.output.exists() {
            return Err(SkipReason::OutputExists);
        }

        Ok(job)
    }

    pub fn is_eligible(path: &Path) -> bool {
        Self::classify(path).is_ok()
    }
}
