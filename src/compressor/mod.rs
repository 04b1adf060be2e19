//! # Compressor Module
//!
//! Splits the pipeline into submodules:
//! - `classifier`: eligibility rules and output path derivation
//! - `task`: per-file worker (encode, commit, account)
//! - `video_compressor`: orchestrator owning the pool and the traversal

pub mod classifier;
pub mod task;
pub mod video_compressor;

pub use classifier::{Classifier, CompressionJob, COMPRESS_SUFFIX};
pub use task::{CompressTask, Outcome};
pub use video_compressor::{compress_all, VideoCompressor};
