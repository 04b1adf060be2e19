//! # File Management Module
//!
//! Filesystem helpers used by the per-file pipeline.
//!
//! ## Operations:
//! - `is_video()`: extension allow-list check
//! - `file_size()`: size of a file without following symlinks
//! - `commit()`: rename a finished temp output into place
//! - `format_size()`: human-readable sizes (KB, MB, GB)
//! - `calculate_reduction()`: percentage saved
//!
//! ## Example:
//! ```rust
//! use video_compress::file_manager::FileManager;
//! use std::path::Path;
//!
//! assert!(FileManager::is_video(Path::new("holiday.MKV")));
//! assert_eq!(FileManager::format_size(1536), "1.50 KB");
//! ```

use crate::error::CompressError;
use std::path::Path;
use tokio::fs;

/// Container extensions accepted as video input, lowercase without the dot
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "avi", "wmv", "mov", "mkv", "flv", "m4v", "webm", "mpeg", "3gp", "ogv", "ts", "m2ts",
    "vob", "divx", "f4v",
];

/// File operations used by the compressor
pub struct FileManager;

impl FileManager {
    /// Check if a file is a video, by extension (case-insensitive)
    pub fn is_video(path: &Path) -> bool {
        path.extension()
            .map(|ext| Self::is_video_extension(&ext.to_string_lossy()))
            .unwrap_or(false)
    }

    /// Check a bare extension against the allow-list; a leading dot is ignored
    pub fn is_video_extension(ext: &str) -> bool {
        let ext_lower = ext.trim_start_matches('.').to_lowercase();
        VIDEO_EXTENSIONS.contains(&ext_lower.as_str())
    }

    /// Size of a file in bytes, not following symlinks
    pub async fn file_size(path: &Path) -> Result<u64, CompressError> {
        Ok(fs::symlink_metadata(path).await?.len())
    }

    /// Atomically move `from` to `to`, replacing `to` if present
    pub async fn commit(from: &Path, to: &Path) -> Result<(), CompressError> {
        fs::rename(from, to)
            .await
            .map_err(|source| CompressError::Commit {
                from: from.to_path_buf(),
                to: to.to_path_buf(),
                source,
            })
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Calculate percentage reduction
    pub fn calculate_reduction(original_size: u64, new_size: u64) -> f64 {
        if original_size == 0 {
            0.0
        } else {
            (1.0 - new_size as f64 / original_size as f64) * 100.0
        }
    }
}
