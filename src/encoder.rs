//! # Encoder Module
//!
//! Runs the external encoder for a single file.
//!
//! ## Command template:
//! ```text
//! ffmpeg -i <input> -n -c:v libx264 -tag:v avc1 -movflags faststart -crf <crf> -preset superfast <output>
//! ```
//! - `-n`: never overwrite an existing output
//! - `-c:v libx264` / `-tag:v avc1`: baseline H.264, tagged for player compatibility
//! - `-movflags faststart`: moov atom up front so playback can start while downloading
//! - `-preset superfast`: quick encodes at some cost in compression efficiency
//!
//! Only the exit status decides success. Output is captured in the
//! [`EncodeLog`] and never parsed.
//!
//! ## Example:
//! ```rust,no_run
//! use video_compress::encoder::{Encoder, FfmpegEncoder};
//! use video_compress::encode_log::EncodeLog;
//! use std::path::Path;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let log = EncodeLog::open(Path::new("/tmp/encode.log"))?;
//! let encoder = FfmpegEncoder::default();
//! encoder.encode(Path::new("in.mkv"), Path::new("in.mkv-compressed.part.mp4"), 30, &log).await?;
//! # Ok(())
//! # }
//! ```

use crate::encode_log::EncodeLog;
use crate::error::CompressError;
use crate::os_args;
use crate::utils::render_command;
use std::ffi::OsString;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, error};

/// Something that turns an input video into an encoded file at `output`.
///
/// `Ok(())` means `output` now exists on disk. On error nothing is promised
/// about a partial `output`.
pub trait Encoder: Send + Sync + 'static {
    fn encode(
        &self,
        input: &Path,
        output: &Path,
        crf: u8,
        log: &EncodeLog,
    ) -> impl Future<Output = Result<(), CompressError>> + Send;
}

/// Encoder backed by an ffmpeg executable
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    program: PathBuf,
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new(if cfg!(windows) { "ffmpeg.exe" } else { "ffmpeg" })
    }
}

impl FfmpegEncoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments passed to the encoder, program excluded
    pub fn build_args(&self, input: &Path, output: &Path, crf: u8) -> Vec<OsString> {
        let crf = crf.to_string();
        os_args![
            "-i", input,
            "-n",
            "-c:v", "libx264",
            "-tag:v", "avc1",
            "-movflags", "faststart",
            "-crf", &crf,
            "-preset", "superfast",
            output,
        ]
    }

    /// Check the encoder can be executed at all
    pub async fn check_available(&self) -> Result<(), CompressError> {
        let status = Command::new(&self.program)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(status) if status.success() => Ok(()),
            _ => Err(CompressError::MissingDependency(format!(
                "{} is required for video compression",
                self.program.display()
            ))),
        }
    }
}

impl Encoder for FfmpegEncoder {
    async fn encode(
        &self,
        input: &Path,
        output: &Path,
        crf: u8,
        log: &EncodeLog,
    ) -> Result<(), CompressError> {
        let args = self.build_args(input, output, crf);
        let command_line = render_command(self.program.as_os_str(), &args);
        debug!("Running: {}", command_line);

        log.record_command(&command_line)?;
        let (stdout, stderr) = log.child_stdio()?;

        let status = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .status()
            .await
            .map_err(|source| CompressError::Launch {
                program: self.program.display().to_string(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            error!("Encoder failed for {}: {}", input.display(), status);
            Err(CompressError::EncoderExit(status))
        }
    }
}
