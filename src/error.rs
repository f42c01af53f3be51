use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// A timestamp that does not start with `H+:MM:SS`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid timestamp {input:?}, expected HH:MM:SS")]
pub struct TimestampParseError {
    pub input: String,
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{tool} must be installed in your PATH")]
    NotFound { tool: String },

    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        tool: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("unexpected output from {tool}: {detail}")]
    BadOutput { tool: String, detail: String },
}

/// Everything that can go wrong while tagging a single video.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("Not a video file: {}", path.display())]
    UnsupportedFile { path: PathBuf },

    #[error("Could not find .srt file for: {}", path.display())]
    MissingCompanion { path: PathBuf },

    #[error(transparent)]
    Timestamp(#[from] TimestampParseError),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("remux produced no usable output at {}", path.display())]
    InvalidOutput { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FileError {
    /// Skips are reported but do not count as failures in a batch.
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            FileError::UnsupportedFile { .. } | FileError::MissingCompanion { .. }
        )
    }
}
