//! ffprobe and ffmpeg, behind the narrow [`MediaTools`] seam.

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ToolError;

pub const FFMPEG: &str = "ffmpeg";
pub const FFPROBE: &str = "ffprobe";

/// The two external media operations the pipeline needs.
pub trait MediaTools {
    /// Total playable duration of the container.
    fn probe_duration(&self, video: &Path) -> Result<Duration, ToolError>;

    /// Stream-copies `video` into `output` with the chapters from `metadata`.
    fn remux(&self, video: &Path, metadata: &Path, output: &Path) -> Result<(), ToolError>;
}

/// Resolved locations of ffmpeg and ffprobe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl ToolPaths {
    /// Uses the overrides when given, otherwise searches `PATH`. Overrides
    /// may be bare names (searched on `PATH`) or paths, and must be executable.
    pub fn resolve(ffmpeg: Option<PathBuf>, ffprobe: Option<PathBuf>) -> Result<Self, ToolError> {
        let search_path = env::var_os("PATH");
        Ok(Self {
            ffmpeg: resolve_tool(FFMPEG, ffmpeg, search_path.as_deref())?,
            ffprobe: resolve_tool(FFPROBE, ffprobe, search_path.as_deref())?,
        })
    }
}

fn resolve_tool(
    tool: &str,
    requested: Option<PathBuf>,
    search_path: Option<&OsStr>,
) -> Result<PathBuf, ToolError> {
    let name = requested.unwrap_or_else(|| PathBuf::from(tool));
    let cwd = env::current_dir().unwrap_or_default();

    match which::which_in(&name, search_path, cwd) {
        Ok(path) => {
            log::debug!("Using {tool} from {}", path.display());
            Ok(path)
        }
        Err(e) => {
            log::debug!("Failed to locate {tool} as {}: {e}", name.display());
            Err(ToolError::NotFound {
                tool: tool.to_string(),
            })
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    format: ProbeFormat,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// Reads the duration out of `ffprobe -show_entries format=duration -of json`.
pub fn parse_probe_output(json: &str) -> Result<Duration, ToolError> {
    let bad = |detail: String| ToolError::BadOutput {
        tool: FFPROBE.to_string(),
        detail,
    };

    let probe: ProbeOutput = serde_json::from_str(json).map_err(|e| bad(e.to_string()))?;
    let raw = probe
        .format
        .duration
        .ok_or_else(|| bad("no format duration reported".to_string()))?;
    let seconds: f64 = raw
        .trim()
        .parse()
        .map_err(|_| bad(format!("duration {raw:?} is not a number")))?;

    Duration::try_from_secs_f64(seconds).map_err(|_| bad(format!("duration {raw:?} is out of range")))
}

/// [`MediaTools`] backed by the real ffmpeg binaries.
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    paths: ToolPaths,
}

impl Ffmpeg {
    pub fn new(paths: ToolPaths) -> Self {
        Self { paths }
    }

    fn run<I, S>(&self, tool: &str, program: &Path, args: I) -> Result<Output, ToolError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        log::debug!("Running {:?}", command);

        let output = command.output().map_err(|source| ToolError::Spawn {
            tool: tool.to_string(),
            source,
        })?;

        if !output.status.success() {
            log::debug!("{tool} stdout\n{}", String::from_utf8_lossy(&output.stdout));
            return Err(ToolError::Failed {
                tool: tool.to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output)
    }
}

impl MediaTools for Ffmpeg {
    fn probe_duration(&self, video: &Path) -> Result<Duration, ToolError> {
        let output = self.run(
            FFPROBE,
            &self.paths.ffprobe,
            [
                OsStr::new("-v"),
                OsStr::new("error"),
                OsStr::new("-show_entries"),
                OsStr::new("format=duration"),
                OsStr::new("-of"),
                OsStr::new("json"),
                video.as_os_str(),
            ],
        )?;

        parse_probe_output(&String::from_utf8_lossy(&output.stdout))
    }

    fn remux(&self, video: &Path, metadata: &Path, output: &Path) -> Result<(), ToolError> {
        // -map_chapters 1: a re-run must replace chapters already in the file.
        self.run(
            FFMPEG,
            &self.paths.ffmpeg,
            [
                OsStr::new("-nostdin"),
                OsStr::new("-y"),
                OsStr::new("-i"),
                video.as_os_str(),
                OsStr::new("-i"),
                metadata.as_os_str(),
                OsStr::new("-map"),
                OsStr::new("0"),
                OsStr::new("-map_metadata"),
                OsStr::new("1"),
                OsStr::new("-map_chapters"),
                OsStr::new("1"),
                OsStr::new("-codec"),
                OsStr::new("copy"),
                OsStr::new("-movflags"),
                OsStr::new("+faststart"),
                output.as_os_str(),
            ],
        )?;
        Ok(())
    }
}
