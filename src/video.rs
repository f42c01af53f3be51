use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::chapters::{ChapterSpan, build_chapters};
use crate::config::ProcessOptions;
use crate::error::FileError;
use crate::file::{WorkPaths, find_companion_subtitle, is_supported_video, list_files_recursive};
use crate::markers::read_markers;
use crate::metadata::{render_spans, write_metadata_file};
use crate::replace::{remove_if_exists, replace_with_output};
use crate::timebase::Timestamp;
use crate::tools::MediaTools;

/// The chapter plan for one video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterReport {
    pub video: PathBuf,
    pub subtitle: PathBuf,
    #[serde(with = "humantime_serde")]
    pub duration: Duration,
    pub video_length: Timestamp,
    pub chapters: Vec<ChapterSpan>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Chapters were written into the video.
    Tagged(ChapterReport),
    /// Dry run: chapters were built but nothing was written.
    Planned(ChapterReport),
    /// The captions carry no break markers; the video is left untouched.
    NoBreaks { video: PathBuf, subtitle: PathBuf },
}

pub fn process_video(
    video: &Path,
    options: &ProcessOptions,
    tools: &impl MediaTools,
) -> Result<Outcome, FileError> {
    if !is_supported_video(video) {
        return Err(FileError::UnsupportedFile {
            path: video.to_path_buf(),
        });
    }
    if !video.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no such video: {}", video.display()),
        )
        .into());
    }

    let subtitle = find_companion_subtitle(video)?.ok_or_else(|| FileError::MissingCompanion {
        path: video.to_path_buf(),
    })?;

    log::info!("Processing {}", video.display());

    let breaks = read_markers(&subtitle, &options.marker)?;
    if breaks.is_empty() {
        log::info!(
            "No commercial markers in \"{}\", leaving {} untouched",
            subtitle.display(),
            video.display()
        );
        return Ok(Outcome::NoBreaks {
            video: video.to_path_buf(),
            subtitle,
        });
    }

    let duration = tools.probe_duration(video)?;
    let video_length = Timestamp::from_duration(duration);
    let chapters = build_chapters(&breaks, &video_length);
    log::debug!("Chapters for {}:\n{}", video.display(), chapters);

    let report = ChapterReport {
        video: video.to_path_buf(),
        subtitle,
        duration,
        video_length,
        chapters: chapters.spans()?,
    };

    if options.dry_run {
        return Ok(Outcome::Planned(report));
    }

    let paths = WorkPaths::for_video(video);
    write_metadata_file(&paths.metadata, &render_spans(&report.chapters))?;

    let remuxed = tools.remux(video, &paths.metadata, &paths.temp_output);
    if !options.keep_metadata {
        remove_if_exists(&paths.metadata);
    }
    if let Err(e) = remuxed {
        remove_if_exists(&paths.temp_output);
        return Err(e.into());
    }

    replace_with_output(video, &paths.temp_output)?;

    log::info!(
        "Added {} chapters to {}",
        report.chapters.len(),
        video.display()
    );
    Ok(Outcome::Tagged(report))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub tagged: usize,
    pub no_breaks: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Dry run plans, in processing order.
    pub planned: Vec<ChapterReport>,
}

impl BatchSummary {
    fn record(&mut self, video: &Path, result: Result<Outcome, FileError>) {
        match result {
            Ok(Outcome::Tagged(_)) => self.tagged += 1,
            Ok(Outcome::Planned(report)) => self.planned.push(report),
            Ok(Outcome::NoBreaks { .. }) => self.no_breaks += 1,
            Err(e) if e.is_skip() => {
                log::warn!("{e}");
                self.skipped += 1;
            }
            Err(e) => {
                log::error!("Failed to process {}: {e}", video.display());
                self.failed += 1;
            }
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Processes one file, or every file under a directory when `recursive`.
/// Per-file problems are tallied, never propagated.
pub fn process_target(
    target: &Path,
    recursive: bool,
    options: &ProcessOptions,
    tools: &impl MediaTools,
) -> Result<BatchSummary> {
    let files = if recursive {
        if !target.is_dir() {
            anyhow::bail!("Path must be a directory if using -r: {}", target.display());
        }
        list_files_recursive(target)
    } else {
        vec![target.to_path_buf()]
    };

    let mut summary = BatchSummary::default();
    for file in &files {
        summary.record(file, process_video(file, options, tools));
    }

    Ok(summary)
}
