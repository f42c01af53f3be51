use std::{
    fs,
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

/// Containers ffmpeg can rewrite with chapters using a plain stream copy.
pub const VIDEO_EXTENSIONS: [&str; 3] = ["mp4", "mkv", "ts"];

pub fn is_supported_video(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            VIDEO_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Finds `<stem>*.srt` next to the video. With several candidates
/// (`show.en.srt`, `show.srt`) the first in name order wins.
pub fn find_companion_subtitle(video: &Path) -> std::io::Result<Option<PathBuf>> {
    let stem = file_stem(video);
    let mut candidates = Vec::new();

    for entry in fs::read_dir(parent_dir(video))? {
        let entry = entry?;
        // Path::is_file follows symlinks, so linked captions count.
        if !entry.path().is_file() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with(&stem) && name.ends_with(".srt") {
            candidates.push(entry.path());
        }
    }

    candidates.sort();
    Ok(candidates.into_iter().next())
}

/// Files written next to a video while it is being tagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkPaths {
    /// `<stem>_METADATA.txt`
    pub metadata: PathBuf,
    /// `<stem>_TEMP.<ext>`, renamed over the original once verified.
    pub temp_output: PathBuf,
}

impl WorkPaths {
    pub fn for_video(video: &Path) -> Self {
        let dir = parent_dir(video);
        let stem = file_stem(video);
        let ext = video
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        Self {
            metadata: dir.join(format!("{stem}_METADATA.txt")),
            temp_output: dir.join(format!("{stem}_TEMP{ext}")),
        }
    }
}

/// Every file under `root` in a stable order, symlinked files included.
/// The list is collected up front so files created while processing are never
/// visited. Unreadable directories are logged and skipped.
pub fn list_files_recursive(root: impl AsRef<Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root.as_ref()).sort_by_file_name() {
        match entry {
            Ok(entry) if entry.path().is_file() => files.push(entry.into_path()),
            Ok(_) => {}
            Err(e) => {
                let path = e.path().unwrap_or(root.as_ref()).display().to_string();
                log::warn!("Skipping unreadable path {path}: {e}");
            }
        }
    }

    files
}
