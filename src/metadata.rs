//! ffmpeg's `;FFMETADATA1` text format, chapters only.
//!
//! The byte layout is fixed: ffmpeg's metadata demuxer is picky about the
//! magic line and key names.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::chapters::{ChapterSpan, Chapters};
use crate::error::TimestampParseError;

pub const FFMETADATA_HEADER: &str = ";FFMETADATA1";

pub fn render_spans(spans: &[ChapterSpan]) -> String {
    let mut output = String::from(FFMETADATA_HEADER);
    output.push('\n');

    for span in spans {
        let _ = write!(
            &mut output,
            "\n[CHAPTER]\nTIMEBASE=1/1000\nSTART={}\nEND={}\ntitle={}\n",
            span.start_ms, span.end_ms, span.title
        );
    }

    output
}

pub fn render_chapters(chapters: &Chapters) -> Result<String, TimestampParseError> {
    Ok(render_spans(&chapters.spans()?))
}

pub fn write_metadata_file(path: impl AsRef<Path>, metadata: &str) -> std::io::Result<()> {
    log::debug!("Writing chapter metadata to \"{}\"", path.as_ref().display());
    fs::write(path, metadata)
}
