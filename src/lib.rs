/*

Caption file                         ffmpeg metadata
---------------------------------    -----------------
X-TIMESTAMP-MAP=MPEGTS:...           ;FFMETADATA1
00:02:00.000 --> 00:02:30.000   =>
...                                  [CHAPTER]
X-TIMESTAMP-MAP=MPEGTS:...           TIMEBASE=1/1000
00:07:00.000 --> 00:07:45.000        START=0
                                     END=120000
                                     title=Chapter 1
                                     ...

*/

pub mod chapters;
pub mod config;
pub mod error;
pub mod file;
pub mod markers;
pub mod metadata;
pub mod replace;
pub mod timebase;
pub mod tools;
pub mod video;

pub use crate::chapters::{Chapter, ChapterSpan, Chapters, TimestampPair, build_chapters};
pub use crate::config::ProcessOptions;
pub use crate::error::{FileError, TimestampParseError, ToolError};
pub use crate::markers::{DEFAULT_MARKER, extract_markers};
pub use crate::metadata::{render_chapters, render_spans};
pub use crate::timebase::{Timestamp, timestamp_to_timebase};
pub use crate::tools::{Ffmpeg, MediaTools, ToolPaths};
pub use crate::video::{BatchSummary, ChapterReport, Outcome, process_target, process_video};
