use std::fmt::{self, Display, Write};

use serde::{Deserialize, Serialize};

use crate::error::TimestampParseError;
use crate::timebase::Timestamp;

/// One commercial break as read from the caption file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampPair {
    pub start: Timestamp,
    pub end: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub start: Timestamp,
    pub end: Timestamp,
    pub index: u32,
}

impl Chapter {
    pub fn title(&self) -> String {
        format!("Chapter {}", self.index)
    }

    pub fn to_span(&self) -> Result<ChapterSpan, TimestampParseError> {
        Ok(ChapterSpan {
            start_ms: self.start.to_millis()?,
            end_ms: self.end.to_millis()?,
            title: self.title(),
        })
    }
}

/// A chapter resolved to the millisecond timebase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterSpan {
    pub start_ms: u64,
    pub end_ms: u64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Chapters(Vec<Chapter>);

impl Chapters {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chapter> {
        self.0.iter()
    }

    pub fn spans(&self) -> Result<Vec<ChapterSpan>, TimestampParseError> {
        self.iter().map(Chapter::to_span).collect()
    }
}

impl<'a> IntoIterator for &'a Chapters {
    type Item = &'a Chapter;
    type IntoIter = std::slice::Iter<'a, Chapter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for Chapters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut output = String::new();
        for chapter in self {
            let _ = writeln!(
                &mut output,
                "Start: {:<14} End: {:<14} Title: {}",
                chapter.start.as_str(),
                chapter.end.as_str(),
                chapter.title()
            );
        }
        f.write_str(&output)
    }
}

/// Turns break start times into back-to-back chapters from `00:00:00` to
/// `video_length`.
///
/// Only each pair's start is used. No breaks means no chapters. Break order
/// and bounds are not checked: out of order input gives out of order chapters.
pub fn build_chapters(breaks: &[TimestampPair], video_length: &Timestamp) -> Chapters {
    let Some(first) = breaks.first() else {
        return Chapters::default();
    };

    let mut boundaries = Vec::with_capacity(breaks.len() + 2);
    boundaries.push(Timestamp::origin());
    boundaries.push(first.start.clone());
    boundaries.extend(breaks[1..].iter().map(|b| b.start.clone()));
    boundaries.push(video_length.clone());

    let chapters = boundaries
        .windows(2)
        .zip(1..)
        .map(|(w, index)| Chapter {
            start: w[0].clone(),
            end: w[1].clone(),
            index,
        })
        .collect();

    Chapters(chapters)
}
