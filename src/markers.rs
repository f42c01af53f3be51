//! Commercial break markers embedded in caption files.
//!
//! Broadcast recorders drop a caption metadata tag in front of each cue that
//! covers an ad break. The cue's timing line that follows the tag is the
//! break itself; every other cue is ordinary dialogue and is ignored.

use std::fs;
use std::path::Path;

use crate::chapters::TimestampPair;
use crate::timebase::Timestamp;

/// Tag written by the recorder ahead of each commercial break.
pub const DEFAULT_MARKER: &str = "X-TIMESTAMP-MAP=MPEGTS";

/// Delimiter between the two halves of a cue timing line.
pub const RANGE_DELIMITER: &str = " --> ";

/// How a single caption line affects the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Marker,
    Range(TimestampPair),
    Other,
}

impl LineKind {
    pub fn classify(line: &str, marker: &str) -> Self {
        let line = line.trim_end();
        if line.starts_with(marker) {
            return LineKind::Marker;
        }
        match line.split_once(RANGE_DELIMITER) {
            Some((start, end)) => LineKind::Range(TimestampPair {
                start: Timestamp::new(start),
                end: Timestamp::new(end),
            }),
            None => LineKind::Other,
        }
    }
}

/// Idle until a marker is seen, then armed until the next timing line.
///
/// | state | marker | range        | other |
/// |-------|--------|--------------|-------|
/// | Idle  | Armed  | Idle         | Idle  |
/// | Armed | Armed  | Idle + emit  | Armed |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerState {
    #[default]
    Idle,
    Armed,
}

impl MarkerState {
    pub fn step(self, kind: LineKind) -> (MarkerState, Option<TimestampPair>) {
        match (self, kind) {
            (_, LineKind::Marker) => (MarkerState::Armed, None),
            (MarkerState::Armed, LineKind::Range(pair)) => (MarkerState::Idle, Some(pair)),
            (state, _) => (state, None),
        }
    }
}

/// Collects every marked break in file order. A marker left armed at the end
/// of input is dropped.
pub fn extract_markers<'a, I>(lines: I, marker: &str) -> Vec<TimestampPair>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut state = MarkerState::Idle;
    let mut pairs = Vec::new();

    for line in lines {
        let (next, emitted) = state.step(LineKind::classify(line, marker));
        state = next;
        pairs.extend(emitted);
    }

    pairs
}

pub fn read_markers(srt_path: impl AsRef<Path>, marker: &str) -> std::io::Result<Vec<TimestampPair>> {
    let bytes = fs::read(srt_path.as_ref())?;
    let text = String::from_utf8_lossy(&bytes);
    let pairs = extract_markers(text.lines(), marker);

    log::debug!(
        "Found {} commercial marker(s) in \"{}\"",
        pairs.len(),
        srt_path.as_ref().display()
    );

    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(start: &str, end: &str) -> TimestampPair {
        TimestampPair {
            start: Timestamp::new(start),
            end: Timestamp::new(end),
        }
    }

    #[test]
    fn marker_then_range_yields_one_pair() {
        let lines = [DEFAULT_MARKER, "00:00:05.000 --> 00:00:10.000", "hello"];
        assert_eq!(
            extract_markers(lines, DEFAULT_MARKER),
            vec![pair("00:00:05.000", "00:00:10.000")]
        );
    }

    #[test]
    fn unmatched_marker_is_dropped() {
        let lines = ["1", DEFAULT_MARKER, "hello"];
        assert!(extract_markers(lines, DEFAULT_MARKER).is_empty());
    }

    #[test]
    fn last_marker_wins() {
        let lines = [
            DEFAULT_MARKER,
            DEFAULT_MARKER,
            "00:02:00.000 --> 00:02:30.000",
        ];
        assert_eq!(extract_markers(lines, DEFAULT_MARKER).len(), 1);
    }

    #[test]
    fn unmarked_cues_are_ignored() {
        let lines = [
            "1",
            "00:00:01,000 --> 00:00:02,000",
            "dialogue",
            "",
            "2",
            "X-TIMESTAMP-MAP=MPEGTS:181083,LOCAL:00:00:00.000",
            "00:07:00.000 --> 00:07:01.000",
            "",
            "3",
            "00:08:00,000 --> 00:08:02,000",
        ];
        assert_eq!(
            extract_markers(lines, DEFAULT_MARKER),
            vec![pair("00:07:00.000", "00:07:01.000")]
        );
    }

    #[test]
    fn trailing_whitespace_and_crlf_are_trimmed() {
        let lines = ["X-TIMESTAMP-MAP=MPEGTS \r", "00:01:00.000 --> 00:01:05.000\r"];
        assert_eq!(
            extract_markers(lines, DEFAULT_MARKER),
            vec![pair("00:01:00.000", "00:01:05.000")]
        );
    }

    #[test]
    fn custom_marker_token() {
        let lines = ["NOTE ad-break", "00:03:00.000 --> 00:03:10.000"];
        assert_eq!(extract_markers(lines, "NOTE ad-break").len(), 1);
        assert!(extract_markers(lines, DEFAULT_MARKER).is_empty());
    }

    #[test]
    fn transition_table() {
        let range = LineKind::Range(pair("00:00:01", "00:00:02"));

        assert_eq!(MarkerState::Idle.step(LineKind::Other), (MarkerState::Idle, None));
        assert_eq!(MarkerState::Idle.step(range.clone()), (MarkerState::Idle, None));
        assert_eq!(MarkerState::Idle.step(LineKind::Marker), (MarkerState::Armed, None));
        assert_eq!(MarkerState::Armed.step(LineKind::Other), (MarkerState::Armed, None));
        assert_eq!(MarkerState::Armed.step(LineKind::Marker), (MarkerState::Armed, None));
        assert_eq!(
            MarkerState::Armed.step(range),
            (MarkerState::Idle, Some(pair("00:00:01", "00:00:02")))
        );
    }
}
