use serde::{Deserialize, Serialize};

use crate::markers::DEFAULT_MARKER;

/// Per-run settings shared by every file in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessOptions {
    /// Caption line prefix that flags the next cue as a commercial break.
    pub marker: String,
    /// Build and report chapters without writing or remuxing anything.
    pub dry_run: bool,
    /// Leave `<stem>_METADATA.txt` next to the video after remuxing.
    pub keep_metadata: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            dry_run: false,
            keep_metadata: false,
        }
    }
}
