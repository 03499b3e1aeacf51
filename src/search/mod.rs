//! Keyword-context search over an indexed transcript.
//!
//! Fragments are first cleaned into [`Segment`]s (one per fragment, same
//! order). A keyword search then yields one [`KeywordMatch`] per matching
//! segment, carrying the text of its neighbours, and the contexts are merged
//! into a single block for the summarizer.

mod index;
mod keyword;
mod merge;

pub use index::{index, IndexedTranscript};
pub use keyword::find_keyword_segments;
pub use merge::merge_contexts;

use serde::{Deserialize, Serialize};

/// A cleaned transcript fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start offset in seconds.
    pub start: f64,
    /// Whitespace-normalized text.
    pub text: String,
}

impl Segment {
    pub fn new(start: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            text: text.into(),
        }
    }
}

/// A segment containing the keyword, with its surrounding context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordMatch {
    /// Start offset of the matching segment.
    pub start: f64,
    /// Text of the segments in the window around the match.
    pub context: String,
}
