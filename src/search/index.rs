use super::Segment;
use crate::text;
use crate::transcript::TranscriptFragment;

/// A transcript as one block of text plus its ordered segments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedTranscript {
    pub full_text: String,
    pub segments: Vec<Segment>,
}

impl IndexedTranscript {
    pub fn word_count(&self) -> usize {
        text::word_count(&self.full_text)
    }
}

/// Clean every fragment into a segment, keeping count and order.
pub fn index(fragments: &[TranscriptFragment]) -> IndexedTranscript {
    let mut full_text = String::new();
    let mut segments = Vec::with_capacity(fragments.len());

    for fragment in fragments {
        let cleaned = text::clean(&fragment.text);
        full_text.push_str(&cleaned);
        full_text.push(' ');
        segments.push(Segment::new(fragment.start, cleaned));
    }

    IndexedTranscript {
        // Empty fragments leave double spaces at the seams
        full_text: text::clean(&full_text),
        segments,
    }
}
