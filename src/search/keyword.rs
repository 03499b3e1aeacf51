use super::{KeywordMatch, Segment};
use crate::text;

/// Find every segment containing `keyword` (case-insensitive) and attach the
/// text of up to `window` segments on either side.
///
/// Produces one match per matching segment, in segment order. Overlapping
/// windows are kept as-is; see [`merge_contexts`](super::merge_contexts).
pub fn find_keyword_segments(
    segments: &[Segment],
    keyword: &str,
    window: usize,
) -> Vec<KeywordMatch> {
    let needle = keyword.to_lowercase();

    segments
        .iter()
        .enumerate()
        .filter(|(_, segment)| segment.text.to_lowercase().contains(&needle))
        .map(|(i, segment)| {
            let from = i.saturating_sub(window);
            let to = (i + window + 1).min(segments.len());
            let joined = segments[from..to]
                .iter()
                .map(|s| s.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");

            KeywordMatch {
                start: segment.start,
                context: text::clean(&joined),
            }
        })
        .collect()
}
