use super::KeywordMatch;
use std::collections::HashSet;

/// Join match contexts into one block, dropping exact duplicates.
///
/// The first occurrence of each context keeps its position. Near-duplicates
/// that differ only at the window edges are kept.
pub fn merge_contexts(matches: &[KeywordMatch]) -> String {
    let mut seen = HashSet::new();

    matches
        .iter()
        .map(|m| m.context.as_str())
        .filter(|context| seen.insert(*context))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(start: f64, context: &str) -> KeywordMatch {
        KeywordMatch {
            start,
            context: context.to_string(),
        }
    }

    #[test]
    fn test_distinct_contexts_are_joined_in_order() {
        let matches = vec![
            matched(0.0, "cats are great dogs bark loud"),
            matched(10.0, "dogs bark loud cats sleep a lot"),
        ];
        assert_eq!(
            merge_contexts(&matches),
            "cats are great dogs bark loud dogs bark loud cats sleep a lot"
        );
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        let matches = vec![
            matched(0.0, "a b"),
            matched(1.0, "c d"),
            matched(2.0, "a b"),
            matched(3.0, "e"),
            matched(4.0, "c d"),
        ];
        assert_eq!(merge_contexts(&matches), "a b c d e");
    }

    #[test]
    fn test_near_duplicates_survive() {
        let matches = vec![matched(0.0, "a b c"), matched(1.0, "a b c d")];
        assert_eq!(merge_contexts(&matches), "a b c a b c d");
    }

    #[test]
    fn test_empty() {
        assert_eq!(merge_contexts(&[]), "");
    }
}
