//! Transcript text normalization.

/// Collapse every run of whitespace (newlines included) into a single space and
/// trim both ends.
pub fn clean(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Number of whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_collapses_whitespace() {
        assert_eq!(clean("  hello\n\nworld \t again  "), "hello world again");
        assert_eq!(clean("line one\nline two"), "line one line two");
        assert_eq!(clean("\r\n"), "");
        assert_eq!(clean(""), "");
    }

    #[test]
    fn test_clean_is_idempotent() {
        for s in [
            "",
            "   ",
            "already clean",
            "  leading",
            "trailing\n",
            "a\u{00a0}\u{2003}b",
            "[Music]\n  >> so  today\twe talk",
        ] {
            let once = clean(s);
            assert_eq!(clean(&once), once, "input: {:?}", s);
        }
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("one two  three\nfour"), 4);
        assert_eq!(word_count("  "), 0);
    }
}
