//! Word and page counting over extracted text.

/// Characters per printed page used when a document has no page structure.
///
/// A rough average for a paperback page; estimates based on it are approximate.
pub const CHARS_PER_PAGE: u64 = 1781;

/// Number of maximal whitespace-delimited runs in `text`.
///
/// Empty or whitespace-only text counts as zero words.
pub fn count_words(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}

/// Native page count when the format has one, otherwise `ceil(chars / CHARS_PER_PAGE)`.
pub fn estimate_pages(text: &str, native_pages: Option<u64>) -> u64 {
    if let Some(pages) = native_pages {
        return pages;
    }
    let chars = text.chars().count() as u64;
    chars.div_ceil(CHARS_PER_PAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_words() {
        assert_eq!(count_words("one two three"), 3);
        assert_eq!(count_words("  leading and   trailing  "), 3);
        assert_eq!(count_words("tabs\tand\nnew\r\nlines"), 4);
        assert_eq!(count_words("hyphen-ated stays one"), 3);
    }

    #[test]
    fn test_empty_text_has_no_words() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   \n\t  "), 0);
    }

    #[test]
    fn test_unicode_whitespace_separates_words() {
        // NO-BREAK SPACE is Unicode whitespace
        assert_eq!(count_words("caf\u{e9}\u{a0}cr\u{e8}me"), 2);
        assert_eq!(count_words("日本語 テキスト"), 2);
    }

    #[test]
    fn test_estimate_pages_from_characters() {
        assert_eq!(estimate_pages("", None), 0);
        assert_eq!(estimate_pages("a", None), 1);
        assert_eq!(estimate_pages(&"x".repeat(1781), None), 1);
        assert_eq!(estimate_pages(&"x".repeat(1782), None), 2);
    }

    #[test]
    fn test_estimate_pages_counts_chars_not_bytes() {
        // 1781 two-byte characters still fit on one page
        assert_eq!(estimate_pages(&"é".repeat(1781), None), 1);
    }

    #[test]
    fn test_native_page_count_wins() {
        assert_eq!(estimate_pages(&"x".repeat(10_000), Some(3)), 3);
        assert_eq!(estimate_pages("", Some(12)), 12);
    }
}
