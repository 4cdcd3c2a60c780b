use super::{read_lossy, Extraction};
use crate::error::ExtractionError;
use pulldown_cmark::{Event, Parser, Tag};
use std::path::Path;

pub fn extract(path: &Path) -> Result<Extraction, ExtractionError> {
    Ok(Extraction::text(read_lossy(path)?))
}

/// Markdown is counted as rendered prose, without markup characters.
pub fn extract_markdown(path: &Path) -> Result<Extraction, ExtractionError> {
    let source = read_lossy(path)?;
    Ok(Extraction::text(markdown_to_text(&source)))
}

pub fn markdown_to_text(source: &str) -> String {
    let mut text = String::with_capacity(source.len());
    for event in Parser::new(source) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak | Event::Rule => text.push('\n'),
            Event::End(
                Tag::Paragraph
                | Tag::Heading(..)
                | Tag::Item
                | Tag::CodeBlock(_)
                | Tag::BlockQuote
                | Tag::TableCell,
            ) => text.push('\n'),
            _ => {}
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::count_words;

    #[test]
    fn test_markdown_markup_is_not_counted() {
        let text = markdown_to_text("# Title\n\nSome **bold** and `code` here.\n\n- one\n- two\n");
        assert_eq!(count_words(&text), 8);
        assert!(!text.contains('#'));
        assert!(!text.contains('*'));
    }

    #[test]
    fn test_markdown_inline_markup_keeps_words_together() {
        let text = markdown_to_text("un**break**able");
        assert_eq!(count_words(&text), 1);
    }

    #[test]
    fn test_markdown_blocks_are_separated() {
        let text = markdown_to_text("# Heading\nparagraph");
        assert_eq!(count_words(&text), 2);
    }
}
