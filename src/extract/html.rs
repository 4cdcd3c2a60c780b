use super::{read_lossy, Extraction};
use crate::error::ExtractionError;
use once_cell::sync::Lazy;
use scraper::{Html, Node, Selector};
use std::path::Path;

static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").expect("valid selector"));

/// Elements whose text never reaches the reader.
const HIDDEN_ELEMENTS: [&str; 6] = ["script", "style", "noscript", "template", "head", "title"];

/// Elements that end a line of prose.
const BLOCK_ELEMENTS: [&str; 18] = [
    "p", "div", "br", "li", "h1", "h2", "h3", "h4", "h5", "h6", "tr", "td", "th", "blockquote",
    "pre", "section", "article", "hr",
];

pub fn extract(path: &Path) -> Result<Extraction, ExtractionError> {
    let source = read_lossy(path)?;
    Ok(Extraction::text(html_to_text(&source)))
}

/// Visible text of an HTML or XHTML document.
pub fn html_to_text(source: &str) -> String {
    let document = Html::parse_document(source);
    let root = document
        .select(&BODY)
        .next()
        .unwrap_or_else(|| document.root_element());

    let mut text = String::new();
    for node in root.descendants() {
        match node.value() {
            Node::Text(t) => {
                let hidden = node.ancestors().any(|ancestor| {
                    ancestor
                        .value()
                        .as_element()
                        .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
                });
                if !hidden {
                    text.push_str(t);
                }
            }
            Node::Element(el) if BLOCK_ELEMENTS.contains(&el.name()) => text.push('\n'),
            _ => {}
        }
    }
    text
}
