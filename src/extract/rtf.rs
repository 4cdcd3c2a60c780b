//! Minimal RTF to text conversion.
//!
//! Tracks group nesting so header destinations (font and colour tables,
//! stylesheets, pictures, embedded objects) are skipped and only body text is
//! kept. Formatting control words are dropped.

use super::{read_lossy, Extraction};
use crate::error::ExtractionError;
use std::path::Path;

/// Destinations whose content is not document text.
const SKIPPED_DESTINATIONS: [&str; 24] = [
    "fonttbl",
    "colortbl",
    "stylesheet",
    "info",
    "pict",
    "object",
    "header",
    "headerl",
    "headerr",
    "headerf",
    "footer",
    "footerl",
    "footerr",
    "footerf",
    "fldinst",
    "themedata",
    "colorschememapping",
    "datastore",
    "latentstyles",
    "listtable",
    "listoverridetable",
    "rsidtbl",
    "generator",
    "xmlnstbl",
];

pub fn extract(path: &Path) -> Result<Extraction, ExtractionError> {
    let source = read_lossy(path)?;
    Ok(Extraction::text(rtf_to_text(&source)))
}

#[derive(Debug, Clone, Copy)]
struct GroupState {
    skip: bool,
    /// Fallback characters following each `\uN`.
    unicode_skip: usize,
}

struct Writer {
    text: String,
    pending_fallback: usize,
}

impl Writer {
    fn emit(&mut self, group: &GroupState, c: char) {
        if self.pending_fallback > 0 {
            self.pending_fallback -= 1;
            return;
        }
        if !group.skip {
            self.text.push(c);
        }
    }

    fn emit_str(&mut self, group: &GroupState, s: &str) {
        for c in s.chars() {
            self.emit(group, c);
        }
    }
}

pub fn rtf_to_text(source: &str) -> String {
    let chars: Vec<char> = source.chars().collect();
    let mut stack = vec![GroupState {
        skip: false,
        unicode_skip: 1,
    }];
    let mut out = Writer {
        text: String::with_capacity(source.len() / 2),
        pending_fallback: 0,
    };

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '{' => {
                let top = *stack.last().unwrap_or(&GroupState {
                    skip: false,
                    unicode_skip: 1,
                });
                stack.push(top);
                out.pending_fallback = 0;
                i += 1;
            }
            '}' => {
                if stack.len() > 1 {
                    stack.pop();
                }
                out.pending_fallback = 0;
                i += 1;
            }
            '\\' => {
                i += 1;
                let Some(&next) = chars.get(i) else { break };
                let len = stack.len();
                let group = &mut stack[len - 1];

                if next.is_ascii_alphabetic() {
                    let start = i;
                    while i < chars.len() && chars[i].is_ascii_alphabetic() {
                        i += 1;
                    }
                    let word: String = chars[start..i].iter().collect();

                    let param_start = i;
                    if i < chars.len() && chars[i] == '-' {
                        i += 1;
                    }
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                    let param: Option<i32> = chars[param_start..i]
                        .iter()
                        .collect::<String>()
                        .parse()
                        .ok();
                    if i < chars.len() && chars[i] == ' ' {
                        i += 1;
                    }

                    apply_control_word(&word, param, group, &mut out);
                } else {
                    i += 1;
                    match next {
                        '\\' | '{' | '}' => out.emit(group, next),
                        '~' => out.emit(group, ' '),
                        '_' => out.emit(group, '-'),
                        '*' => group.skip = true,
                        '\n' | '\r' => out.emit(group, '\n'),
                        '\'' => {
                            let hex: String = chars.iter().skip(i).take(2).collect();
                            if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                                out.emit(group, char::from(byte));
                            }
                            i += hex.chars().count();
                        }
                        _ => {}
                    }
                }
            }
            '\r' | '\n' => i += 1,
            _ => {
                if let Some(group) = stack.last() {
                    out.emit(group, c);
                }
                i += 1;
            }
        }
    }
    out.text
}

fn apply_control_word(word: &str, param: Option<i32>, group: &mut GroupState, out: &mut Writer) {
    if SKIPPED_DESTINATIONS.contains(&word) {
        group.skip = true;
        return;
    }
    match word {
        "par" | "line" | "sect" | "page" | "row" => out.emit(group, '\n'),
        "tab" | "cell" => out.emit(group, '\t'),
        "emdash" => out.emit(group, '\u{2014}'),
        "endash" => out.emit(group, '\u{2013}'),
        "bullet" => out.emit(group, '\u{2022}'),
        "lquote" => out.emit(group, '\u{2018}'),
        "rquote" => out.emit(group, '\u{2019}'),
        "ldblquote" => out.emit(group, '\u{201c}'),
        "rdblquote" => out.emit(group, '\u{201d}'),
        "uc" => group.unicode_skip = param.unwrap_or(1).max(0) as usize,
        "u" => {
            if let Some(code) = param {
                let code = if code < 0 { code + 65536 } else { code };
                if let Some(ch) = char::from_u32(code as u32) {
                    out.emit_str(group, &ch.to_string());
                }
                out.pending_fallback = group.unicode_skip;
            }
        }
        _ => {}
    }
}
