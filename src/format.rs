use std::path::Path;

/// Document formats the tool knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedFormat {
    Pdf,
    Txt,
    Md,
    Docx,
    Rtf,
    Epub,
    Html,
    Odt,
}

impl SupportedFormat {
    pub const ALL: [SupportedFormat; 8] = [
        SupportedFormat::Pdf,
        SupportedFormat::Txt,
        SupportedFormat::Md,
        SupportedFormat::Docx,
        SupportedFormat::Rtf,
        SupportedFormat::Epub,
        SupportedFormat::Html,
        SupportedFormat::Odt,
    ];

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(SupportedFormat::Pdf),
            "txt" => Some(SupportedFormat::Txt),
            "md" | "markdown" => Some(SupportedFormat::Md),
            "docx" => Some(SupportedFormat::Docx),
            "rtf" => Some(SupportedFormat::Rtf),
            "epub" => Some(SupportedFormat::Epub),
            "html" | "htm" => Some(SupportedFormat::Html),
            "odt" => Some(SupportedFormat::Odt),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            SupportedFormat::Pdf => "pdf",
            SupportedFormat::Txt => "txt",
            SupportedFormat::Md => "md",
            SupportedFormat::Docx => "docx",
            SupportedFormat::Rtf => "rtf",
            SupportedFormat::Epub => "epub",
            SupportedFormat::Html => "html",
            SupportedFormat::Odt => "odt",
        }
    }

    /// Comma-separated list for error messages and `--help`.
    pub fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|format| format.extension())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Report label for a file: its own extension, uppercased, without the dot.
pub fn format_label(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_uppercase())
        .unwrap_or_default()
}
