//! Zipped XML documents: Word `.docx` and OpenDocument `.odt`.

use super::Extraction;
use crate::error::ExtractionError;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use tracing::debug;
use xml::reader::{EventReader, XmlEvent};
use zip::result::ZipError;
use zip::ZipArchive;

const DOCX_BODY: &str = "word/document.xml";
const DOCX_APP_PROPS: &str = "docProps/app.xml";
const ODT_CONTENT: &str = "content.xml";
const ODT_META: &str = "meta.xml";

pub fn extract_docx(path: &Path) -> Result<Extraction, ExtractionError> {
    let mut archive = ZipArchive::new(File::open(path)?)?;
    let body = read_part(&mut archive, DOCX_BODY)?;
    let text = docx_text(body.as_bytes())?;

    let pages = match read_part(&mut archive, DOCX_APP_PROPS) {
        Ok(props) => docx_page_count(props.as_bytes()),
        Err(e) => {
            debug!("No page count in {}: {}", path.display(), e);
            None
        }
    };
    Ok(Extraction::with_pages(text, pages))
}

pub fn extract_odt(path: &Path) -> Result<Extraction, ExtractionError> {
    let mut archive = ZipArchive::new(File::open(path)?)?;
    let content = read_part(&mut archive, ODT_CONTENT)?;
    let text = odt_text(content.as_bytes())?;

    let pages = match read_part(&mut archive, ODT_META) {
        Ok(meta) => odt_page_count(meta.as_bytes()),
        Err(e) => {
            debug!("No page count in {}: {}", path.display(), e);
            None
        }
    };
    Ok(Extraction::with_pages(text, pages))
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &'static str,
) -> Result<String, ExtractionError> {
    let mut part = archive.by_name(name).map_err(|e| match e {
        ZipError::FileNotFound => ExtractionError::MissingPart(name),
        other => ExtractionError::Zip(other),
    })?;
    let mut content = String::new();
    part.read_to_string(&mut content)?;
    Ok(content)
}

/// Text of `<w:t>` runs, with tabs, breaks and paragraph ends as whitespace.
pub fn docx_text(xml: impl Read) -> Result<String, ExtractionError> {
    let mut text = String::new();
    let mut in_run_text = false;

    for event in EventReader::new(xml) {
        match event? {
            XmlEvent::StartElement { name, .. } => match name.local_name.as_str() {
                "t" => in_run_text = true,
                "tab" => text.push('\t'),
                "br" | "cr" => text.push('\n'),
                _ => {}
            },
            XmlEvent::EndElement { name } => match name.local_name.as_str() {
                "t" => in_run_text = false,
                "p" => text.push('\n'),
                _ => {}
            },
            XmlEvent::Characters(s) | XmlEvent::Whitespace(s) if in_run_text => {
                text.push_str(&s)
            }
            _ => {}
        }
    }
    Ok(text)
}

/// Text under `<office:body>`, honouring `<text:s text:c="n"/>` space runs.
pub fn odt_text(xml: impl Read) -> Result<String, ExtractionError> {
    let mut text = String::new();
    let mut in_body = false;

    for event in EventReader::new(xml) {
        match event? {
            XmlEvent::StartElement {
                name, attributes, ..
            } => match name.local_name.as_str() {
                "body" => in_body = true,
                "s" if in_body => {
                    let count = attributes
                        .iter()
                        .find(|attr| attr.name.local_name == "c")
                        .and_then(|attr| attr.value.parse::<usize>().ok())
                        .unwrap_or(1);
                    text.push_str(&" ".repeat(count));
                }
                "tab" if in_body => text.push('\t'),
                "line-break" if in_body => text.push('\n'),
                _ => {}
            },
            XmlEvent::EndElement { name } => match name.local_name.as_str() {
                "body" => in_body = false,
                "p" | "h" => text.push('\n'),
                _ => {}
            },
            XmlEvent::Characters(s) | XmlEvent::Whitespace(s) if in_body => text.push_str(&s),
            _ => {}
        }
    }
    Ok(text)
}

/// `<Pages>` from the extended properties part, when Word recorded it.
fn docx_page_count(xml: impl Read) -> Option<u64> {
    let mut in_pages = false;
    for event in EventReader::new(xml) {
        match event.ok()? {
            XmlEvent::StartElement { name, .. } => in_pages = name.local_name == "Pages",
            XmlEvent::Characters(s) if in_pages => {
                return s.trim().parse::<u64>().ok().filter(|pages| *pages > 0)
            }
            XmlEvent::EndElement { .. } => in_pages = false,
            _ => {}
        }
    }
    None
}

/// `meta:page-count` on `<meta:document-statistic>`.
fn odt_page_count(xml: impl Read) -> Option<u64> {
    for event in EventReader::new(xml) {
        if let XmlEvent::StartElement {
            name, attributes, ..
        } = event.ok()?
        {
            if name.local_name == "document-statistic" {
                return attributes
                    .iter()
                    .find(|attr| attr.name.local_name == "page-count")
                    .and_then(|attr| attr.value.parse::<u64>().ok())
                    .filter(|pages| *pages > 0);
            }
        }
    }
    None
}
