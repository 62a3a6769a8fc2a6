//! Word-processor export, built straight from `ResumeContent` with no dependency on the view.
//!
//! # Layout
//! 1. Name: bold, 16pt
//! 2. Title: 12pt
//! 3. `email | phone`: 10pt
//! 4. Summary / Experience / Education / Skills: bold 12pt heading, then body paragraphs.
//!    Experience and Education get one paragraph per entry; Skills is a single paragraph
//!    joined with `", "`.
//!
//! # Package
//! A minimal WordprocessingML package: `[Content_Types].xml`, `_rels/.rels`,
//! `word/document.xml`, `docProps/core.xml`. Packing runs on `spawn_blocking`.

use std::io::{Cursor, Write};

use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::export::{ExportArtifact, ExportError, ExportFormat};
use crate::models::resume::{ResumeContent, SKILL_SEPARATOR};

/// Run sizes are in half-points, as WordprocessingML stores them.
const NAME_SIZE: u32 = 32;
const TITLE_SIZE: u32 = 24;
const CONTACT_SIZE: u32 = 20;
const HEADING_SIZE: u32 = 24;

const CONTACT_SEPARATOR: &str = " | ";

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#;

// ────────────────────────────────────────────────────────────────────────────
// Document model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    /// Half-points; `None` keeps the document default.
    pub size: Option<u32>,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        TextRun {
            text: text.into(),
            bold: false,
            size: None,
        }
    }

    pub fn sized(text: impl Into<String>, size: u32) -> Self {
        TextRun {
            size: Some(size),
            ..TextRun::plain(text)
        }
    }

    pub fn heading(text: impl Into<String>, size: u32) -> Self {
        TextRun {
            bold: true,
            ..TextRun::sized(text, size)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub runs: Vec<TextRun>,
}

impl Paragraph {
    fn of(run: TextRun) -> Self {
        Paragraph { runs: vec![run] }
    }
}

/// Builds the paragraph sequence for a resume.
pub fn assemble_document(content: &ResumeContent) -> Vec<Paragraph> {
    let mut paragraphs = vec![
        Paragraph::of(TextRun::heading(&content.name, NAME_SIZE)),
        Paragraph::of(TextRun::sized(&content.title, TITLE_SIZE)),
        Paragraph::of(TextRun::sized(
            format!("{}{CONTACT_SEPARATOR}{}", content.email, content.phone),
            CONTACT_SIZE,
        )),
    ];

    paragraphs.push(Paragraph::of(TextRun::heading("Summary", HEADING_SIZE)));
    paragraphs.push(Paragraph::of(TextRun::plain(&content.summary)));

    paragraphs.push(Paragraph::of(TextRun::heading("Experience", HEADING_SIZE)));
    paragraphs.extend(
        content
            .experience
            .iter()
            .map(|entry| Paragraph::of(TextRun::plain(entry))),
    );

    paragraphs.push(Paragraph::of(TextRun::heading("Education", HEADING_SIZE)));
    paragraphs.extend(
        content
            .education
            .iter()
            .map(|entry| Paragraph::of(TextRun::plain(entry))),
    );

    paragraphs.push(Paragraph::of(TextRun::heading("Skills", HEADING_SIZE)));
    paragraphs.push(Paragraph::of(TextRun::plain(
        content.skills.join(SKILL_SEPARATOR),
    )));

    paragraphs
}

// ────────────────────────────────────────────────────────────────────────────
// Packing
// ────────────────────────────────────────────────────────────────────────────

fn encoding(e: impl std::fmt::Display) -> ExportError {
    ExportError::Encoding(e.to_string())
}

fn write_document_xml(paragraphs: &[Paragraph]) -> Result<Vec<u8>, ExportError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(encoding)?;
    writer
        .write_event(Event::Start(
            BytesStart::new("w:document").with_attributes([("xmlns:w", W_NS)]),
        ))
        .map_err(encoding)?;
    writer
        .write_event(Event::Start(BytesStart::new("w:body")))
        .map_err(encoding)?;

    for paragraph in paragraphs {
        writer
            .write_event(Event::Start(BytesStart::new("w:p")))
            .map_err(encoding)?;
        for run in &paragraph.runs {
            write_run(&mut writer, run)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new("w:p")))
            .map_err(encoding)?;
    }

    writer
        .write_event(Event::Empty(BytesStart::new("w:sectPr")))
        .map_err(encoding)?;
    writer
        .write_event(Event::End(BytesEnd::new("w:body")))
        .map_err(encoding)?;
    writer
        .write_event(Event::End(BytesEnd::new("w:document")))
        .map_err(encoding)?;

    Ok(writer.into_inner().into_inner())
}

fn write_run(writer: &mut Writer<Cursor<Vec<u8>>>, run: &TextRun) -> Result<(), ExportError> {
    writer
        .write_event(Event::Start(BytesStart::new("w:r")))
        .map_err(encoding)?;

    if run.bold || run.size.is_some() {
        writer
            .write_event(Event::Start(BytesStart::new("w:rPr")))
            .map_err(encoding)?;
        if run.bold {
            writer
                .write_event(Event::Empty(BytesStart::new("w:b")))
                .map_err(encoding)?;
            writer
                .write_event(Event::Empty(BytesStart::new("w:bCs")))
                .map_err(encoding)?;
        }
        if let Some(size) = run.size {
            let size = size.to_string();
            for tag in ["w:sz", "w:szCs"] {
                writer
                    .write_event(Event::Empty(
                        BytesStart::new(tag).with_attributes([("w:val", size.as_str())]),
                    ))
                    .map_err(encoding)?;
            }
        }
        writer
            .write_event(Event::End(BytesEnd::new("w:rPr")))
            .map_err(encoding)?;
    }

    for piece in run_pieces(&run.text) {
        match piece {
            RunPiece::Text(text) => {
                writer
                    .write_event(Event::Start(
                        BytesStart::new("w:t").with_attributes([("xml:space", "preserve")]),
                    ))
                    .map_err(encoding)?;
                writer
                    .write_event(Event::Text(BytesText::new(&text)))
                    .map_err(encoding)?;
                writer
                    .write_event(Event::End(BytesEnd::new("w:t")))
                    .map_err(encoding)?;
            }
            RunPiece::Break => writer
                .write_event(Event::Empty(BytesStart::new("w:br")))
                .map_err(encoding)?,
            RunPiece::Tab => writer
                .write_event(Event::Empty(BytesStart::new("w:tab")))
                .map_err(encoding)?,
        }
    }

    writer
        .write_event(Event::End(BytesEnd::new("w:r")))
        .map_err(encoding)?;
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum RunPiece {
    Text(String),
    Break,
    Tab,
}

/// Splits run text into text, line breaks and tabs. Line feeds, carriage returns and
/// the vertical tab / form feed Word uses for manual breaks all become `<w:br/>`;
/// `\r\n` counts once. Any other character XML 1.0 cannot carry is dropped.
fn run_pieces(text: &str) -> Vec<RunPiece> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let piece = match c {
            '\r' if chars.peek() == Some(&'\n') => continue,
            '\n' | '\r' | '\u{0B}' | '\u{0C}' => RunPiece::Break,
            '\t' => RunPiece::Tab,
            c if is_xml_char(c) => {
                current.push(c);
                continue;
            }
            _ => continue,
        };
        if !current.is_empty() {
            pieces.push(RunPiece::Text(std::mem::take(&mut current)));
        }
        pieces.push(piece);
    }

    // Empty entries still get a `<w:t>` so the paragraph keeps its run.
    if !current.is_empty() || pieces.is_empty() {
        pieces.push(RunPiece::Text(current));
    }
    pieces
}

/// The XML 1.0 `Char` production.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

fn core_properties_xml(title: &str, created: DateTime<Utc>) -> String {
    let title: String = title.chars().filter(|&c| is_xml_char(c)).collect();
    let title = quick_xml::escape::escape(&title);
    let created = created.to_rfc3339_opts(SecondsFormat::Secs, true);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{title}</dc:title><dc:creator>{title}</dc:creator><dcterms:created xsi:type="dcterms:W3CDTF">{created}</dcterms:created></cp:coreProperties>"#
    )
}

/// Packs paragraphs into a `.docx` byte buffer.
pub fn pack_document(
    paragraphs: &[Paragraph],
    title: &str,
    created: DateTime<Utc>,
) -> Result<Vec<u8>, ExportError> {
    let document_xml = write_document_xml(paragraphs)?;
    let core_xml = core_properties_xml(title, created);

    let parts: [(&str, &[u8]); 4] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.as_bytes()),
        ("_rels/.rels", ROOT_RELS_XML.as_bytes()),
        ("word/document.xml", document_xml.as_slice()),
        ("docProps/core.xml", core_xml.as_bytes()),
    ];

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (path, data) in parts {
        zip.start_file(path, options).map_err(encoding)?;
        zip.write_all(data).map_err(encoding)?;
    }
    let cursor = zip.finish().map_err(encoding)?;
    Ok(cursor.into_inner())
}

/// Assembles and packs the document for a content snapshot.
pub async fn encode_document(content: ResumeContent) -> Result<ExportArtifact, ExportError> {
    let created = Utc::now();
    let name = content.name.clone();

    let bytes = tokio::task::spawn_blocking(move || {
        let paragraphs = assemble_document(&content);
        pack_document(&paragraphs, &content.name, created)
    })
    .await
    .map_err(|e| ExportError::Encoding(format!("packing task failed: {e}")))??;

    Ok(ExportArtifact::new(&name, ExportFormat::Docx, bytes))
}
