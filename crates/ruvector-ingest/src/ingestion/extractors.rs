//! Multi-format text extractors
//!
//! PDF, DOCX and plain text are decoded from an in-memory byte buffer.
//! Spreadsheets and presentations are opened through their path by the
//! structured-document readers.

use calamine::Reader;
use quick_xml::events::Event;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// A `(label, text)` pair: one sheet of a workbook or one slide of a deck
pub type Section = (String, String);

/// Multi-format text extractor
pub struct FileExtractor;

impl FileExtractor {
    /// Extract text from PDF bytes
    pub fn extract_pdf(data: &[u8]) -> Result<String> {
        guard_panics("PDF", || {
            pdf_extract::extract_text_from_mem(data).map_err(|e| Error::library("PDF", e.to_string()))
        })
    }

    /// Extract text from DOCX bytes, one line per paragraph
    pub fn extract_docx(data: &[u8]) -> Result<String> {
        let doc = guard_panics("DOCX", || {
            docx_rs::read_docx(data).map_err(|e| Error::library("DOCX", e.to_string()))
        })?;

        let mut content = String::new();
        for child in &doc.document.children {
            match child {
                docx_rs::DocumentChild::Paragraph(p) => {
                    content.push_str(&paragraph_text(p));
                    content.push('\n');
                }
                docx_rs::DocumentChild::Table(table) => {
                    content.push_str(&table_text(table));
                }
                _ => {}
            }
        }

        Ok(content)
    }

    /// Extract one section per sheet, in workbook order
    pub fn extract_spreadsheet(path: &Path) -> Result<Vec<Section>> {
        let mut workbook = guard_panics("Spreadsheet", || {
            calamine::open_workbook_auto(path).map_err(|e| Error::library("Spreadsheet", e.to_string()))
        })?;

        let mut sheets = Vec::new();
        for sheet_name in workbook.sheet_names().to_vec() {
            let range = guard_panics("Spreadsheet", || {
                workbook
                    .worksheet_range(&sheet_name)
                    .map_err(|e| Error::library("Spreadsheet", format!("sheet '{}': {}", sheet_name, e)))
            })?;

            let mut sheet_content = String::new();
            for row in range.rows() {
                let row_text: Vec<String> = row.iter().map(cell_text).collect();

                if !row_text.iter().all(|s| s.is_empty()) {
                    sheet_content.push_str(&row_text.join(" | "));
                    sheet_content.push('\n');
                }
            }

            sheets.push((sheet_name, sheet_content));
        }

        Ok(sheets)
    }

    /// Extract one section per slide, ordered by slide number
    pub fn extract_presentation(path: &Path) -> Result<Vec<Section>> {
        let file = std::fs::File::open(path)?;
        let mut archive =
            zip::ZipArchive::new(file).map_err(|e| Error::library("Presentation", e.to_string()))?;

        // ppt/slides/slide1.xml, slide2.xml, ...
        let mut slide_names: Vec<(u32, String)> = archive
            .file_names()
            .filter_map(|name| {
                let number = name
                    .strip_prefix("ppt/slides/slide")?
                    .strip_suffix(".xml")?
                    .parse::<u32>()
                    .ok()?;
                Some((number, name.to_string()))
            })
            .collect();
        slide_names.sort_by_key(|(number, _)| *number);

        let mut slides = Vec::with_capacity(slide_names.len());
        for (number, name) in slide_names {
            let mut xml = String::new();
            archive
                .by_name(&name)
                .map_err(|e| Error::library("Presentation", e.to_string()))?
                .read_to_string(&mut xml)?;

            let text = slide_xml_text(&xml)
                .map_err(|e| Error::library("Presentation", format!("{}: {}", name, e)))?;
            slides.push((format!("slide{}", number), text));
        }

        Ok(slides)
    }

    /// Decode plain text as strict UTF-8
    pub fn extract_text(path: &Path, data: Vec<u8>) -> Result<String> {
        String::from_utf8(data).map_err(|e| Error::decode(path.display().to_string(), e.to_string()))
    }
}

/// Run a parser call, turning a panic inside the library into a
/// [`Error::Library`] for this file.
///
/// Several parsers index into the document tree without checking it and
/// panic on malformed input.
fn guard_panics<T>(format: &str, parse: impl FnOnce() -> Result<T>) -> Result<T> {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(parse)).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(Error::library(format, format!("parser panicked: {}", message)))
    })
}

/// Merge slide sections into one body with a `#<label>` header per slide
pub fn merge_slides(slides: &[Section]) -> String {
    slides
        .iter()
        .map(|(label, text)| format!("#{}\n{}\n\n", label, text))
        .collect()
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut text = String::new();
    push_paragraph_children(&paragraph.children, &mut text);
    text
}

// Hyperlinks and tracked insertions wrap ordinary runs
fn push_paragraph_children(children: &[docx_rs::ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            docx_rs::ParagraphChild::Run(run) => push_run_text(run, text),
            docx_rs::ParagraphChild::Hyperlink(link) => push_paragraph_children(&link.children, text),
            docx_rs::ParagraphChild::Insert(insert) => {
                for insert_child in &insert.children {
                    if let docx_rs::InsertChild::Run(run) = insert_child {
                        push_run_text(run, text);
                    }
                }
            }
            _ => {}
        }
    }
}

fn push_run_text(run: &docx_rs::Run, text: &mut String) {
    for run_child in &run.children {
        match run_child {
            docx_rs::RunChild::Text(t) => text.push_str(&t.text),
            docx_rs::RunChild::Tab(_) => text.push('\t'),
            docx_rs::RunChild::Break(_) => text.push('\n'),
            _ => {}
        }
    }
}

fn table_text(table: &docx_rs::Table) -> String {
    let mut text = String::new();
    for row in &table.rows {
        #[allow(irrefutable_let_patterns)]
        let docx_rs::TableChild::TableRow(row) = row else {
            continue;
        };
        let mut cells = Vec::with_capacity(row.cells.len());
        for cell in &row.cells {
            #[allow(irrefutable_let_patterns)]
            let docx_rs::TableRowChild::TableCell(cell) = cell else {
                continue;
            };
            let parts: Vec<String> = cell
                .children
                .iter()
                .filter_map(|content| match content {
                    docx_rs::TableCellContent::Paragraph(p) => Some(paragraph_text(p)),
                    _ => None,
                })
                .collect();
            cells.push(parts.join(" "));
        }
        text.push_str(&cells.join(" | "));
        text.push('\n');
    }
    text
}

fn cell_text(cell: &calamine::Data) -> String {
    match cell {
        calamine::Data::Empty => String::new(),
        calamine::Data::String(s) => s.clone(),
        calamine::Data::Float(f) => f.to_string(),
        calamine::Data::Int(i) => i.to_string(),
        calamine::Data::Bool(b) => b.to_string(),
        calamine::Data::DateTime(dt) => dt.to_string(),
        calamine::Data::DateTimeIso(s) | calamine::Data::DurationIso(s) => s.clone(),
        _ => String::new(),
    }
}

/// Text of `<a:t>` runs, one line per `<a:p>` paragraph
fn slide_xml_text(xml: &str) -> std::result::Result<String, quick_xml::Error> {
    let mut reader = quick_xml::Reader::from_str(xml);

    let mut lines = Vec::new();
    let mut paragraph = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text = true,
            Event::Text(e) if in_text => paragraph.push_str(&e.unescape()?),
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    let line = paragraph.trim();
                    if !line.is_empty() {
                        lines.push(line.to_string());
                    }
                    paragraph.clear();
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(lines.join("\n"))
}
