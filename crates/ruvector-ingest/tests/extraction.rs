//! End-to-end extraction over synthesized documents

mod common;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use ruvector_ingest::config::TokenizerConfig;
use ruvector_ingest::{
    extract_for_worker, extract_local, Error, ExtractionPipeline, FileReference, HeuristicCounter,
    TokenCounter,
};
use zip::write::SimpleFileOptions;

fn pipeline() -> ExtractionPipeline {
    ExtractionPipeline::new(Arc::new(HeuristicCounter::default()))
}

fn file_ref(path: &Path) -> FileReference {
    FileReference::new(path, path.file_name().unwrap(), Utc::now())
}

fn write_zip(path: &Path, entries: &[(&str, String)]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    for (name, contents) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(contents.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

fn slide_xml(lines: &[&str]) -> String {
    let paragraphs: String = lines
        .iter()
        .map(|l| format!("<a:p><a:r><a:t>{}</a:t></a:r></a:p>", l))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:sp><p:txBody>{}</p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#,
        paragraphs
    )
}

fn write_pptx(path: &Path) {
    // Stored out of order on purpose: slide10 must sort after slide2
    write_zip(
        path,
        &[
            ("ppt/slides/slide10.xml", slide_xml(&["Appendix"])),
            ("ppt/slides/slide1.xml", slide_xml(&["Roadmap 2025", "Agenda"])),
            ("ppt/slides/slide2.xml", slide_xml(&["Milestones"])),
            ("ppt/slides/_rels/slide1.xml.rels", "<Relationships/>".to_string()),
        ],
    );
}

fn sheet_xml(rows: &[&[&str]]) -> String {
    let body: String = rows
        .iter()
        .enumerate()
        .map(|(r, cells)| {
            let cells: String = cells
                .iter()
                .enumerate()
                .map(|(c, value)| {
                    let col = (b'A' + c as u8) as char;
                    format!(r#"<c r="{}{}" t="inlineStr"><is><t>{}</t></is></c>"#, col, r + 1, value)
                })
                .collect();
            format!(r#"<row r="{}">{}</row>"#, r + 1, cells)
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
        body
    )
}

fn write_xlsx(path: &Path) {
    let content_types = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/worksheets/sheet2.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;
    let root_rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;
    let workbook = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Revenue" sheetId="1" r:id="rId1"/><sheet name="Costs" sheetId="2" r:id="rId2"/></sheets></workbook>"#;
    let workbook_rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/></Relationships>"#;

    write_zip(
        path,
        &[
            ("[Content_Types].xml", content_types.to_string()),
            ("_rels/.rels", root_rels.to_string()),
            ("xl/workbook.xml", workbook.to_string()),
            ("xl/_rels/workbook.xml.rels", workbook_rels.to_string()),
            ("xl/worksheets/sheet1.xml", sheet_xml(&[&["Region", "Total"], &["EMEA", "120"]])),
            ("xl/worksheets/sheet2.xml", sheet_xml(&[&["Item", "Cost"], &["Cloud", "45"]])),
        ],
    );
}

fn write_docx(path: &Path) {
    use docx_rs::{Docx, Paragraph, Run, Table, TableCell, TableRow};

    let cell = |text: &str| TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text(text)));
    let file = std::fs::File::create(path).unwrap();
    Docx::new()
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Meeting notes")))
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Budget approved")))
        .add_table(Table::new(vec![TableRow::new(vec![cell("Owner"), cell("Due")])]))
        .build()
        .pack(file)
        .unwrap();
}

fn temp_file(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

#[test]
fn plain_text_yields_one_unit() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_file(&dir, "hello.txt");
    std::fs::write(&path, "hello world").unwrap();

    let pipeline = pipeline();
    let units = pipeline.extract(&file_ref(&path));

    assert_eq!(units.len(), 1);
    assert_eq!(units[0].content, "hello world");
    assert_eq!(units[0].tokens, pipeline.counter().count("hello world"));
}

#[test]
fn presentation_merges_slides_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_file(&dir, "deck.pptx");
    write_pptx(&path);

    let units = pipeline().extract(&file_ref(&path));

    assert_eq!(units.len(), 1);
    assert_eq!(units[0].label, format!("##File: {}", path.display()));
    assert_eq!(
        units[0].content,
        "#slide1\nRoadmap 2025\nAgenda\n\n#slide2\nMilestones\n\n#slide10\nAppendix\n\n"
    );
    assert_eq!(units[0].content.matches("#slide").count(), 3);
}

#[test]
fn spreadsheet_yields_one_unit_per_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_file(&dir, "budget.xlsx");
    write_xlsx(&path);

    let units = pipeline().extract(&file_ref(&path));

    let labels: Vec<String> = units.iter().map(|u| u.label.clone()).collect();
    assert_eq!(
        labels,
        vec![
            format!("##File: {}#Revenue", path.display()),
            format!("##File: {}#Costs", path.display()),
        ]
    );
    assert_eq!(units[0].content, "Region | Total\nEMEA | 120\n");
    assert_eq!(units[1].content, "Item | Cost\nCloud | 45\n");
}

#[test]
fn docx_paragraphs_and_tables() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_file(&dir, "notes.docx");
    write_docx(&path);

    let units = pipeline().extract(&file_ref(&path));

    assert_eq!(units.len(), 1);
    let content = &units[0].content;
    assert!(content.contains("Meeting notes\n"));
    assert!(content.contains("Budget approved\n"));
    assert!(content.contains("Owner | Due"));
    assert!(content.find("Meeting notes") < content.find("Budget approved"));
}

#[test]
fn unreadable_file_yields_nothing() {
    let dir = tempfile::tempdir().unwrap();
    // A directory cannot be read as a file
    let path = temp_file(&dir, "folder.txt");
    std::fs::create_dir(&path).unwrap();
    let file = file_ref(&path);

    assert!(extract_local(&file).is_empty());
    assert!(extract_for_worker(&file).is_empty());
    assert!(pipeline().try_extract(&file).is_err());
}

#[test]
fn extraction_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let txt = temp_file(&dir, "a.txt");
    std::fs::write(&txt, "same bytes, same units").unwrap();
    let deck = temp_file(&dir, "b.pptx");
    write_pptx(&deck);

    for path in [&txt, &deck] {
        let file = file_ref(path);
        assert_eq!(extract_local(&file), extract_local(&file));
        assert_eq!(extract_for_worker(&file), extract_for_worker(&file));
    }
}

#[test]
fn local_and_worker_entry_points_agree_without_tokenizer() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_file(&dir, "readme.md");
    std::fs::write(&path, "# Ingest\n\nToken counts should match.").unwrap();

    let file = file_ref(&path);
    let local = extract_local(&file);
    let worker = extract_for_worker(&file);

    assert_eq!(local.len(), 1);
    assert_eq!(local, worker);
}

#[test]
fn docx_hyperlink_text_is_kept() {
    use docx_rs::{Docx, Hyperlink, HyperlinkType, Paragraph, Run};

    let dir = tempfile::tempdir().unwrap();
    let path = temp_file(&dir, "linked.docx");
    Docx::new()
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text("See "))
                .add_hyperlink(
                    Hyperlink::new("https://example.com/handbook", HyperlinkType::External)
                        .add_run(Run::new().add_text("the handbook")),
                )
                .add_run(Run::new().add_text(" for details")),
        )
        .build()
        .pack(std::fs::File::create(&path).unwrap())
        .unwrap();

    let units = pipeline().extract(&file_ref(&path));

    assert_eq!(units.len(), 1);
    assert_eq!(units[0].content, "See the handbook for details\n");
}

#[test]
fn docx_that_crashes_the_reader_yields_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_file(&dir, "stripped.docx");
    common::write_docx_without_style_attributes(&path);
    let file = file_ref(&path);

    assert!(pipeline().extract(&file).is_empty());
    assert!(extract_local(&file).is_empty());
    assert!(extract_for_worker(&file).is_empty());
    assert!(matches!(
        pipeline().try_extract(&file),
        Err(Error::Library { ref format, .. }) if format == "DOCX"
    ));
}

#[test]
fn local_and_worker_agree_with_a_loaded_tokenizer() {
    let dir = tempfile::tempdir().unwrap();
    let tokenizer_path = temp_file(&dir, "tokenizer.json");
    common::write_word_level_tokenizer(&tokenizer_path);
    let path = temp_file(&dir, "report.txt");
    std::fs::write(&path, "hello world quarterly revenue internationalization").unwrap();

    let config = TokenizerConfig {
        path: Some(tokenizer_path),
        ..TokenizerConfig::default()
    };
    let file = file_ref(&path);
    let local = ExtractionPipeline::local(&config).extract(&file);
    // Worker counters load their tokenizer per thread
    let worker = std::thread::spawn({
        let config = config.clone();
        let file = file.clone();
        move || ExtractionPipeline::for_worker(&config).extract(&file)
    })
    .join()
    .unwrap();

    assert_eq!(local.len(), 1);
    assert_eq!(local[0].tokens, 5);
    assert_eq!(local, worker);
    assert_ne!(local[0].tokens, pipeline().counter().count(&local[0].content));
}
