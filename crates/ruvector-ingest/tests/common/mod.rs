//! Fixtures shared by the integration tests
#![allow(dead_code)]

use std::io::{Cursor, Read, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;

/// Vocabulary of the word-level tokenizer written by [`write_word_level_tokenizer`]
pub const VOCAB: &[&str] = &["[UNK]", "hello", "world", "quarterly", "revenue"];

/// Write a minimal word-level `tokenizer.json`: whitespace split, one id per
/// known word, everything else maps to `[UNK]`.
pub fn write_word_level_tokenizer(path: &Path) {
    let vocab: Vec<String> = VOCAB
        .iter()
        .enumerate()
        .map(|(id, word)| format!(r#""{}": {}"#, word, id))
        .collect();
    let json = format!(
        r#"{{
  "version": "1.0",
  "truncation": null,
  "padding": null,
  "added_tokens": [],
  "normalizer": null,
  "pre_tokenizer": {{ "type": "Whitespace" }},
  "post_processor": null,
  "decoder": null,
  "model": {{ "type": "WordLevel", "vocab": {{ {} }}, "unk_token": "[UNK]" }}
}}"#,
        vocab.join(", ")
    );
    std::fs::write(path, json).unwrap();
}

/// Write a DOCX whose `word/styles.xml` has every `w:` attribute removed.
///
/// The archive and XML stay well-formed, but the style reader finds none
/// of the attributes it expects.
pub fn write_docx_without_style_attributes(path: &Path) {
    use docx_rs::{Docx, Paragraph, Run};

    let mut packed = Cursor::new(Vec::new());
    Docx::new()
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Styled body")))
        .build()
        .pack(&mut packed)
        .unwrap();

    let attribute = regex::Regex::new(r#"\s+w:[A-Za-z]+="[^"]*""#).unwrap();
    let mut source = zip::ZipArchive::new(Cursor::new(packed.into_inner())).unwrap();
    let mut target = zip::ZipWriter::new(std::fs::File::create(path).unwrap());

    for i in 0..source.len() {
        let mut entry = source.by_index(i).unwrap();
        let name = entry.name().to_string();
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents).unwrap();

        if name == "word/styles.xml" {
            let xml = String::from_utf8(contents).unwrap();
            contents = attribute.replace_all(&xml, "").into_owned().into_bytes();
        }

        target.start_file(name, SimpleFileOptions::default()).unwrap();
        target.write_all(&contents).unwrap();
    }
    target.finish().unwrap();
}
