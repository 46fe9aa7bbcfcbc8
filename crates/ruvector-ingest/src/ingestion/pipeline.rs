//! Per-file extraction pipeline: sniff, extract, count, assemble

use std::sync::Arc;
use std::time::Instant;

use super::extractors::{merge_slides, FileExtractor, Section};
use crate::config::TokenizerConfig;
use crate::error::Result;
use crate::tokens::{self, LocalTokenCounter, TokenCounter, WorkerTokenCounter};
use crate::types::{file_label, sheet_label, DocumentFormat, FileReference, TextUnit};

/// Raw extractor output before token counting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    /// A single text body (PDF, DOCX, plain text, merged slides)
    Single(String),
    /// One body per section, kept separate (spreadsheet sheets)
    Sections(Vec<Section>),
}

/// Run the extractor matching `format` on the file at `file.path`
pub fn extract_raw(file: &FileReference, format: DocumentFormat) -> Result<Extracted> {
    let path = file.path.as_path();
    let extracted = match format {
        DocumentFormat::Pdf => Extracted::Single(FileExtractor::extract_pdf(&std::fs::read(path)?)?),
        DocumentFormat::Docx => Extracted::Single(FileExtractor::extract_docx(&std::fs::read(path)?)?),
        DocumentFormat::Spreadsheet => Extracted::Sections(FileExtractor::extract_spreadsheet(path)?),
        DocumentFormat::Presentation => {
            Extracted::Single(merge_slides(&FileExtractor::extract_presentation(path)?))
        }
        DocumentFormat::PlainText => Extracted::Single(FileExtractor::extract_text(path, std::fs::read(path)?)?),
    };
    Ok(extracted)
}

/// Extraction pipeline bound to one token counting strategy
#[derive(Clone)]
pub struct ExtractionPipeline {
    counter: Arc<dyn TokenCounter>,
}

impl ExtractionPipeline {
    /// Create a pipeline with an explicit counter
    pub fn new(counter: Arc<dyn TokenCounter>) -> Self {
        Self { counter }
    }

    /// Pipeline for the driving process: one tokenizer loaded and shared
    pub fn local(config: &TokenizerConfig) -> Self {
        Self::new(Arc::new(LocalTokenCounter::from_path(
            config.path.as_deref(),
            config.chars_per_token,
        )))
    }

    /// Pipeline for pool workers: each worker thread loads its own tokenizer
    pub fn for_worker(config: &TokenizerConfig) -> Self {
        Self::new(Arc::new(WorkerTokenCounter::new(
            config.path.clone(),
            config.chars_per_token,
        )))
    }

    /// The counter this pipeline uses
    pub fn counter(&self) -> &dyn TokenCounter {
        self.counter.as_ref()
    }

    /// Extract the units of one file, propagating any failure
    pub fn try_extract(&self, file: &FileReference) -> Result<Vec<TextUnit>> {
        let format = file.format();
        tracing::debug!("Extracting {} as {}", file.path.display(), format);

        let units = match extract_raw(file, format)? {
            Extracted::Single(content) => {
                vec![TextUnit::assemble(file_label(&file.path), content, self.counter())]
            }
            Extracted::Sections(sections) => sections
                .into_iter()
                .map(|(name, content)| {
                    TextUnit::assemble(sheet_label(&file.path, &name), content, self.counter())
                })
                .collect(),
        };

        Ok(units)
    }

    /// Extract the units of one file.
    ///
    /// Any failure is logged with the file path and yields an empty result;
    /// a file never produces a partial list of units.
    pub fn extract(&self, file: &FileReference) -> Vec<TextUnit> {
        let start_time = Instant::now();

        match self.try_extract(file) {
            Ok(units) => {
                tracing::info!(
                    "Load file {} in {:.3}s ({} units, {} counter)",
                    file.path.display(),
                    start_time.elapsed().as_secs_f64(),
                    units.len(),
                    self.counter.name()
                );
                units
            }
            Err(e) => {
                tracing::error!("Error processing file {}: {}", file.path.display(), e);
                Vec::new()
            }
        }
    }
}

impl std::fmt::Debug for ExtractionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionPipeline")
            .field("counter", &self.counter.name())
            .finish()
    }
}

/// Extract a file in the driving process with the process-wide local counter
pub fn extract_local(file: &FileReference) -> Vec<TextUnit> {
    ExtractionPipeline::new(tokens::local_counter()).extract(file)
}

/// Extract a file from a pool worker with the process-wide worker counter
pub fn extract_for_worker(file: &FileReference) -> Vec<TextUnit> {
    ExtractionPipeline::new(tokens::worker_counter()).extract(file)
}
