//! Document ingestion pipeline with multi-format extraction

mod extractors;
mod pipeline;

pub use extractors::{merge_slides, FileExtractor, Section};
pub use pipeline::{extract_for_worker, extract_local, extract_raw, Extracted, ExtractionPipeline};
