//! ruvector-ingest: multi-format document text extraction for RAG ingestion
//!
//! Turns files (PDF, DOCX, XLSX/XLS, PPTX, plain text) into token-counted
//! [`TextUnit`]s with provenance labels used for citations. Extraction never
//! fails loudly: a file that cannot be read yields no units and an error log.
//!
//! ```no_run
//! use ruvector_ingest::{DirectoryWalker, ExtractionPipeline, IngestConfig};
//!
//! # fn main() -> ruvector_ingest::Result<()> {
//! let config = IngestConfig::default();
//! let files = DirectoryWalker::from_config("./docs", &config.discovery)?.walk()?;
//! let pipeline = ExtractionPipeline::local(&config.tokenizer);
//! for file in &files {
//!     for unit in pipeline.extract(file) {
//!         println!("{} ({} tokens)", unit.label, unit.tokens);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod ingestion;
pub mod processing;
pub mod retrieval;
pub mod tokens;
pub mod types;

pub use config::IngestConfig;
pub use discovery::DirectoryWalker;
pub use error::{Error, Result};
pub use ingestion::{extract_for_worker, extract_local, ExtractionPipeline};
pub use processing::BatchExtractor;
pub use retrieval::DocumentPacker;
pub use tokens::{HeuristicCounter, LocalTokenCounter, TokenCounter, WorkerTokenCounter};
pub use types::{DocumentFormat, FileReference, TextUnit};
