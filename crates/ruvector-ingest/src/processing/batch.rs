//! Parallel extraction of many files

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::config::{ProcessingConfig, TokenizerConfig};
use crate::error::{Error, Result};
use crate::ingestion::ExtractionPipeline;
use crate::tokens::initialize_worker_tokenizer;
use crate::types::{FileReference, TextUnit};

/// Runs the worker pipeline over a batch of files on a dedicated pool
pub struct BatchExtractor {
    pool: ThreadPool,
    pipeline: ExtractionPipeline,
    workers: usize,
}

impl BatchExtractor {
    /// Create a batch extractor.
    ///
    /// Each pool thread loads its tokenizer as it starts.
    pub fn new(processing: &ProcessingConfig, tokenizer: &TokenizerConfig) -> Result<Self> {
        let workers = processing.worker_count();
        let tokenizer_path = tokenizer.path.clone();

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("ingest-worker-{}", i))
            .start_handler(move |_| {
                if let Some(path) = &tokenizer_path {
                    initialize_worker_tokenizer(path);
                }
            })
            .build()
            .map_err(|e| Error::config(format!("Failed to build worker pool: {}", e)))?;

        tracing::info!(
            "Batch extractor configured: {} parallel files, tokenizer: {}",
            workers,
            tokenizer
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "length heuristic".to_string())
        );

        Ok(Self {
            pool,
            pipeline: ExtractionPipeline::for_worker(tokenizer),
            workers,
        })
    }

    /// Number of worker threads
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Extract every file, returning results in input order.
    ///
    /// A file that fails contributes an empty unit list.
    pub fn run(&self, files: &[FileReference]) -> Vec<(FileReference, Vec<TextUnit>)> {
        let start_time = std::time::Instant::now();

        let results: Vec<(FileReference, Vec<TextUnit>)> = self.pool.install(|| {
            files
                .par_iter()
                .map(|file| (file.clone(), self.pipeline.extract(file)))
                .collect()
        });

        let empty = results.iter().filter(|(_, units)| units.is_empty()).count();
        tracing::info!(
            "Extracted {} files in {:.1}s ({} produced no units)",
            files.len(),
            start_time.elapsed().as_secs_f64(),
            empty
        );

        results
    }
}
