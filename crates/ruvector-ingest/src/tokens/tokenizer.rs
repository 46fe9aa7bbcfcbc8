//! HuggingFace tokenizer backends

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokenizers::Tokenizer;

use super::{HeuristicCounter, TokenCounter};
use crate::error::{Error, Result};

/// Load a tokenizer from a `tokenizer.json` file
pub fn load_tokenizer(path: &Path) -> Result<Tokenizer> {
    tracing::debug!("Loading tokenizer from {}", path.display());
    Tokenizer::from_file(path).map_err(|e| {
        Error::Tokenizer(format!("Failed to load tokenizer from {}: {}", path.display(), e))
    })
}

fn encode_len(tokenizer: &Tokenizer, text: &str) -> Option<usize> {
    match tokenizer.encode(text, false) {
        Ok(encoding) => Some(encoding.len()),
        Err(e) => {
            tracing::warn!("Tokenization failed, using length heuristic: {}", e);
            None
        }
    }
}

/// Counter sharing a single tokenizer inside the driving process
pub struct LocalTokenCounter {
    tokenizer: Option<Arc<Tokenizer>>,
    fallback: HeuristicCounter,
}

impl LocalTokenCounter {
    /// Wrap an already loaded tokenizer
    pub fn new(tokenizer: Option<Arc<Tokenizer>>, chars_per_token: usize) -> Self {
        Self {
            tokenizer,
            fallback: HeuristicCounter::new(chars_per_token),
        }
    }

    /// Load the tokenizer at `path`, falling back to the heuristic when there
    /// is no path or the file cannot be loaded
    pub fn from_path(path: Option<&Path>, chars_per_token: usize) -> Self {
        let tokenizer = path.and_then(|p| match load_tokenizer(p) {
            Ok(t) => Some(Arc::new(t)),
            Err(e) => {
                tracing::warn!("{}; falling back to length heuristic", e);
                None
            }
        });
        Self::new(tokenizer, chars_per_token)
    }

    /// Whether a real tokenizer is loaded
    pub fn has_tokenizer(&self) -> bool {
        self.tokenizer.is_some()
    }
}

impl TokenCounter for LocalTokenCounter {
    fn count(&self, text: &str) -> usize {
        self.tokenizer
            .as_deref()
            .and_then(|t| encode_len(t, text))
            .unwrap_or_else(|| self.fallback.count(text))
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

thread_local! {
    // One tokenizer per worker thread, keyed by path. `None` records a failed load.
    static WORKER_TOKENIZERS: RefCell<HashMap<PathBuf, Option<Tokenizer>>> =
        RefCell::new(HashMap::new());
}

fn with_worker_tokenizer<R>(path: &Path, f: impl FnOnce(Option<&Tokenizer>) -> R) -> R {
    WORKER_TOKENIZERS.with(|cell| {
        let mut tokenizers = cell.borrow_mut();
        let slot = tokenizers
            .entry(path.to_path_buf())
            .or_insert_with(|| match load_tokenizer(path) {
                Ok(t) => Some(t),
                Err(e) => {
                    tracing::warn!("{}; worker falls back to length heuristic", e);
                    None
                }
            });
        f(slot.as_ref())
    })
}

/// Load the tokenizer at `path` into the calling thread's slot.
///
/// Meant for pool start handlers so workers pay the load cost up front.
/// Returns whether a tokenizer is available on this thread.
pub fn initialize_worker_tokenizer(path: &Path) -> bool {
    with_worker_tokenizer(path, |t| t.is_some())
}

/// Counter that carries no tokenizer handle, only its path
#[derive(Debug, Clone)]
pub struct WorkerTokenCounter {
    tokenizer_path: Option<PathBuf>,
    fallback: HeuristicCounter,
}

impl WorkerTokenCounter {
    /// Create a worker counter
    pub fn new(tokenizer_path: Option<PathBuf>, chars_per_token: usize) -> Self {
        Self {
            tokenizer_path,
            fallback: HeuristicCounter::new(chars_per_token),
        }
    }

    /// Tokenizer path each worker loads
    pub fn tokenizer_path(&self) -> Option<&Path> {
        self.tokenizer_path.as_deref()
    }
}

impl TokenCounter for WorkerTokenCounter {
    fn count(&self, text: &str) -> usize {
        self.tokenizer_path
            .as_deref()
            .and_then(|path| with_worker_tokenizer(path, |t| t.and_then(|t| encode_len(t, text))))
            .unwrap_or_else(|| self.fallback.count(text))
    }

    fn name(&self) -> &'static str {
        "worker"
    }
}
