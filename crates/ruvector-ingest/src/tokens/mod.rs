//! Token counting backends
//!
//! Every backend implements [`TokenCounter`], a total and deterministic
//! `text -> usize` function. Two tokenizer-backed variants exist because a
//! loaded tokenizer is a handle owned by the thread that loaded it in the
//! worker pool:
//!
//! - [`LocalTokenCounter`] loads one tokenizer and shares it in the driving
//!   process.
//! - [`WorkerTokenCounter`] only carries the tokenizer path; each worker
//!   thread loads its own copy on first use.
//!
//! Both fall back to [`HeuristicCounter`] when no tokenizer is available.

mod tokenizer;

use once_cell::sync::{Lazy, OnceCell};
use std::sync::Arc;

use crate::config::TokenizerConfig;

pub use tokenizer::{initialize_worker_tokenizer, load_tokenizer, LocalTokenCounter, WorkerTokenCounter};

/// Characters per token assumed by the length heuristic
pub const DEFAULT_CHARS_PER_TOKEN: usize = 4;

/// Computes a token cost estimate for a piece of text
pub trait TokenCounter: Send + Sync {
    /// Count tokens in `text`. Never fails.
    fn count(&self, text: &str) -> usize;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Length-based estimate: one token per `chars_per_token` characters, rounded up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeuristicCounter {
    chars_per_token: usize,
}

impl HeuristicCounter {
    /// Create a heuristic counter. A ratio of zero is treated as one.
    pub fn new(chars_per_token: usize) -> Self {
        Self {
            chars_per_token: chars_per_token.max(1),
        }
    }
}

impl Default for HeuristicCounter {
    fn default() -> Self {
        Self::new(DEFAULT_CHARS_PER_TOKEN)
    }
}

impl TokenCounter for HeuristicCounter {
    fn count(&self, text: &str) -> usize {
        text.chars().count().div_ceil(self.chars_per_token)
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}

static TOKENIZER_CONFIG: OnceCell<TokenizerConfig> = OnceCell::new();

static LOCAL_COUNTER: Lazy<Arc<LocalTokenCounter>> = Lazy::new(|| {
    let config = configured_tokenizer();
    Arc::new(LocalTokenCounter::from_path(
        config.path.as_deref(),
        config.chars_per_token,
    ))
});

/// Fix the tokenizer settings used by [`local_counter`] and [`worker_counter`].
///
/// Returns `false` if the settings were already fixed, either by an earlier
/// call or because one of the process-wide counters was already requested.
pub fn set_tokenizer_config(config: TokenizerConfig) -> bool {
    TOKENIZER_CONFIG.set(config).is_ok()
}

/// Process-wide tokenizer settings; defaults when none were set
pub fn configured_tokenizer() -> &'static TokenizerConfig {
    TOKENIZER_CONFIG.get_or_init(TokenizerConfig::default)
}

/// Process-wide counter for the driving process
pub fn local_counter() -> Arc<dyn TokenCounter> {
    LOCAL_COUNTER.clone()
}

/// Process-wide counter that is safe to call from pool workers
pub fn worker_counter() -> Arc<dyn TokenCounter> {
    let config = configured_tokenizer();
    Arc::new(WorkerTokenCounter::new(
        config.path.clone(),
        config.chars_per_token,
    ))
}
