//! Extracted text units with provenance labels for citations

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::tokens::TokenCounter;

/// Prefix shared by every file-level provenance label
pub const FILE_LABEL_PREFIX: &str = "##File: ";

/// A unit of extracted text ready for indexing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextUnit {
    /// Provenance label, used for citation and display
    pub label: String,
    /// Text body
    pub content: String,
    /// Token count of `content` under the counter that built this unit
    pub tokens: usize,
}

impl TextUnit {
    /// Create a text unit
    pub fn new(label: impl Into<String>, content: impl Into<String>, tokens: usize) -> Self {
        Self {
            label: label.into(),
            content: content.into(),
            tokens,
        }
    }

    /// Count the tokens of `content` and wrap it into a unit
    pub fn assemble(label: impl Into<String>, content: String, counter: &dyn TokenCounter) -> Self {
        let tokens = counter.count(&content);
        Self::new(label, content, tokens)
    }

    /// Whether the body is empty
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Label for a whole file: `##File: <path>`
pub fn file_label(path: &Path) -> String {
    format!("{}{}", FILE_LABEL_PREFIX, path.display())
}

/// Label for one sheet of a workbook: `##File: <path>#<sheet>`
pub fn sheet_label(path: &Path, sheet: &str) -> String {
    format!("{}{}#{}", FILE_LABEL_PREFIX, path.display(), sheet)
}
