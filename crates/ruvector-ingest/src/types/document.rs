//! Document formats and file references

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Extraction strategy selected from a file's extension
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// PDF document
    Pdf,
    /// Microsoft Word document (.docx)
    Docx,
    /// Excel spreadsheet (.xlsx, .xls)
    Spreadsheet,
    /// PowerPoint presentation (.pptx)
    Presentation,
    /// Anything else, read as UTF-8 text
    PlainText,
}

impl DocumentFormat {
    /// Detect format from a file path.
    ///
    /// Unknown or missing extensions fall back to [`DocumentFormat::PlainText`].
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let name = path
            .as_ref()
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if name.ends_with(".pdf") {
            Self::Pdf
        } else if name.ends_with(".docx") {
            Self::Docx
        } else if name.ends_with(".xlsx") || name.ends_with(".xls") {
            Self::Spreadsheet
        } else if name.ends_with(".pptx") {
            Self::Presentation
        } else {
            Self::PlainText
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
            Self::Spreadsheet => "Spreadsheet",
            Self::Presentation => "Presentation",
            Self::PlainText => "Text",
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A file discovered for ingestion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileReference {
    /// Path used to open the file
    pub path: PathBuf,
    /// Path relative to the ingestion root, for display
    pub relative_path: PathBuf,
    /// Last modification time
    pub modified: DateTime<Utc>,
}

impl FileReference {
    /// Create a file reference
    pub fn new(path: impl Into<PathBuf>, relative_path: impl Into<PathBuf>, modified: DateTime<Utc>) -> Self {
        Self {
            path: path.into(),
            relative_path: relative_path.into(),
            modified,
        }
    }

    /// Build a reference from a path on disk, reading its modification time.
    /// The relative path is the file name.
    pub fn from_path(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let modified = std::fs::metadata(&path)?.modified()?;
        let relative_path = path
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| path.clone());

        Ok(Self {
            path,
            relative_path,
            modified: DateTime::<Utc>::from(modified),
        })
    }

    /// Format detected from the path
    pub fn format(&self) -> DocumentFormat {
        DocumentFormat::from_path(&self.path)
    }
}
