//! Core types for ingestion

pub mod document;
pub mod text_unit;

pub use document::{DocumentFormat, FileReference};
pub use text_unit::{file_label, sheet_label, TextUnit, FILE_LABEL_PREFIX};
