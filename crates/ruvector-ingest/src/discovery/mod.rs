//! File discovery for ingestion roots

mod walker;

pub use walker::{DirectoryWalker, IgnorePattern};
