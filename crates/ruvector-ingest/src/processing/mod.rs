//! Batch extraction over a worker pool

mod batch;

pub use batch::BatchExtractor;
