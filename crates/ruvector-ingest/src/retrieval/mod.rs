//! Token-budgeted packing of extracted units for retrieval

mod packer;

pub use packer::DocumentPacker;
