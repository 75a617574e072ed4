//! Attestation indexing pipeline
//!
//! Discovers rebuild attestation sets under a directory tree, normalizes
//! the historical buildinfo formats, aggregates per-module and per-project
//! reproducibility statistics, and materializes the result as a tree of
//! JSON index documents.

pub mod aggregate;
pub mod buildcompare;
pub mod buildinfo;
pub mod discovery;
pub mod error;
pub mod pipeline;
pub mod properties;
pub mod writer;

pub use error::{IndexError, IndexResult};
pub use pipeline::{IndexBuilder, IndexSet};
pub use writer::IndexWriter;
