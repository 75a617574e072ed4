//! Lookup layer over the persisted reproducibility index
//!
//! Resolves coordinates against a local or remote index, expands a
//! coordinate into its transitive dependency set via an external
//! dependency-graph service, and reports aggregate reproducibility.

pub mod error;
pub mod expander;
pub mod graph;
pub mod pom;
pub mod service;
pub mod source;

pub use error::{LookupError, LookupResult};
pub use expander::{DependencyReport, TransitiveExpander};
pub use graph::{DependencyGraph, GraphComponent, HttpDependencyGraph};
pub use pom::PomClient;
pub use service::LookupService;
pub use source::IndexSource;
