//! Shared data model for the reproducible build index
//!
//! Pure data: package coordinates, the persisted index document shapes,
//! and the registry name table. No I/O lives here.

pub mod badge;
pub mod coordinate;
pub mod index;
pub mod registry;

pub use badge::Badge;
pub use coordinate::{CoordinateError, Gav};
pub use index::{ArtifactFile, DependencyIndex, FileStats, ProjectIndex, VersionRecord};
pub use registry::{RegistryError, RegistryTable};
