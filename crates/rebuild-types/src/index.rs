//! Persisted index document shapes
//!
//! Every map that ends up in a persisted document is a `BTreeMap` so the
//! serialized output is byte-identical across runs regardless of the order
//! in which workers produced the entries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One output file of a rebuild, keyed by filename in [`VersionRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactFile {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub size: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub checksum: String,
    pub reproducible: bool,
}

/// Reproducible/non-reproducible file counts at module and project granularity.
///
/// Module counts cover the files attributed to one output coordinate;
/// project counts cover the union of files across every module built from
/// the same source tree and version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStats {
    #[serde(default)]
    pub module_reproducible_files: u32,
    #[serde(default)]
    pub module_non_reproducible_files: u32,
    #[serde(default)]
    pub project_reproducible_files: u32,
    #[serde(default)]
    pub project_non_reproducible_files: u32,
}

impl FileStats {
    /// Count module-level stats over a set of attributed files.
    pub fn set_module_counts<'a>(&mut self, files: impl Iterator<Item = &'a ArtifactFile>) {
        let (ok, ko) = count(files);
        self.module_reproducible_files = ok;
        self.module_non_reproducible_files = ko;
    }

    /// Count project-level stats over the union of all module files.
    pub fn set_project_counts<'a>(&mut self, files: impl Iterator<Item = &'a ArtifactFile>) {
        let (ok, ko) = count(files);
        self.project_reproducible_files = ok;
        self.project_non_reproducible_files = ko;
    }
}

fn count<'a>(files: impl Iterator<Item = &'a ArtifactFile>) -> (u32, u32) {
    let mut ok = 0;
    let mut ko = 0;
    for file in files {
        if file.reproducible {
            ok += 1;
        } else {
            ko += 1;
        }
    }
    (ok, ko)
}

/// Aggregated result for one group:artifact:version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionRecord {
    /// Project display name from the build description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub scm_uri: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub scm_tag: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub build_tool: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub build_java_version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub build_os_name: String,
    /// True iff every compared file matched and at least one file was compared.
    pub reproducible: bool,
    pub file_stats: FileStats,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub artifacts: BTreeMap<String, ArtifactFile>,
}

impl VersionRecord {
    /// Recompute the `reproducible` flag from the project-level counts.
    pub fn update_reproducible(&mut self) {
        self.reproducible = self.file_stats.project_non_reproducible_files == 0
            && self.file_stats.project_reproducible_files > 0;
    }
}

/// Index document for one published module coordinate (group:artifact).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyIndex {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub overview_url: String,
    pub versions: BTreeMap<String, VersionRecord>,
    /// Greatest parseable semantic version among the keys, or empty.
    #[serde(default)]
    pub latest: String,
}

/// Index document for one source project, aggregating all of its modules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectIndex {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub overview_url: String,
    /// Coordinates of the modules this project builds.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<String>,
    pub versions: BTreeMap<String, VersionRecord>,
    #[serde(default)]
    pub latest: String,
}
