//! Byte-comparison (`.buildcompare`) parsing
//!
//! The comparison document is authoritative for the resolved version
//! string and carries the lists of files whose rebuilt bytes matched
//! (`okFiles`) or diverged (`koFiles`).

use crate::error::IndexResult;
use crate::properties;
use std::collections::HashSet;
use std::path::Path;

/// Normalized comparison result for one rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildCompare {
    pub version: String,
    pub ok_files: HashSet<String>,
    pub ko_files: HashSet<String>,
}

impl BuildCompare {
    /// A file is reproducible iff it appears in the matched list. Files
    /// absent from both lists were never compared and count as not
    /// reproducible (see DESIGN.md for the policy discussion).
    pub fn is_reproducible(&self, filename: &str) -> bool {
        self.ok_files.contains(filename)
    }
}

/// Parse a buildcompare file from disk.
pub fn parse(path: &Path) -> IndexResult<BuildCompare> {
    let props = properties::load(path)?;

    Ok(BuildCompare {
        version: props.get("version").cloned().unwrap_or_default(),
        ok_files: split_file_list(props.get("okFiles")),
        ko_files: split_file_list(props.get("koFiles")),
    })
}

fn split_file_list(value: Option<&String>) -> HashSet<String> {
    value
        .map(|list| list.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}
