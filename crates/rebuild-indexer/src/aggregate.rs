//! Aggregation of attestation sets into coordinate-keyed index records

use crate::buildcompare::BuildCompare;
use crate::buildinfo::BuildInfo;
use rebuild_types::{ArtifactFile, DependencyIndex, ProjectIndex, VersionRecord};
use semver::Version;
use std::collections::BTreeMap;
use std::path::Path;

/// Upstream location of the attestation corpus, used for overview links.
const OVERVIEW_BASE_URL: &str =
    "https://github.com/jvm-repo-rebuild/reproducible-central/blob/master";

/// Aggregated result of one attestation root (or a merged run).
#[derive(Debug, Clone, Default)]
pub struct RootOutcome {
    pub dependencies: BTreeMap<String, DependencyIndex>,
    pub projects: BTreeMap<String, ProjectIndex>,
}

/// Derive the stable overview URL for an attestation root. Roots outside a
/// `/content` tree get no link.
pub fn overview_url(root: &Path) -> String {
    let path = root.to_string_lossy();
    match path.find("/content") {
        Some(index) => format!("{OVERVIEW_BASE_URL}{}/README.md", &path[index..]),
        None => String::new(),
    }
}

/// Fold one attestation set into the outcome's dependency and project maps.
///
/// Module-level stats cover the files attributed to one output coordinate
/// (filename prefixed by `<artifact>-<version>`, which filters out sibling
/// artifacts listed in the same build); project-level stats cover the union
/// of attributed files across all outputs of the set.
pub fn aggregate_set(
    info: &BuildInfo,
    compare: &BuildCompare,
    overview_url: &str,
    outcome: &mut RootOutcome,
) {
    let version = compare.version.clone();

    let base = VersionRecord {
        project: info.name.clone(),
        scm_uri: info.scm_uri.clone(),
        scm_tag: info.scm_tag.clone(),
        build_tool: info.build_tool.clone(),
        build_java_version: info.java_version.clone(),
        build_os_name: info.os_name.clone(),
        ..Default::default()
    };

    let mut union_artifacts: BTreeMap<String, ArtifactFile> = BTreeMap::new();
    let mut module_coordinates: Vec<String> = Vec::new();

    for output in &info.outputs {
        let attribution_prefix = format!("{}-{}", output.coordinate.artifact_id, version);

        let mut record = base.clone();
        for (filename, file) in &output.files {
            if !filename.starts_with(&attribution_prefix) {
                continue;
            }
            let artifact = ArtifactFile {
                size: file.size.clone(),
                checksum: file.checksum.clone(),
                reproducible: compare.is_reproducible(filename),
            };
            union_artifacts.insert(filename.clone(), artifact.clone());
            record.artifacts.insert(filename.clone(), artifact);
        }
        record.file_stats.set_module_counts(record.artifacts.values());

        let key = output.coordinate.coordinate();
        let entry = outcome
            .dependencies
            .entry(key.clone())
            .or_insert_with(|| DependencyIndex {
                group_id: output.coordinate.group_id.clone(),
                artifact_id: output.coordinate.artifact_id.clone(),
                overview_url: overview_url.to_string(),
                ..Default::default()
            });
        entry.versions.insert(version.clone(), record);
        if !module_coordinates.contains(&key) {
            module_coordinates.push(key);
        }
    }

    // Project-level counts need the full union, so they are filled in once
    // every output of the set has been attributed.
    for key in &module_coordinates {
        if let Some(record) = outcome
            .dependencies
            .get_mut(key)
            .and_then(|index| index.versions.get_mut(&version))
        {
            record.file_stats.set_project_counts(union_artifacts.values());
            record.update_reproducible();
        }
    }

    if info.group_id.is_empty() || info.artifact_id.is_empty() {
        tracing::warn!(
            name = %info.name,
            version = %version,
            "build description has no project group or artifact id, skipping project entry"
        );
        return;
    }

    let mut project_record = base;
    project_record.artifacts = union_artifacts;
    project_record.file_stats.set_module_counts(project_record.artifacts.values());
    project_record.file_stats.set_project_counts(project_record.artifacts.values());
    project_record.update_reproducible();

    let project_key = format!("{}:{}", info.group_id, info.artifact_id);
    let entry = outcome
        .projects
        .entry(project_key)
        .or_insert_with(|| ProjectIndex {
            group_id: info.group_id.clone(),
            artifact_id: info.artifact_id.clone(),
            overview_url: overview_url.to_string(),
            ..Default::default()
        });
    for coordinate in module_coordinates {
        if !entry.modules.contains(&coordinate) {
            entry.modules.push(coordinate);
        }
    }
    entry.versions.insert(version, project_record);
}

/// Resolve the greatest parseable semantic version among `keys`, returning
/// the original key string. Unparseable keys are logged and skipped; if no
/// key parses the result is empty, which is not an error.
pub fn resolve_latest<'a>(keys: impl Iterator<Item = &'a String>) -> String {
    let mut parsed: Vec<(Version, &'a String)> = Vec::new();

    for key in keys {
        match parse_lenient(key) {
            Some(version) => parsed.push((version, key)),
            None => {
                tracing::warn!(version = %key, "skipping unparseable version");
            }
        }
    }

    parsed.sort_by(|a, b| a.0.cmp(&b.0));
    parsed.last().map(|(_, key)| (*key).clone()).unwrap_or_default()
}

/// Parse a version key, padding missing minor/patch segments. Maven
/// corpora are full of `1.0`-style versions; they must compare like
/// `1.0.0` without changing the key the caller stores.
fn parse_lenient(key: &str) -> Option<Version> {
    if let Ok(version) = Version::parse(key) {
        return Some(version);
    }

    let (core, suffix) = match key.find(['-', '+']) {
        Some(index) => key.split_at(index),
        None => (key, ""),
    };
    let padding = match core.matches('.').count() {
        0 => ".0.0",
        1 => ".0",
        _ => return None,
    };
    Version::parse(&format!("{core}{padding}{suffix}")).ok()
}
