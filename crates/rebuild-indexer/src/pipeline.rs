//! Index build orchestration
//!
//! Fan-out over discovered attestation roots with a fixed admission gate,
//! join barrier, then a separate latest-resolution pass. Parse failures
//! skip the offending set; only persistence failures are fatal (handled by
//! the writer).

use crate::aggregate::{self, RootOutcome};
use crate::discovery;
use crate::error::IndexResult;
use crate::{buildcompare, buildinfo};
use rebuild_types::{DependencyIndex, ProjectIndex};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Upper bound on simultaneously in-flight roots, independent of corpus
/// size.
pub const MAX_CONCURRENCY: usize = 250;

/// Full output of one indexing run.
#[derive(Debug, Clone, Default)]
pub struct IndexSet {
    pub dependencies: BTreeMap<String, DependencyIndex>,
    pub projects: BTreeMap<String, ProjectIndex>,
}

/// Builds the index from an attestation corpus.
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    max_concurrency: usize,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self {
            max_concurrency: MAX_CONCURRENCY,
        }
    }

    #[cfg(test)]
    fn with_max_concurrency(max_concurrency: usize) -> Self {
        Self { max_concurrency }
    }

    /// Discover and process every attestation root under `input`.
    pub async fn build(&self, input: &Path) -> IndexResult<IndexSet> {
        let roots = discovery::find_attestation_roots(input)?;
        tracing::info!(roots = roots.len(), input = %input.display(), "discovered attestation roots");

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks: JoinSet<(usize, RootOutcome)> = JoinSet::new();

        for (ordinal, root) in roots.into_iter().enumerate() {
            let semaphore = semaphore.clone();
            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    // The semaphore lives for the whole run; closure is unreachable.
                    return (ordinal, RootOutcome::default());
                };
                (ordinal, process_root(&root))
            });
        }

        // Join barrier: collect every root's outcome before any merge or
        // latest-resolution, then merge in discovery order so the result
        // does not depend on task scheduling.
        let mut outcomes = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            outcomes.push(joined?);
        }
        outcomes.sort_by_key(|(ordinal, _)| *ordinal);

        let mut set = IndexSet::default();
        for (_, outcome) in outcomes {
            // Colliding coordinates overwrite wholesale; roots cover
            // disjoint slices of the corpus.
            set.dependencies.extend(outcome.dependencies);
            set.projects.extend(outcome.projects);
        }

        for index in set.dependencies.values_mut() {
            index.latest = aggregate::resolve_latest(index.versions.keys());
        }
        for index in set.projects.values_mut() {
            index.latest = aggregate::resolve_latest(index.versions.keys());
        }

        tracing::info!(
            projects = set.projects.len(),
            dependencies = set.dependencies.len(),
            "aggregated index"
        );
        Ok(set)
    }
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse and aggregate every attestation set under one root. Failures are
/// logged and skipped; they never propagate past the root.
fn process_root(root: &Path) -> RootOutcome {
    let mut outcome = RootOutcome::default();

    let sets = match discovery::find_attestation_sets(root) {
        Ok(sets) => sets,
        Err(error) => {
            tracing::error!(root = %root.display(), %error, "failed to enumerate attestation sets");
            return outcome;
        }
    };
    tracing::debug!(root = %root.display(), sets = sets.len(), "processing attestation root");

    let overview_url = aggregate::overview_url(root);
    for set in sets {
        let info = match buildinfo::parse(&set.buildinfo) {
            Ok(info) => info,
            Err(error) => {
                tracing::error!(file = %set.buildinfo.display(), %error, "failed to parse buildinfo file");
                continue;
            }
        };
        let compare = match buildcompare::parse(&set.buildcompare) {
            Ok(compare) => compare,
            Err(error) => {
                tracing::error!(file = %set.buildcompare.display(), %error, "failed to parse buildcompare file");
                continue;
            }
        };

        aggregate::aggregate_set(&info, &compare, &overview_url, &mut outcome);
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_attestation(dir: &Path, artifact: &str, version: &str, ok: &str, ko: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(discovery::ROOT_MARKER), "<metadata/>").unwrap();
        fs::write(
            dir.join(format!("{artifact}-{version}.buildinfo")),
            format!(
                "group-id=org.example\nartifact-id={artifact}\nversion={version}\n\
                 build-tool=mvn\noutputs.0.coordinates=org.example:{artifact}\n\
                 outputs.0.0.filename={artifact}-{version}.jar\n\
                 outputs.0.1.filename={artifact}-{version}.pom\n"
            ),
        )
        .unwrap();
        fs::write(
            dir.join(format!("{artifact}-{version}.buildcompare")),
            format!("version={version}\nokFiles=\"{ok}\"\nkoFiles=\"{ko}\"\n"),
        )
        .unwrap();
    }

    #[tokio::test]
    async fn test_build_aggregates_versions_and_resolves_latest() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("content/org/example/demo");
        write_attestation(&root, "demo", "1.0.0", "demo-1.0.0.jar demo-1.0.0.pom", "");
        write_attestation(&root, "demo", "1.2.0", "demo-1.2.0.jar", "demo-1.2.0.pom");

        let set = IndexBuilder::with_max_concurrency(2).build(dir.path()).await.unwrap();

        let index = &set.dependencies["org.example:demo"];
        assert_eq!(index.versions.len(), 2);
        assert_eq!(index.latest, "1.2.0");
        assert!(index.versions["1.0.0"].reproducible);
        assert!(!index.versions["1.2.0"].reproducible);
        assert!(index.overview_url.ends_with("/content/org/example/demo/README.md"));

        let project = &set.projects["org.example:demo"];
        assert_eq!(project.latest, "1.2.0");
        assert_eq!(project.modules, vec!["org.example:demo".to_string()]);
    }

    #[tokio::test]
    async fn test_malformed_set_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("content/org/example/demo");
        write_attestation(&root, "demo", "1.0.0", "demo-1.0.0.jar demo-1.0.0.pom", "");

        // Unsupported spec version in a sibling set.
        fs::write(
            root.join("demo-2.0.0.buildinfo"),
            "buildinfo.version=9.9\ngroup-id=org.example\nartifact-id=demo\noutputs.0.filename=x\n",
        )
        .unwrap();
        fs::write(root.join("demo-2.0.0.buildcompare"), "version=2.0.0\n").unwrap();

        let set = IndexBuilder::new().build(dir.path()).await.unwrap();
        let index = &set.dependencies["org.example:demo"];
        assert_eq!(index.versions.len(), 1);
        assert!(index.versions.contains_key("1.0.0"));
    }

    #[tokio::test]
    async fn test_empty_corpus_builds_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        let set = IndexBuilder::new().build(dir.path()).await.unwrap();
        assert!(set.dependencies.is_empty());
        assert!(set.projects.is_empty());
    }
}
