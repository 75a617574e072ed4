//! Index document persistence
//!
//! Every coordinate's documents live at a path derived from the
//! coordinate, so concurrent writers never contend on a file. A failed
//! write aborts the whole run.

use crate::error::{IndexError, IndexResult};
use crate::pipeline::{IndexSet, MAX_CONCURRENCY};
use rebuild_types::{Badge, DependencyIndex, ProjectIndex, VersionRecord};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Document kind for per-module/dependency coordinates.
pub const KIND_DEPENDENCY: &str = "maven";
/// Document kind for project coordinates.
pub const KIND_PROJECT: &str = "project";

/// Persists an [`IndexSet`] as a tree of JSON documents under
/// `<out>/<kind>/<registry>/<group path>/<artifact path>/`.
#[derive(Debug, Clone)]
pub struct IndexWriter {
    out_dir: PathBuf,
    registry: String,
    max_concurrency: usize,
}

impl IndexWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            registry: "mavencentral".to_string(),
            max_concurrency: MAX_CONCURRENCY,
        }
    }

    /// Write every document of the run. Fails fast on the first
    /// persistence error.
    pub async fn write_all(&self, set: &IndexSet) -> IndexResult<()> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks: JoinSet<IndexResult<()>> = JoinSet::new();

        for index in set.dependencies.values() {
            let writer = self.clone();
            let index = index.clone();
            let semaphore = semaphore.clone();
            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return Ok(());
                };
                writer.write_dependency(&index).await
            });
        }
        for index in set.projects.values() {
            let writer = self.clone();
            let index = index.clone();
            let semaphore = semaphore.clone();
            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return Ok(());
                };
                writer.write_project(&index).await
            });
        }

        while let Some(joined) = tasks.join_next().await {
            // Dropping the JoinSet on error aborts the remaining writers.
            joined??;
        }

        tracing::info!(
            dependencies = set.dependencies.len(),
            projects = set.projects.len(),
            out = %self.out_dir.display(),
            "wrote index documents"
        );
        Ok(())
    }

    async fn write_dependency(&self, index: &DependencyIndex) -> IndexResult<()> {
        let dir = self.coordinate_dir(KIND_DEPENDENCY, &index.group_id, &index.artifact_id);
        self.write_coordinate_documents(&dir, index, &index.versions, &index.latest).await
    }

    async fn write_project(&self, index: &ProjectIndex) -> IndexResult<()> {
        let dir = self.coordinate_dir(KIND_PROJECT, &index.group_id, &index.artifact_id);
        self.write_coordinate_documents(&dir, index, &index.versions, &index.latest).await
    }

    async fn write_coordinate_documents<T: Serialize>(
        &self,
        dir: &Path,
        index: &T,
        versions: &BTreeMap<String, VersionRecord>,
        latest: &str,
    ) -> IndexResult<()> {
        write_document(&dir.join("index.json"), index).await?;

        for (version, record) in versions {
            write_document(&dir.join(format!("{version}.json")), record).await?;
        }

        if let Some(record) = versions.get(latest) {
            write_document(&dir.join("badge.json"), &latest_badge(latest, record)).await?;
        }

        Ok(())
    }

    fn coordinate_dir(&self, kind: &str, group_id: &str, artifact_id: &str) -> PathBuf {
        self.out_dir
            .join(kind)
            .join(&self.registry)
            .join(group_id.replace('.', "/"))
            .join(artifact_id.replace('.', "/"))
    }
}

/// Static badge document for a coordinate's latest version.
fn latest_badge(version: &str, record: &VersionRecord) -> Badge {
    let stats = &record.file_stats;
    let total = stats.project_reproducible_files + stats.project_non_reproducible_files;
    let status = if record.reproducible { "ok" } else { "error" };

    Badge {
        schema_version: 1,
        label: "Reproducible Builds".to_string(),
        label_color: "1e5b96".to_string(),
        color: status.to_string(),
        message: format!("{version} - {}/{total} ok", stats.project_reproducible_files),
        is_error: !record.reproducible,
        style: "flat".to_string(),
        ..Default::default()
    }
}

async fn write_document<T: Serialize>(path: &Path, document: &T) -> IndexResult<()> {
    let mut content = serde_json::to_vec(document)?;
    content.push(b'\n');

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|source| IndexError::Persist {
            path: path.to_path_buf(),
            source,
        })?;
    }
    tokio::fs::write(path, content).await.map_err(|source| IndexError::Persist {
        path: path.to_path_buf(),
        source,
    })
}
