//! Attestation set discovery
//!
//! Attestation roots are directories containing the registry metadata
//! marker file; each root holds one or more buildinfo/buildcompare pairs
//! (paired by filename stem).

use crate::error::{IndexError, IndexResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Marker file identifying an attestation root.
pub const ROOT_MARKER: &str = "maven-metadata.xml";

const BUILDINFO_SUFFIX: &str = ".buildinfo";
const BUILDCOMPARE_SUFFIX: &str = ".buildcompare";

/// One rebuild's attestation document pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationSet {
    pub buildinfo: PathBuf,
    pub buildcompare: PathBuf,
}

/// Find every attestation root under `input`, skipping `.git` directories.
pub fn find_attestation_roots(input: &Path) -> IndexResult<Vec<PathBuf>> {
    let files = find_files(input, ROOT_MARKER)?;
    Ok(files
        .into_iter()
        .filter_map(|path| path.parent().map(Path::to_path_buf))
        .collect())
}

/// Find the attestation pairs under one root. Each `.buildinfo` file is
/// paired with its `.buildcompare` sibling by replacing the suffix; the
/// pair is parsed lazily so a missing sibling surfaces as a per-set parse
/// error, not a discovery failure.
pub fn find_attestation_sets(root: &Path) -> IndexResult<Vec<AttestationSet>> {
    let buildinfo_files = find_files(root, BUILDINFO_SUFFIX)?;

    Ok(buildinfo_files
        .into_iter()
        .map(|buildinfo| {
            let name = buildinfo
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or_default()
                .replacen(BUILDINFO_SUFFIX, BUILDCOMPARE_SUFFIX, 1);
            let buildcompare = buildinfo.with_file_name(name);
            AttestationSet {
                buildinfo,
                buildcompare,
            }
        })
        .collect())
}

fn find_files(root: &Path, suffix: &str) -> IndexResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.file_name() != ".git");

    for entry in walker {
        let entry = entry.map_err(|source| IndexError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(suffix))
        {
            files.push(entry.into_path());
        }
    }

    // walkdir yields a platform-dependent order; sort so discovery is
    // deterministic for a fixed corpus.
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_find_roots_skips_git_directories() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("content/org/example/demo");
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join(ROOT_MARKER), "<metadata/>").unwrap();

        let git = dir.path().join(".git/some/depth");
        fs::create_dir_all(&git).unwrap();
        fs::write(git.join(ROOT_MARKER), "<metadata/>").unwrap();

        let roots = find_attestation_roots(dir.path()).unwrap();
        assert_eq!(roots, vec![project]);
    }

    #[test]
    fn test_pairs_by_filename_stem() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("demo-1.0.0.buildinfo"), "").unwrap();
        fs::write(dir.path().join("demo-1.0.0.buildcompare"), "").unwrap();
        fs::write(dir.path().join("demo-1.1.0.buildinfo"), "").unwrap();

        let sets = find_attestation_sets(dir.path()).unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].buildcompare, dir.path().join("demo-1.0.0.buildcompare"));
        assert_eq!(sets[1].buildcompare, dir.path().join("demo-1.1.0.buildcompare"));
    }
}
