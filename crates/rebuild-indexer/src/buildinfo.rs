//! Build-description (`.buildinfo`) parsing
//!
//! Three historical encodings of "what was built" exist in the corpus.
//! The layout is detected once, then all remaining keys are decoded by the
//! matching variant; an unrecognized layout is a hard parse error for that
//! file only.

use crate::error::{IndexError, IndexResult};
use crate::properties::{self, Properties};
use rebuild_types::Gav;
use std::collections::BTreeMap;
use std::path::Path;

/// Spec version tags this parser understands. An absent tag is treated as
/// the original unversioned format.
const SUPPORTED_SPEC_VERSIONS: &[&str] = &["", "1.0-SNAPSHOT"];

/// One file produced by an output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputFile {
    pub size: String,
    pub checksum: String,
}

/// One output coordinate with its produced files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub coordinate: Gav,
    pub files: BTreeMap<String, OutputFile>,
}

/// Normalized build description for one rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildInfo {
    pub spec_version: String,
    pub name: String,
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub build_tool: String,
    pub java_version: String,
    pub os_name: String,
    pub scm_uri: String,
    pub scm_tag: String,
    pub outputs: Vec<Output>,
}

/// How the output section of a buildinfo document is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputLayout {
    /// A single implicit output; files addressed as `outputs.<i>.*`.
    SingleImplicit,
    /// Multiple outputs with `outputs.<n>.coordinates`, `n` starting at 0.
    IndexedFromZero,
    /// Same, but the first output sits at index 1.
    IndexedFromOne,
}

impl OutputLayout {
    /// Detection order matters: the first structural marker found decides
    /// how remaining keys are decoded.
    fn detect(props: &Properties) -> Option<Self> {
        if props.contains_key("outputs.0.filename") {
            Some(Self::SingleImplicit)
        } else if props.contains_key("outputs.0.coordinates") {
            Some(Self::IndexedFromZero)
        } else if props.contains_key("outputs.1.coordinates") {
            Some(Self::IndexedFromOne)
        } else {
            None
        }
    }
}

/// Parse a buildinfo file from disk.
pub fn parse(path: &Path) -> IndexResult<BuildInfo> {
    let props = properties::load(path)?;
    from_properties(&props, path)
}

/// Normalize an already-tokenized buildinfo document.
pub fn from_properties(props: &Properties, path: &Path) -> IndexResult<BuildInfo> {
    let get = |key: &str| props.get(key).cloned().unwrap_or_default();

    let mut info = BuildInfo {
        spec_version: get("buildinfo.version"),
        name: get("name"),
        group_id: get("group-id"),
        artifact_id: get("artifact-id"),
        version: get("version"),
        build_tool: get("build-tool"),
        java_version: get("java.version"),
        os_name: get("os.name"),
        scm_uri: get("source.scm.uri"),
        scm_tag: get("source.scm.tag"),
        outputs: Vec::new(),
    };

    if !SUPPORTED_SPEC_VERSIONS.contains(&info.spec_version.as_str()) {
        return Err(IndexError::UnsupportedSpecVersion {
            path: path.to_path_buf(),
            version: info.spec_version,
        });
    }

    let layout = OutputLayout::detect(props).ok_or_else(|| IndexError::UnknownOutputLayout {
        path: path.to_path_buf(),
    })?;

    match layout {
        OutputLayout::SingleImplicit => {
            let coordinate = Gav {
                group_id: info.group_id.clone(),
                artifact_id: info.artifact_id.clone(),
                version: None,
            };
            info.outputs.push(Output {
                coordinate,
                files: parse_output_files(props, "outputs"),
            });
        }
        OutputLayout::IndexedFromZero => parse_indexed_outputs(props, 0, &mut info.outputs),
        OutputLayout::IndexedFromOne => parse_indexed_outputs(props, 1, &mut info.outputs),
    }

    Ok(info)
}

fn parse_indexed_outputs(props: &Properties, first_index: usize, outputs: &mut Vec<Output>) {
    for i in first_index.. {
        let Some(coordinate) = props.get(&format!("outputs.{i}.coordinates")) else {
            break;
        };

        let Some((group_id, artifact_id)) = coordinate.split_once(':') else {
            tracing::warn!(coordinate, "output coordinate is missing a group or artifact id");
            continue;
        };
        if group_id.is_empty() || artifact_id.is_empty() {
            tracing::warn!(coordinate, "output coordinate is missing a group or artifact id");
            continue;
        }

        outputs.push(Output {
            coordinate: Gav {
                group_id: group_id.to_string(),
                artifact_id: artifact_id.to_string(),
                version: None,
            },
            files: parse_output_files(props, &format!("outputs.{i}")),
        });
    }
}

/// Scan `<prefix>.<i>.filename` keys; the scan stops at the first missing
/// filename, size and checksum are optional.
fn parse_output_files(props: &Properties, prefix: &str) -> BTreeMap<String, OutputFile> {
    let mut files = BTreeMap::new();

    for i in 0.. {
        let Some(filename) = props.get(&format!("{prefix}.{i}.filename")) else {
            break;
        };

        files.insert(
            filename.clone(),
            OutputFile {
                size: props.get(&format!("{prefix}.{i}.length")).cloned().unwrap_or_default(),
                checksum: props
                    .get(&format!("{prefix}.{i}.checksums.sha512"))
                    .cloned()
                    .unwrap_or_default(),
            },
        );
    }

    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties;
    use std::path::PathBuf;

    fn parse_str(content: &str) -> IndexResult<BuildInfo> {
        let props = properties::parse(content);
        from_properties(&props, &PathBuf::from("test.buildinfo"))
    }

    const COMMON_HEADER: &str = "\
name=Demo Project
group-id=org.example
artifact-id=demo
version=1.0.0
build-tool=mvn
java.version=17
os.name=Linux
source.scm.uri=scm:git:https://github.com/example/demo.git
source.scm.tag=v1.0.0
";

    #[test]
    fn test_single_implicit_output() {
        let content = format!(
            "{COMMON_HEADER}\
outputs.0.filename=demo-1.0.0.jar
outputs.0.length=1024
outputs.0.checksums.sha512=aa
outputs.1.filename=demo-1.0.0.pom
outputs.1.length=512
outputs.1.checksums.sha512=bb
"
        );
        let info = parse_str(&content).unwrap();
        assert_eq!(info.outputs.len(), 1);
        assert_eq!(info.outputs[0].coordinate.coordinate(), "org.example:demo");
        assert_eq!(info.outputs[0].files.len(), 2);
        assert_eq!(info.outputs[0].files["demo-1.0.0.jar"].size, "1024");
    }

    #[test]
    fn test_variants_normalize_identically() {
        // The same build expressed in the three historical encodings.
        let single = format!(
            "{COMMON_HEADER}\
outputs.0.filename=demo-1.0.0.jar
outputs.0.length=1024
outputs.0.checksums.sha512=aa
"
        );
        let from_zero = format!(
            "{COMMON_HEADER}\
outputs.0.coordinates=org.example:demo
outputs.0.0.filename=demo-1.0.0.jar
outputs.0.0.length=1024
outputs.0.0.checksums.sha512=aa
"
        );
        let from_one = format!(
            "{COMMON_HEADER}\
outputs.1.coordinates=org.example:demo
outputs.1.0.filename=demo-1.0.0.jar
outputs.1.0.length=1024
outputs.1.0.checksums.sha512=aa
"
        );

        let a = parse_str(&single).unwrap();
        let b = parse_str(&from_zero).unwrap();
        let c = parse_str(&from_one).unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_multi_module_outputs() {
        let content = format!(
            "{COMMON_HEADER}\
outputs.0.coordinates=org.example:demo-core
outputs.0.0.filename=demo-core-1.0.0.jar
outputs.1.coordinates=org.example:demo-api
outputs.1.0.filename=demo-api-1.0.0.jar
outputs.1.1.filename=demo-api-1.0.0-sources.jar
"
        );
        let info = parse_str(&content).unwrap();
        assert_eq!(info.outputs.len(), 2);
        assert_eq!(info.outputs[0].coordinate.artifact_id, "demo-core");
        assert_eq!(info.outputs[1].files.len(), 2);
    }

    #[test]
    fn test_unsupported_spec_version() {
        let content = format!("buildinfo.version=2.0\n{COMMON_HEADER}outputs.0.filename=a.jar\n");
        assert!(matches!(
            parse_str(&content),
            Err(IndexError::UnsupportedSpecVersion { .. })
        ));
    }

    #[test]
    fn test_snapshot_spec_version_is_supported() {
        let content =
            format!("buildinfo.version=1.0-SNAPSHOT\n{COMMON_HEADER}outputs.0.filename=a.jar\n");
        assert!(parse_str(&content).is_ok());
    }

    #[test]
    fn test_unknown_output_layout_is_hard_error() {
        assert!(matches!(
            parse_str(COMMON_HEADER),
            Err(IndexError::UnknownOutputLayout { .. })
        ));
    }

    #[test]
    fn test_malformed_coordinate_is_skipped() {
        let content = format!(
            "{COMMON_HEADER}\
outputs.0.coordinates=missing-separator
outputs.0.0.filename=x.jar
outputs.1.coordinates=org.example:demo
outputs.1.0.filename=demo-1.0.0.jar
"
        );
        let info = parse_str(&content).unwrap();
        assert_eq!(info.outputs.len(), 1);
        assert_eq!(info.outputs[0].coordinate.artifact_id, "demo");
    }
}
