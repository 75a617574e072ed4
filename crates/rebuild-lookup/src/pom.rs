//! Package descriptor (POM) fetch and bill-of-materials expansion

use crate::error::LookupResult;
use rebuild_types::Gav;
use serde::Deserialize;
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// The parts of a POM the expander cares about.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PomProject {
    #[serde(default)]
    pub packaging: String,
    #[serde(rename = "dependencyManagement", default)]
    pub dependency_management: Option<PomDependencyManagement>,
}

impl PomProject {
    /// A packaging of `pom` marks a pure dependency-management manifest.
    pub fn is_bill_of_materials(&self) -> bool {
        self.packaging == "pom"
    }

    /// Managed dependencies with a usable concrete coordinate.
    pub fn managed_dependencies(&self) -> impl Iterator<Item = Gav> + '_ {
        self.dependency_management
            .iter()
            .flat_map(|management| management.dependencies.iter())
            .flat_map(|dependencies| dependencies.entries.iter())
            .filter_map(|dependency| {
                let version = dependency.version.clone()?;
                if dependency.group_id.is_empty()
                    || dependency.artifact_id.is_empty()
                    || version.is_empty()
                {
                    return None;
                }
                Some(Gav::new(dependency.group_id.clone(), dependency.artifact_id.clone(), version))
            })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PomDependencyManagement {
    #[serde(default)]
    pub dependencies: Option<PomDependencies>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PomDependencies {
    #[serde(rename = "dependency", default)]
    pub entries: Vec<PomDependency>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PomDependency {
    #[serde(rename = "groupId", default)]
    pub group_id: String,
    #[serde(rename = "artifactId", default)]
    pub artifact_id: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Fetches POM documents from a registry host.
#[derive(Debug, Clone)]
pub struct PomClient {
    client: reqwest::Client,
}

impl PomClient {
    pub fn new() -> LookupResult<Self> {
        let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self { client })
    }

    /// Fetch the POM for a versioned coordinate from a registry host.
    pub async fn fetch(&self, registry_host: &str, gav: &Gav) -> LookupResult<PomProject> {
        let url = format!(
            "https://{registry_host}/{}/{}-{}.pom",
            gav.path(false),
            gav.artifact_id,
            gav.version.as_deref().unwrap_or_default(),
        );
        let response = self.client.get(&url).send().await?.error_for_status()?;
        let body = response.text().await?;
        parse_pom(&body)
    }

    /// Expand a coordinate BOM-aware: the coordinate itself, and for a
    /// bill of materials also every managed dependency it lists. A fetch
    /// or parse failure degrades to the input coordinate alone.
    pub async fn collect_coordinates(&self, registry_host: &str, gav: &Gav) -> Vec<Gav> {
        let mut coordinates = vec![gav.clone()];

        match self.fetch(registry_host, gav).await {
            Ok(pom) if pom.is_bill_of_materials() => {
                coordinates.extend(pom.managed_dependencies());
            }
            Ok(_) => {}
            Err(error) => {
                tracing::error!(coordinate = %gav, %error, "failed to fetch pom");
            }
        }

        coordinates
    }
}

fn parse_pom(content: &str) -> LookupResult<PomProject> {
    quick_xml::de::from_str(content)
        .map_err(|error| crate::error::LookupError::Descriptor(error.to_string()))
}
