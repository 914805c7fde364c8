//! Artifact coordinates and repository descriptors

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use strum_macros::{Display, EnumString};

use crate::error::{Error, Result};

/// Classification of an artifact repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RepositoryKind {
    /// A repository rooted in a local directory tree
    Local,
    /// A repository reachable through a URL
    Remote,
}

/// Coordinates of a single artifact known to an index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Builder)]
#[builder(setter(into))]
pub struct ArtifactInfo {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,

    /// Packaging type, e.g. "jar" or "pom"
    #[builder(default = "None")]
    pub packaging: Option<String>,

    /// Optional classifier, e.g. "sources"
    #[builder(default = "None")]
    pub classifier: Option<String>,
}

impl ArtifactInfo {
    /// Creates an artifact from its three mandatory coordinate segments
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            packaging: None,
            classifier: None,
        }
    }

    /// Parses a `group:artifact:version[:packaging]` coordinate string
    pub fn from_coordinate(coordinate: &str) -> Result<Self> {
        let parts: Vec<&str> = coordinate.trim().split(':').collect();
        if parts.len() < 3 || parts.len() > 4 || parts.iter().any(|p| p.is_empty()) {
            return Err(Error::InvalidCoordinate(coordinate.to_string()));
        }

        let mut artifact = Self::new(parts[0], parts[1], parts[2]);
        artifact.packaging = parts.get(3).map(|p| (*p).to_string());
        Ok(artifact)
    }

    /// The `group:artifact:version` form used for display and matching
    pub fn coordinate(&self) -> String {
        format!("{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

impl fmt::Display for ArtifactInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coordinate())
    }
}

/// Descriptor of an artifact repository, independent of any open index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryInfo {
    /// Stable identifier, e.g. "central" or "local"
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Local directory or remote URL, depending on `kind`
    pub path_or_url: String,
    pub kind: RepositoryKind,
}

impl RepositoryInfo {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        path_or_url: impl Into<String>,
        kind: RepositoryKind,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            path_or_url: path_or_url.into(),
            kind,
        }
    }

    /// Descriptor for a repository rooted in a local directory
    pub fn local(id: impl Into<String>, path: impl Into<String>) -> Self {
        let id = id.into();
        let name = id.clone();
        Self::new(id, name, path, RepositoryKind::Local)
    }

    /// Descriptor for a repository reachable through a URL
    pub fn remote(id: impl Into<String>, url: impl Into<String>) -> Self {
        let id = id.into();
        let name = id.clone();
        Self::new(id, name, url, RepositoryKind::Remote)
    }

    /// The repository URL, `Some` only for remote repositories
    pub fn url(&self) -> Option<&str> {
        match self.kind {
            RepositoryKind::Remote => Some(&self.path_or_url),
            RepositoryKind::Local => None,
        }
    }

    /// The repository root directory, `Some` only for local repositories
    pub fn path(&self) -> Option<PathBuf> {
        match self.kind {
            RepositoryKind::Local => Some(PathBuf::from(&self.path_or_url)),
            RepositoryKind::Remote => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_coordinate_parsing() {
        let artifact = ArtifactInfo::from_coordinate("org.junit:junit:4.13.2")
            .expect("valid coordinate should parse");
        assert_eq!(artifact.group_id, "org.junit");
        assert_eq!(artifact.artifact_id, "junit");
        assert_eq!(artifact.version, "4.13.2");
        assert_eq!(artifact.packaging, None);
        assert_eq!(artifact.to_string(), "org.junit:junit:4.13.2");
    }

    #[test]
    fn test_coordinate_parsing_with_packaging() {
        let artifact = ArtifactInfo::from_coordinate("commons-io:commons-io:2.4:jar")
            .expect("valid coordinate should parse");
        assert_eq!(artifact.packaging.as_deref(), Some("jar"));
        // Packaging is not part of the display form
        assert_eq!(artifact.coordinate(), "commons-io:commons-io:2.4");
    }

    #[test]
    fn test_coordinate_parsing_rejects_malformed_input() {
        for bad in ["", "junit", "junit:junit", "junit::4.0", "a:b:c:d:e"] {
            assert!(
                ArtifactInfo::from_coordinate(bad).is_err(),
                "'{bad}' should not parse"
            );
        }
    }

    #[test]
    fn test_artifact_builder() {
        let artifact = ArtifactInfoBuilder::default()
            .group_id("org.jmock")
            .artifact_id("jmock")
            .version("1.2.0")
            .classifier(Some("sources".to_string()))
            .build()
            .expect("builder should succeed");
        assert_eq!(artifact.classifier.as_deref(), Some("sources"));
    }

    #[test]
    fn test_repository_info_accessors() {
        let local = RepositoryInfo::local("local", "/home/user/.m2/repository");
        assert_eq!(local.url(), None);
        assert_eq!(
            local.path(),
            Some(PathBuf::from("/home/user/.m2/repository"))
        );

        let remote = RepositoryInfo::remote("central", "https://repo1.maven.org/maven2");
        assert_eq!(remote.url(), Some("https://repo1.maven.org/maven2"));
        assert_eq!(remote.path(), None);
    }

    #[test]
    fn test_repository_kind_round_trip() {
        use std::str::FromStr;
        assert_eq!(RepositoryKind::Local.to_string(), "local");
        assert_eq!(
            RepositoryKind::from_str("remote").expect("should parse"),
            RepositoryKind::Remote
        );
    }
}
