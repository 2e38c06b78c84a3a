//! Linked artifact version metadata.

use std::fmt;

/// One linked component and its version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactVersion {
    pub artifact_id: String,
    pub version: String,
}

impl ArtifactVersion {
    pub fn new(artifact_id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for ArtifactVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.artifact_id, self.version)
    }
}

/// Reports which transport library components are linked into the process.
pub trait VersionSource: Send + Sync {
    fn identify(&self) -> Vec<ArtifactVersion>;
}

impl VersionSource for Vec<ArtifactVersion> {
    fn identify(&self) -> Vec<ArtifactVersion> {
        self.clone()
    }
}
