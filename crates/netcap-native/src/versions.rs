//! Versions of the transport components linked into this build.

use netcap_core::{ArtifactVersion, VersionSource};

/// Reports `netcap-core` and `netcap-native`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeVersions;

impl VersionSource for NativeVersions {
    fn identify(&self) -> Vec<ArtifactVersion> {
        vec![
            ArtifactVersion::new("netcap-core", netcap_core::VERSION),
            ArtifactVersion::new("netcap-native", crate::VERSION),
        ]
    }
}
