//! Version-consistency check across linked transport components.
//!
//! Mixed versions risk undefined behaviour in native calls but are not
//! fatal, so the outcome is only logged. It never blocks registry
//! construction.

use std::collections::{BTreeMap, BTreeSet};

use netcap_core::config::ENV_WARN_VERSIONS;
use netcap_core::{ArtifactVersion, VersionSource};

/// Artifacts in the transport family start with this.
pub const FAMILY_PREFIX: &str = "netcap";

/// Versioned separately from the rest of the family.
pub const INCUBATOR_PREFIX: &str = "netcap-incubator";

/// Outcome of [`check_versions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionReport {
    /// No family artifact reported a version.
    Unknown,
    /// Every family artifact reports this version.
    Consistent(String),
    /// More than one distinct version. `artifacts` maps each artifact to
    /// its version.
    Inconsistent {
        versions: Vec<String>,
        artifacts: BTreeMap<String, String>,
    },
}

impl VersionReport {
    pub fn is_consistent(&self) -> bool {
        matches!(self, VersionReport::Consistent(_))
    }
}

fn in_family(artifact: &ArtifactVersion) -> bool {
    artifact.artifact_id.starts_with(FAMILY_PREFIX) && !artifact.artifact_id.starts_with(INCUBATOR_PREFIX)
}

/// Collect the family versions reported by `source` and classify them.
pub fn check_versions(source: &dyn VersionSource) -> VersionReport {
    let artifacts: BTreeMap<String, String> = source
        .identify()
        .into_iter()
        .filter(in_family)
        .map(|a| (a.artifact_id, a.version))
        .collect();

    let versions: BTreeSet<&String> = artifacts.values().collect();
    match versions.len() {
        0 => VersionReport::Unknown,
        1 => VersionReport::Consistent(versions.into_iter().next().cloned().unwrap_or_default()),
        _ => VersionReport::Inconsistent {
            versions: versions.into_iter().cloned().collect(),
            artifacts,
        },
    }
}

/// Emit the report at the matching level.
pub fn log_report(report: &VersionReport) {
    match report {
        VersionReport::Unknown => {
            tracing::warn!(
                "unknown transport version; to disable this warning set {}=false",
                ENV_WARN_VERSIONS
            );
        }
        VersionReport::Consistent(version) => {
            tracing::info!(%version, "using transport version");
        }
        VersionReport::Inconsistent { artifacts, .. } => {
            let found = artifacts
                .iter()
                .map(|(id, v)| format!("{id}-{v}"))
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                "found inconsistent transport versions ({found}); mixed versions may cause \
                 undefined behaviour in native calls; to disable this warning set {}=false",
                ENV_WARN_VERSIONS
            );
        }
    }
}

/// Versions of the default stack: the native components plus this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkedVersions;

impl VersionSource for LinkedVersions {
    fn identify(&self) -> Vec<ArtifactVersion> {
        let mut linked = netcap_native::NativeVersions.identify();
        linked.push(ArtifactVersion::new("netcap", crate::VERSION));
        linked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn versions(list: &[(&str, &str)]) -> Vec<ArtifactVersion> {
        list.iter().map(|(id, v)| ArtifactVersion::new(*id, *v)).collect()
    }

    #[test]
    fn test_linked_versions_consistent() {
        let report = check_versions(&LinkedVersions);
        assert_eq!(report, VersionReport::Consistent(crate::VERSION.to_string()));
        assert!(report.is_consistent());
    }

    #[test]
    fn test_no_family_artifacts() {
        let source = versions(&[("serde", "1.0.200"), ("libc", "0.2.150")]);
        assert_eq!(check_versions(&source), VersionReport::Unknown);
        assert_eq!(check_versions(&Vec::new()), VersionReport::Unknown);
    }

    #[test]
    fn test_incubator_excluded() {
        let source = versions(&[
            ("netcap-core", "1.2.0"),
            ("netcap-native", "1.2.0"),
            ("netcap-incubator-uring", "0.0.9"),
        ]);
        assert_eq!(check_versions(&source), VersionReport::Consistent("1.2.0".into()));
    }

    #[test]
    fn test_conflict_names_versions() {
        let source = versions(&[("netcap-core", "1.2.0"), ("netcap-native", "1.3.0"), ("netcap", "1.2.0")]);
        match check_versions(&source) {
            VersionReport::Inconsistent { versions, artifacts } => {
                assert_eq!(versions, vec!["1.2.0".to_string(), "1.3.0".to_string()]);
                assert_eq!(artifacts.len(), 3);
                assert_eq!(artifacts["netcap-native"], "1.3.0");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_log_report_never_panics() {
        log_report(&VersionReport::Unknown);
        log_report(&VersionReport::Consistent("1.0.0".into()));
        log_report(&check_versions(&versions(&[("netcap-core", "1"), ("netcap", "2")])));
    }
}
