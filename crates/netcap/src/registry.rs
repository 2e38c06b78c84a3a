//! Transport registry.
//!
//! Owns one memoized [`CapabilityRecord`] per known backend. Records are
//! computed on first access, at most once each: concurrent first callers
//! for the same backend are serialized by a [`OnceLock`], later reads are
//! lock-free. The registry is an explicit object, created once at startup
//! and passed by reference.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use netcap_core::{
    CapabilityRecord, EventLoopGroupConstructor, NamespaceProvider, RecordParts, TransportConfig,
    TransportKind, TypeLocator, UnavailableCause, VersionSource,
};
use netcap_native::{CrateNamespaces, NativeLocator};

use crate::backend::BackendSpec;
use crate::probe::BackendProbe;
use crate::version_check::{check_versions, log_report, LinkedVersions, VersionReport};

/// Builder for a [`TransportRegistry`].
///
/// Defaults to the native catalogue, the crate namespaces and the linked
/// component versions. Each collaborator can be overridden before building.
pub struct RegistryBuilder {
    config: TransportConfig,
    locator: Option<Box<dyn TypeLocator>>,
    namespaces: Option<Box<dyn NamespaceProvider>>,
    versions: Option<Box<dyn VersionSource>>,
}

impl RegistryBuilder {
    pub fn new(config: TransportConfig) -> Self {
        Self {
            config,
            locator: None,
            namespaces: None,
            versions: None,
        }
    }

    pub fn locator(mut self, locator: impl TypeLocator + 'static) -> Self {
        self.locator = Some(Box::new(locator));
        self
    }

    pub fn namespaces(mut self, namespaces: impl NamespaceProvider + 'static) -> Self {
        self.namespaces = Some(Box::new(namespaces));
        self
    }

    pub fn versions(mut self, versions: impl VersionSource + 'static) -> Self {
        self.versions = Some(Box::new(versions));
        self
    }

    /// Build the registry.
    ///
    /// No backend is probed here. When enabled, the version-consistency
    /// check runs once and its outcome is logged and kept.
    pub fn build(self) -> TransportRegistry {
        if let Err(e) = self.config.validate() {
            tracing::warn!(error = %e, "ignoring transport preference");
        }

        let version_report = self.config.warn_versions.then(|| {
            let report = match &self.versions {
                Some(source) => check_versions(source.as_ref()),
                None => check_versions(&LinkedVersions),
            };
            log_report(&report);
            report
        });

        TransportRegistry {
            config: self.config,
            locator: self.locator.unwrap_or_else(|| Box::new(NativeLocator::new())),
            namespaces: self.namespaces.unwrap_or_else(|| Box::new(CrateNamespaces::new())),
            records: Default::default(),
            probes: AtomicUsize::new(0),
            version_report,
        }
    }
}

/// One lazily probed, immutable record per [`TransportKind`].
pub struct TransportRegistry {
    config: TransportConfig,
    locator: Box<dyn TypeLocator>,
    namespaces: Box<dyn NamespaceProvider>,
    records: [OnceLock<CapabilityRecord>; TransportKind::ALL.len()],
    probes: AtomicUsize,
    version_report: Option<VersionReport>,
}

impl TransportRegistry {
    pub fn builder(config: TransportConfig) -> RegistryBuilder {
        RegistryBuilder::new(config)
    }

    /// Default collaborators, configured from the environment.
    pub fn from_env() -> Self {
        RegistryBuilder::new(TransportConfig::from_env()).build()
    }

    /// The record for `kind`, probing it on first access.
    pub fn get(&self, kind: TransportKind) -> &CapabilityRecord {
        self.records[kind.index()].get_or_init(|| {
            self.probes.fetch_add(1, Ordering::Relaxed);
            match BackendSpec::for_kind(kind) {
                Some(spec) => BackendProbe::new(self.locator.as_ref(), self.namespaces.as_ref(), &self.config)
                    .probe(spec),
                None => nio_record(),
            }
        })
    }

    /// Look a record up by backend name or opt-in token, ignoring case.
    pub fn get_by_name(&self, name: &str) -> Option<&CapabilityRecord> {
        name.parse().ok().map(|kind| self.get(kind))
    }

    /// Every record, in declaration order. Probes whatever is not cached.
    pub fn records(&self) -> impl Iterator<Item = &CapabilityRecord> + '_ {
        TransportKind::ALL.into_iter().map(move |kind| self.get(kind))
    }

    /// The transport to use: the configured one if it is available, else
    /// the first available of EPOLL and KQUEUE, else NIO.
    pub fn preferred(&self) -> &CapabilityRecord {
        if let Some(kind) = self.config.preferred_kind() {
            let record = self.get(kind);
            if record.is_available() {
                return record;
            }
            tracing::debug!(transport = record.name(), "configured transport unavailable");
        }
        [TransportKind::Epoll, TransportKind::KQueue]
            .into_iter()
            .map(|kind| self.get(kind))
            .find(|record| record.is_available())
            .unwrap_or_else(|| self.get(TransportKind::Nio))
    }

    /// Number of records computed so far.
    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::Relaxed)
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Outcome of the version check, `None` when it was disabled.
    pub fn version_report(&self) -> Option<&VersionReport> {
        self.version_report.as_ref()
    }
}

impl Default for TransportRegistry {
    fn default() -> Self {
        Self::from_env()
    }
}

// NIO is a hard dependency of this crate, so its record is assembled from
// the handles directly.
fn nio_record() -> CapabilityRecord {
    let name = TransportKind::Nio.name();
    let types = netcap_native::nio::types();
    let record = EventLoopGroupConstructor::bind(name, &types.event_loop_group)
        .map_err(|e| UnavailableCause::ResolutionFailure(Box::new(e)))
        .and_then(|group_constructor| {
            let parts = RecordParts {
                server_channel: Some(types.server_channel.clone()),
                socket_channel: Some(types.socket_channel.clone()),
                domain_server_channel: None,
                domain_socket_channel: None,
                datagram_channel: Some(types.datagram_channel.clone()),
                event_loop_group: Some(types.event_loop_group.clone()),
                event_loop: Some(types.event_loop.clone()),
                group_constructor: Some(group_constructor),
            };
            CapabilityRecord::from_parts(name, parts, None)
                .map_err(|e| UnavailableCause::ResolutionFailure(Box::new(e)))
        });
    match record {
        Ok(record) => record,
        Err(cause) => {
            tracing::error!(%cause, "fallback transport could not be assembled");
            CapabilityRecord::unavailable(name, cause)
        }
    }
}
