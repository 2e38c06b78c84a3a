//! Backend probe.
//!
//! Turns one [`BackendSpec`] into a [`CapabilityRecord`]. Never fails:
//! every failure path is captured as an [`UnavailableCause`] and returned
//! inside an unavailable record.
//!
//! Steps, in order:
//!   1. Namespace: no namespace for the backend's tier → `NamespaceUnresolved`.
//!      Nothing else is resolved.
//!   2. Opt-in: gated backend whose token is not configured → `NotOptedIn`.
//!   3. Availability: resolve the entry point and call its accessor; a
//!      returned cause → `NativeUnavailable`.
//!   4. Types: resolve every required type and bind the group
//!      constructor; any failure → `ResolutionFailure`.
//!   5. Domain sockets: resolved only when both names are declared.

use netcap_core::{
    peel, CapabilityRecord, EventLoopGroupConstructor, NamespaceProvider, RecordParts,
    ResolveError, TransportConfig, TypeHandle, TypeKind, TypeLocator, UnavailableCause,
};

use crate::backend::BackendSpec;

fn resolution_failure(err: ResolveError) -> UnavailableCause {
    UnavailableCause::ResolutionFailure(peel(Box::new(err)))
}

/// Probes backends against one locator, namespace provider and config.
pub struct BackendProbe<'a> {
    locator: &'a dyn TypeLocator,
    namespaces: &'a dyn NamespaceProvider,
    config: &'a TransportConfig,
}

impl<'a> BackendProbe<'a> {
    pub fn new(
        locator: &'a dyn TypeLocator,
        namespaces: &'a dyn NamespaceProvider,
        config: &'a TransportConfig,
    ) -> Self {
        Self {
            locator,
            namespaces,
            config,
        }
    }

    /// Produce a fully available or fully unavailable record for `spec`.
    pub fn probe(&self, spec: &BackendSpec) -> CapabilityRecord {
        let _span = tracing::debug_span!("probe", transport = spec.name).entered();

        let Some(namespace) = self.namespaces.namespace(spec.tier) else {
            tracing::debug!(tier = %spec.tier, "namespace unresolved");
            return CapabilityRecord::unavailable(
                spec.name,
                UnavailableCause::NamespaceUnresolved { tier: spec.tier },
            );
        };

        if let Some(token) = spec.opt_in {
            if !self.config.enables(token) {
                tracing::debug!(token, "not enabled explicitly, skipping probe");
                return CapabilityRecord::unavailable(spec.name, UnavailableCause::NotOptedIn { token });
            }
        }

        let parts = match self.resolve(spec, &namespace) {
            Ok(parts) => parts,
            Err(cause) => {
                tracing::debug!(%cause, "transport unavailable");
                return CapabilityRecord::unavailable(spec.name, cause);
            }
        };

        match CapabilityRecord::from_parts(spec.name, parts, None) {
            Ok(record) => {
                tracing::debug!(
                    domain_sockets = record.supports_domain_sockets(),
                    "transport available"
                );
                record
            }
            Err(e) => {
                tracing::error!(error = %e, "probe produced an invalid capability record");
                CapabilityRecord::unavailable(spec.name, UnavailableCause::ResolutionFailure(Box::new(e)))
            }
        }
    }

    fn find(&self, namespace: &str, type_name: &str, kind: TypeKind) -> Result<TypeHandle, UnavailableCause> {
        self.locator
            .resolve(namespace, type_name)
            .and_then(|h| h.ensure_kind(kind))
            .map_err(resolution_failure)
    }

    fn resolve(&self, spec: &BackendSpec, namespace: &str) -> Result<RecordParts, UnavailableCause> {
        // Make sure the native side actually works before anything else.
        let entry_point = self.find(namespace, spec.entry_point, TypeKind::EntryPoint)?;
        if let Some(cause) = entry_point.unavailability_cause().map_err(resolution_failure)? {
            return Err(UnavailableCause::NativeUnavailable(peel(cause)));
        }

        let server_channel = self.find(namespace, spec.server_channel, TypeKind::ServerSocketChannel)?;
        let socket_channel = self.find(namespace, spec.socket_channel, TypeKind::SocketChannel)?;
        let datagram_channel = self.find(namespace, spec.datagram_channel, TypeKind::DatagramChannel)?;
        let event_loop_group = self.find(namespace, spec.event_loop_group, TypeKind::EventLoopGroup)?;
        let event_loop = self.find(namespace, spec.event_loop, TypeKind::EventLoop)?;
        let group_constructor =
            EventLoopGroupConstructor::bind(spec.name, &event_loop_group).map_err(resolution_failure)?;

        let (domain_server_channel, domain_socket_channel) = match spec.domain_sockets() {
            Some((server, socket)) => (
                Some(self.find(namespace, server, TypeKind::ServerDomainSocketChannel)?),
                Some(self.find(namespace, socket, TypeKind::DomainSocketChannel)?),
            ),
            None => (None, None),
        };

        Ok(RecordParts {
            server_channel: Some(server_channel),
            socket_channel: Some(socket_channel),
            domain_server_channel,
            domain_socket_channel,
            datagram_channel: Some(datagram_channel),
            event_loop_group: Some(event_loop_group),
            event_loop: Some(event_loop),
            group_constructor: Some(group_constructor),
        })
    }
}
