//! Fakes shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use netcap_core::{
    BoxError, EventLoopGroup, NamespaceProvider, ResolveError, Tier, TypeHandle, TypeKind,
    TypeLocator,
};
use netcap_native::{NativeEventLoopGroup, NativeLocator};

use crate::backend::BackendSpec;

/// Never needs native code.
pub(crate) const FALLBACK: BackendSpec = BackendSpec {
    name: "FALLBACK",
    tier: Tier::Standard,
    opt_in: None,
    entry_point: ".fallback.Fallback",
    server_channel: ".fallback.FallbackServerSocketChannel",
    socket_channel: ".fallback.FallbackSocketChannel",
    domain_server_channel: None,
    domain_socket_channel: None,
    datagram_channel: ".fallback.FallbackDatagramChannel",
    event_loop_group: ".fallback.FallbackEventLoopGroup",
    event_loop: ".fallback.FallbackEventLoop",
};

/// Gated behind the `risky` token.
pub(crate) const RISKY: BackendSpec = BackendSpec {
    name: "RISKY",
    tier: Tier::Incubator,
    opt_in: Some("risky"),
    entry_point: ".risky.Risky",
    server_channel: ".risky.RiskyServerSocketChannel",
    socket_channel: ".risky.RiskySocketChannel",
    domain_server_channel: None,
    domain_socket_channel: None,
    datagram_channel: ".risky.RiskyDatagramChannel",
    event_loop_group: ".risky.RiskyEventLoopGroup",
    event_loop: ".risky.RiskyEventLoop",
};

/// Declares Unix-domain socket channels.
pub(crate) const DOMAIN: BackendSpec = BackendSpec {
    name: "DOMAIN",
    tier: Tier::Standard,
    opt_in: None,
    entry_point: ".domain.Domain",
    server_channel: ".domain.DomainServerChannel",
    socket_channel: ".domain.DomainChannel",
    domain_server_channel: Some(".domain.DomainServerDomainSocketChannel"),
    domain_socket_channel: Some(".domain.DomainDomainSocketChannel"),
    datagram_channel: ".domain.DomainDatagramChannel",
    event_loop_group: ".domain.DomainEventLoopGroup",
    event_loop: ".domain.DomainEventLoop",
};

/// Same namespace for every tier, or none at all.
pub(crate) struct FixedNamespaces(Option<String>);

impl FixedNamespaces {
    pub(crate) const NAMESPACE: &'static str = "fake";

    pub(crate) fn some() -> Self {
        Self(Some(Self::NAMESPACE.to_string()))
    }

    pub(crate) fn none() -> Self {
        Self(None)
    }
}

impl NamespaceProvider for FixedNamespaces {
    fn namespace(&self, _tier: Tier) -> Option<String> {
        self.0.clone()
    }
}

/// Counts every `resolve` call.
pub(crate) struct CountingLocator {
    inner: NativeLocator,
    calls: AtomicUsize,
}

impl CountingLocator {
    pub(crate) fn new(inner: NativeLocator) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TypeLocator for CountingLocator {
    fn resolve(&self, namespace: &str, type_name: &str) -> Result<TypeHandle, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve(namespace, type_name)
    }
}

pub(crate) type CauseFn = fn() -> Option<BoxError>;

fn no_cause() -> Option<BoxError> {
    None
}

/// Insert every type `spec` declares, with a working group constructor.
pub(crate) fn register_backend(
    locator: &mut NativeLocator,
    namespace: &str,
    spec: &BackendSpec,
    cause: Option<CauseFn>,
) {
    let name = |rel: &str| format!("{namespace}{rel}");
    let transport = spec.name;

    locator.insert(TypeHandle::entry_point(name(spec.entry_point), cause.unwrap_or(no_cause)));
    locator.insert(TypeHandle::new(name(spec.server_channel), TypeKind::ServerSocketChannel));
    locator.insert(TypeHandle::new(name(spec.socket_channel), TypeKind::SocketChannel));
    if let Some((server, socket)) = spec.domain_sockets() {
        locator.insert(TypeHandle::new(name(server), TypeKind::ServerDomainSocketChannel));
        locator.insert(TypeHandle::new(name(socket), TypeKind::DomainSocketChannel));
    }
    locator.insert(TypeHandle::new(name(spec.datagram_channel), TypeKind::DatagramChannel));
    locator.insert(TypeHandle::event_loop_group(name(spec.event_loop_group), move |n, factory| {
        let group = NativeEventLoopGroup::open(transport, n, factory, |_| Ok(()))?;
        Ok(Box::new(group) as Box<dyn EventLoopGroup>)
    }));
    locator.insert(TypeHandle::new(name(spec.event_loop), TypeKind::EventLoop));
}

/// A counting locator holding the given backends under the fake namespace.
pub(crate) fn fake_locator(backends: &[(&BackendSpec, Option<CauseFn>)]) -> CountingLocator {
    let mut inner = NativeLocator::empty();
    for (spec, cause) in backends {
        register_backend(&mut inner, FixedNamespaces::NAMESPACE, spec, *cause);
    }
    CountingLocator::new(inner)
}
