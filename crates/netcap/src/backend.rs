//! Declarations of the probed backends.
//!
//! Each [`BackendSpec`] lists the relative type names the probe resolves
//! inside the backend's namespace. Names are joined to the namespace
//! as-is, so they carry their leading separator.

use netcap_core::{Tier, TransportKind};

/// Static description of one probed backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendSpec {
    pub name: &'static str,
    pub tier: Tier,
    /// Configuration token that must be set before this backend is even
    /// probed. `None` for backends that are safe to probe unconditionally.
    pub opt_in: Option<&'static str>,
    pub entry_point: &'static str,
    pub server_channel: &'static str,
    pub socket_channel: &'static str,
    pub domain_server_channel: Option<&'static str>,
    pub domain_socket_channel: Option<&'static str>,
    pub datagram_channel: &'static str,
    pub event_loop_group: &'static str,
    pub event_loop: &'static str,
}

pub const EPOLL: BackendSpec = BackendSpec {
    name: TransportKind::Epoll.name(),
    tier: Tier::Standard,
    opt_in: None,
    entry_point: ".epoll.Epoll",
    server_channel: ".epoll.EpollServerSocketChannel",
    socket_channel: ".epoll.EpollSocketChannel",
    domain_server_channel: Some(".epoll.EpollServerDomainSocketChannel"),
    domain_socket_channel: Some(".epoll.EpollDomainSocketChannel"),
    datagram_channel: ".epoll.EpollDatagramChannel",
    event_loop_group: ".epoll.EpollEventLoopGroup",
    event_loop: ".epoll.EpollEventLoop",
};

pub const KQUEUE: BackendSpec = BackendSpec {
    name: TransportKind::KQueue.name(),
    tier: Tier::Standard,
    opt_in: None,
    entry_point: ".kqueue.KQueue",
    server_channel: ".kqueue.KQueueServerSocketChannel",
    socket_channel: ".kqueue.KQueueSocketChannel",
    domain_server_channel: Some(".kqueue.KQueueServerDomainSocketChannel"),
    domain_socket_channel: Some(".kqueue.KQueueDomainSocketChannel"),
    datagram_channel: ".kqueue.KQueueDatagramChannel",
    event_loop_group: ".kqueue.KQueueEventLoopGroup",
    event_loop: ".kqueue.KQueueEventLoop",
};

// Touching io_uring on some kernels can take the whole process down, so
// it is gated behind an explicit opt-in.
pub const IO_URING: BackendSpec = BackendSpec {
    name: TransportKind::IoUring.name(),
    tier: Tier::Incubator,
    opt_in: Some(TransportKind::IoUring.token()),
    entry_point: ".uring.IOUring",
    server_channel: ".uring.IOUringServerSocketChannel",
    socket_channel: ".uring.IOUringSocketChannel",
    domain_server_channel: None,
    domain_socket_channel: None,
    datagram_channel: ".uring.IOUringDatagramChannel",
    event_loop_group: ".uring.IOUringEventLoopGroup",
    event_loop: ".uring.IOUringEventLoop",
};

impl BackendSpec {
    /// The probed declaration for `kind`. `None` for NIO, which is built
    /// directly.
    pub fn for_kind(kind: TransportKind) -> Option<&'static BackendSpec> {
        match kind {
            TransportKind::Nio => None,
            TransportKind::Epoll => Some(&EPOLL),
            TransportKind::KQueue => Some(&KQUEUE),
            TransportKind::IoUring => Some(&IO_URING),
        }
    }

    /// Domain socket names, only when both are declared.
    pub fn domain_sockets(&self) -> Option<(&'static str, &'static str)> {
        self.domain_server_channel.zip(self.domain_socket_channel)
    }
}
