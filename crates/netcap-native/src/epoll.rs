//! Linux epoll backend.
//!
//! Availability is decided by creating one epoll instance. The outcome is
//! cached for the process; later calls never touch the kernel again.

use std::io;
use std::sync::{Arc, OnceLock};

use nix::errno::Errno;
use nix::sys::epoll::{Epoll, EpollCreateFlags};

use netcap_core::{BoxError, EventLoopGroup, ThreadFactory, TransportKind, TypeHandle, TypeKind};

use crate::catalog::{qualified, NativeLocator};
use crate::group::NativeEventLoopGroup;

/// Group whose loops each own an epoll instance.
pub type EpollEventLoopGroup = NativeEventLoopGroup<Epoll>;

fn open_epoll() -> io::Result<Epoll> {
    Epoll::new(EpollCreateFlags::EPOLL_CLOEXEC).map_err(io::Error::from)
}

/// Why epoll cannot be used in this process, or `None` if it can.
pub fn unavailability_cause() -> Option<BoxError> {
    static PROBE: OnceLock<Option<Errno>> = OnceLock::new();

    let errno = *PROBE.get_or_init(|| match Epoll::new(EpollCreateFlags::EPOLL_CLOEXEC) {
        Ok(_) => {
            tracing::debug!("epoll available");
            None
        }
        Err(errno) => {
            tracing::debug!(%errno, "epoll unavailable");
            Some(errno)
        }
    });

    errno.map(|e| Box::new(io::Error::from(e)) as BoxError)
}

fn new_group(
    n_threads: usize,
    factory: Arc<dyn ThreadFactory>,
) -> Result<Box<dyn EventLoopGroup>, BoxError> {
    let group = EpollEventLoopGroup::open(TransportKind::Epoll.name(), n_threads, factory, |_| {
        open_epoll()
    })?;
    Ok(Box::new(group) as Box<dyn EventLoopGroup>)
}

pub(crate) fn register(locator: &mut NativeLocator, namespace: &str) {
    let name = |rel: &str| qualified(namespace, rel);

    locator.insert(TypeHandle::entry_point(name(".epoll.Epoll"), unavailability_cause));
    locator.insert(TypeHandle::new(name(".epoll.EpollServerSocketChannel"), TypeKind::ServerSocketChannel));
    locator.insert(TypeHandle::new(name(".epoll.EpollSocketChannel"), TypeKind::SocketChannel));
    locator.insert(TypeHandle::new(
        name(".epoll.EpollServerDomainSocketChannel"),
        TypeKind::ServerDomainSocketChannel,
    ));
    locator.insert(TypeHandle::new(name(".epoll.EpollDomainSocketChannel"), TypeKind::DomainSocketChannel));
    locator.insert(TypeHandle::new(name(".epoll.EpollDatagramChannel"), TypeKind::DatagramChannel));
    locator.insert(TypeHandle::event_loop_group(name(".epoll.EpollEventLoopGroup"), new_group));
    locator.insert(TypeHandle::new(name(".epoll.EpollEventLoop"), TypeKind::EventLoop));
}

#[cfg(test)]
mod tests {
    use super::*;
    use netcap_core::DefaultThreadFactory;
    use std::os::fd::AsRawFd;

    #[test]
    fn test_epoll_available_on_linux() {
        assert!(unavailability_cause().is_none());
        // Cached
        assert!(unavailability_cause().is_none());
    }

    #[test]
    fn test_group_owns_distinct_instances() {
        let group = EpollEventLoopGroup::open(
            "EPOLL",
            2,
            Arc::new(DefaultThreadFactory::new("epoll")),
            |_| open_epoll(),
        )
        .unwrap();

        let fd0 = group.event_loop(0).unwrap().with_handle(|e| e.0.as_raw_fd()).unwrap();
        let fd1 = group.event_loop(1).unwrap().with_handle(|e| e.0.as_raw_fd()).unwrap();
        assert_ne!(fd0, fd1);
    }
}
