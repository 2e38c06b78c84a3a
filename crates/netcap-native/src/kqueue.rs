//! kqueue backend (macOS and the BSDs).

use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::sync::{Arc, OnceLock};

use netcap_core::{BoxError, EventLoopGroup, ThreadFactory, TransportKind, TypeHandle, TypeKind};

use crate::catalog::{qualified, NativeLocator};
use crate::group::NativeEventLoopGroup;

/// Group whose loops each own a kqueue descriptor.
pub type KQueueEventLoopGroup = NativeEventLoopGroup<OwnedFd>;

fn open_kqueue() -> io::Result<OwnedFd> {
    // SAFETY: kqueue() takes no arguments and returns a new descriptor or -1.
    let raw = unsafe { libc::kqueue() };
    if raw < 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: `raw` is a freshly created descriptor owned by nobody else.
    let fd = unsafe { OwnedFd::from_raw_fd(raw) };

    // SAFETY: fd is valid for the duration of the call.
    if unsafe { libc::fcntl(fd.as_raw_fd(), libc::F_SETFD, libc::FD_CLOEXEC) } < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(fd)
}

/// Why kqueue cannot be used in this process, or `None` if it can.
pub fn unavailability_cause() -> Option<BoxError> {
    static PROBE: OnceLock<Option<i32>> = OnceLock::new();

    let errno = *PROBE.get_or_init(|| match open_kqueue() {
        Ok(_) => {
            tracing::debug!("kqueue available");
            None
        }
        Err(e) => {
            tracing::debug!(error = %e, "kqueue unavailable");
            Some(e.raw_os_error().unwrap_or(libc::ENOSYS))
        }
    });

    errno.map(|e| Box::new(io::Error::from_raw_os_error(e)) as BoxError)
}

fn new_group(
    n_threads: usize,
    factory: Arc<dyn ThreadFactory>,
) -> Result<Box<dyn EventLoopGroup>, BoxError> {
    let group = KQueueEventLoopGroup::open(TransportKind::KQueue.name(), n_threads, factory, |_| {
        open_kqueue()
    })?;
    Ok(Box::new(group) as Box<dyn EventLoopGroup>)
}

pub(crate) fn register(locator: &mut NativeLocator, namespace: &str) {
    let name = |rel: &str| qualified(namespace, rel);

    locator.insert(TypeHandle::entry_point(name(".kqueue.KQueue"), unavailability_cause));
    locator.insert(TypeHandle::new(name(".kqueue.KQueueServerSocketChannel"), TypeKind::ServerSocketChannel));
    locator.insert(TypeHandle::new(name(".kqueue.KQueueSocketChannel"), TypeKind::SocketChannel));
    locator.insert(TypeHandle::new(
        name(".kqueue.KQueueServerDomainSocketChannel"),
        TypeKind::ServerDomainSocketChannel,
    ));
    locator.insert(TypeHandle::new(name(".kqueue.KQueueDomainSocketChannel"), TypeKind::DomainSocketChannel));
    locator.insert(TypeHandle::new(name(".kqueue.KQueueDatagramChannel"), TypeKind::DatagramChannel));
    locator.insert(TypeHandle::event_loop_group(name(".kqueue.KQueueEventLoopGroup"), new_group));
    locator.insert(TypeHandle::new(name(".kqueue.KQueueEventLoop"), TypeKind::EventLoop));
}
