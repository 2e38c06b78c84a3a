//! Linux io_uring backend (incubator tier).
//!
//! Availability means: a ring can be created, `IORING_REGISTER_PROBE`
//! works, and the kernel supports the socket opcodes a transport needs
//! (accept, connect, send, recv). No Unix-domain socket channels.

use std::io;
use std::sync::{Arc, OnceLock};

use io_uring::{opcode, IoUring, Probe};

use netcap_core::{BoxError, EventLoopGroup, ThreadFactory, TransportKind, TypeHandle, TypeKind};

use crate::catalog::{qualified, NativeLocator};
use crate::group::NativeEventLoopGroup;

/// Submission queue entries per event loop ring.
pub const RING_ENTRIES: u32 = 256;

/// Entries for the throwaway ring used while probing.
const PROBE_ENTRIES: u32 = 2;

/// Group whose loops each own an io_uring instance.
pub type IoUringEventLoopGroup = NativeEventLoopGroup<IoUring>;

const REQUIRED_OPCODES: [(u8, &str); 4] = [
    (opcode::Accept::CODE, "accept"),
    (opcode::Connect::CODE, "connect"),
    (opcode::Send::CODE, "send"),
    (opcode::Recv::CODE, "recv"),
];

fn probe_kernel() -> io::Result<()> {
    let ring = IoUring::new(PROBE_ENTRIES)?;
    let mut probe = Probe::new();
    ring.submitter().register_probe(&mut probe)?;

    let missing: Vec<&str> = REQUIRED_OPCODES
        .iter()
        .filter(|(code, _)| !probe.is_supported(*code))
        .map(|(_, name)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("kernel io_uring lacks opcodes: {}", missing.join(", ")),
        ))
    }
}

#[derive(Debug, Clone)]
struct ProbeFailure {
    raw_os_error: Option<i32>,
    kind: io::ErrorKind,
    message: String,
}

impl ProbeFailure {
    fn to_error(&self) -> io::Error {
        match self.raw_os_error {
            Some(code) => io::Error::from_raw_os_error(code),
            None => io::Error::new(self.kind, self.message.clone()),
        }
    }
}

/// Why io_uring cannot be used in this process, or `None` if it can.
pub fn unavailability_cause() -> Option<BoxError> {
    static PROBE: OnceLock<Option<ProbeFailure>> = OnceLock::new();

    PROBE
        .get_or_init(|| match probe_kernel() {
            Ok(()) => {
                tracing::debug!("io_uring available");
                None
            }
            Err(e) => {
                tracing::debug!(error = %e, "io_uring unavailable");
                Some(ProbeFailure {
                    raw_os_error: e.raw_os_error(),
                    kind: e.kind(),
                    message: e.to_string(),
                })
            }
        })
        .as_ref()
        .map(|f| Box::new(f.to_error()) as BoxError)
}

fn new_group(
    n_threads: usize,
    factory: Arc<dyn ThreadFactory>,
) -> Result<Box<dyn EventLoopGroup>, BoxError> {
    let group = IoUringEventLoopGroup::open(TransportKind::IoUring.name(), n_threads, factory, |_| {
        IoUring::new(RING_ENTRIES)
    })?;
    Ok(Box::new(group) as Box<dyn EventLoopGroup>)
}

pub(crate) fn register(locator: &mut NativeLocator, namespace: &str) {
    let name = |rel: &str| qualified(namespace, rel);

    locator.insert(TypeHandle::entry_point(name(".uring.IOUring"), unavailability_cause));
    locator.insert(TypeHandle::new(name(".uring.IOUringServerSocketChannel"), TypeKind::ServerSocketChannel));
    locator.insert(TypeHandle::new(name(".uring.IOUringSocketChannel"), TypeKind::SocketChannel));
    locator.insert(TypeHandle::new(name(".uring.IOUringDatagramChannel"), TypeKind::DatagramChannel));
    locator.insert(TypeHandle::event_loop_group(name(".uring.IOUringEventLoopGroup"), new_group));
    locator.insert(TypeHandle::new(name(".uring.IOUringEventLoop"), TypeKind::EventLoop));
}

#[cfg(test)]
mod tests {
    use super::*;
    use netcap_core::DefaultThreadFactory;

    #[test]
    fn test_probe_result_is_cached() {
        // io_uring may be blocked (seccomp, sysctl); only the stability of
        // the answer is asserted.
        let first = unavailability_cause().map(|e| e.to_string());
        let second = unavailability_cause().map(|e| e.to_string());
        assert_eq!(first, second);
    }

    #[test]
    fn test_group_when_available() {
        if unavailability_cause().is_some() {
            return;
        }
        let group = new_group(2, Arc::new(DefaultThreadFactory::new("uring"))).unwrap();
        assert_eq!(group.thread_count(), 2);
        assert_eq!(group.transport(), "IO_URING");
    }

    #[test]
    fn test_no_domain_socket_types() {
        let mut locator = NativeLocator::empty();
        register(&mut locator, "ns");
        assert!(locator.contains("ns.uring.IOUringSocketChannel"));
        assert!(!locator.contains("ns.uring.IOUringDomainSocketChannel"));
    }
}
