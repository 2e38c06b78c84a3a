//! Event loop group shared by every native backend.
//!
//! Each loop owns one native multiplexer handle (an epoll instance, a
//! kqueue, an io_uring ring, or nothing for the portable fallback). The
//! handle is released on `close()` or when the group is dropped.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use netcap_core::{EventLoop, EventLoopGroup, ThreadFactory};

/// A loop holding a native handle of type `H`.
pub struct NativeEventLoop<H> {
    transport: &'static str,
    index: usize,
    handle: Mutex<Option<H>>,
}

impl<H: Send> NativeEventLoop<H> {
    pub fn new(transport: &'static str, index: usize, handle: H) -> Self {
        Self {
            transport,
            index,
            handle: Mutex::new(Some(handle)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<H>> {
        self.handle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against the native handle, or return `None` once closed.
    pub fn with_handle<R>(&self, f: impl FnOnce(&H) -> R) -> Option<R> {
        self.lock().as_ref().map(f)
    }
}

impl<H: Send> EventLoop for NativeEventLoop<H> {
    fn transport(&self) -> &str {
        self.transport
    }

    fn index(&self) -> usize {
        self.index
    }

    fn is_open(&self) -> bool {
        self.lock().is_some()
    }

    fn close(&self) {
        // Dropping the handle closes the descriptor.
        drop(self.lock().take());
    }
}

/// Fixed-size group of [`NativeEventLoop`]s.
pub struct NativeEventLoopGroup<H> {
    transport: &'static str,
    loops: Vec<NativeEventLoop<H>>,
    next: AtomicUsize,
    factory: Arc<dyn ThreadFactory>,
}

impl<H: Send> NativeEventLoopGroup<H> {
    /// Open `n_threads` loops, calling `open(index)` for each native handle.
    ///
    /// Handles opened before a failure are released before returning.
    pub fn open<F>(
        transport: &'static str,
        n_threads: usize,
        factory: Arc<dyn ThreadFactory>,
        mut open: F,
    ) -> io::Result<Self>
    where
        F: FnMut(usize) -> io::Result<H>,
    {
        if n_threads == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "event loop group needs at least one thread",
            ));
        }

        let loops = (0..n_threads)
            .map(|index| open(index).map(|h| NativeEventLoop::new(transport, index, h)))
            .collect::<io::Result<Vec<_>>>()?;

        tracing::debug!(transport, n_threads, "event loop group opened");

        Ok(Self {
            transport,
            loops,
            next: AtomicUsize::new(0),
            factory,
        })
    }

    pub fn event_loop(&self, index: usize) -> Option<&NativeEventLoop<H>> {
        self.loops.get(index)
    }
}

impl<H: Send> EventLoopGroup for NativeEventLoopGroup<H> {
    fn transport(&self) -> &str {
        self.transport
    }

    fn thread_count(&self) -> usize {
        self.loops.len()
    }

    fn next(&self) -> &dyn EventLoop {
        let i = self.next.fetch_add(1, Ordering::Relaxed) % self.loops.len();
        &self.loops[i]
    }

    fn thread_factory(&self) -> &Arc<dyn ThreadFactory> {
        &self.factory
    }

    fn shutdown(&self) {
        self.loops.iter().for_each(|l| l.close());
    }

    fn is_shutdown(&self) -> bool {
        self.loops.iter().all(|l| !l.is_open())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netcap_core::DefaultThreadFactory;

    fn factory() -> Arc<dyn ThreadFactory> {
        Arc::new(DefaultThreadFactory::new("group-test"))
    }

    #[test]
    fn test_round_robin() {
        let group = NativeEventLoopGroup::open("TEST", 3, factory(), |i| Ok(i * 10)).unwrap();
        let order: Vec<usize> = (0..6).map(|_| group.next().index()).collect();
        assert_eq!(order, vec![0, 1, 2, 0, 1, 2]);
        assert_eq!(group.event_loop(2).unwrap().with_handle(|h| *h), Some(20));
    }

    #[test]
    fn test_shutdown_releases_handles() {
        let group = NativeEventLoopGroup::open("TEST", 2, factory(), |_| Ok(())).unwrap();
        assert!(!group.is_shutdown());
        group.shutdown();
        assert!(group.is_shutdown());
        assert!(group.event_loop(0).unwrap().with_handle(|_| ()).is_none());
        // Idempotent
        group.shutdown();
    }

    #[test]
    fn test_open_failure_propagates() {
        let result = NativeEventLoopGroup::<()>::open("TEST", 4, factory(), |i| {
            if i == 2 {
                Err(io::Error::from(io::ErrorKind::Other))
            } else {
                Ok(())
            }
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_threads_rejected() {
        let result = NativeEventLoopGroup::<()>::open("TEST", 0, factory(), |_| Ok(()));
        assert_eq!(result.err().unwrap().kind(), io::ErrorKind::InvalidInput);
    }
}
