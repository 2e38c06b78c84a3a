//! Executor abstractions exposed by every backend.
//!
//! Backends supply the implementations; this module only fixes the
//! surface the rest of the stack programs against, plus the bound
//! constructor stored in a capability record.

use std::fmt;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::error::{peel, TransportError};
use crate::locator::ResolveError;
use crate::types::{RawGroupConstructor, TypeHandle};

/// Creates the OS threads an event loop group runs on.
pub trait ThreadFactory: Send + Sync {
    fn new_thread(&self, task: Box<dyn FnOnce() + Send + 'static>) -> io::Result<JoinHandle<()>>;
}

/// Names threads `<prefix>-<n>`, counting from 1.
#[derive(Debug)]
pub struct DefaultThreadFactory {
    prefix: String,
    next_id: AtomicUsize,
}

impl DefaultThreadFactory {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next_id: AtomicUsize::new(1),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl ThreadFactory for DefaultThreadFactory {
    fn new_thread(&self, task: Box<dyn FnOnce() + Send + 'static>) -> io::Result<JoinHandle<()>> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        thread::Builder::new()
            .name(format!("{}-{}", self.prefix, id))
            .spawn(task)
    }
}

/// A single executor owned by a group.
pub trait EventLoop: Send + Sync {
    /// Name of the backend this loop belongs to.
    fn transport(&self) -> &str;

    /// Position within the owning group.
    fn index(&self) -> usize;

    /// Whether the loop still holds its native resources.
    fn is_open(&self) -> bool;

    /// Release native resources. Idempotent.
    fn close(&self);
}

/// A fixed-size set of event loops.
pub trait EventLoopGroup: Send + Sync {
    fn transport(&self) -> &str;

    /// Number of event loops (one per thread).
    fn thread_count(&self) -> usize;

    /// Next loop in round-robin order.
    fn next(&self) -> &dyn EventLoop;

    /// Factory handed to the constructor.
    fn thread_factory(&self) -> &Arc<dyn ThreadFactory>;

    /// Close every loop. Idempotent.
    fn shutdown(&self);

    fn is_shutdown(&self) -> bool;
}

/// Thread count used when the caller passes 0.
pub fn default_thread_count() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        * 2
}

/// Group constructor resolved once during probing.
///
/// Cloning is cheap and every clone can be invoked concurrently; each
/// call builds an independent group.
#[derive(Clone)]
pub struct EventLoopGroupConstructor {
    transport: &'static str,
    group_type: TypeHandle,
    raw: RawGroupConstructor,
}

impl EventLoopGroupConstructor {
    /// Bind the `(count, factory)` constructor of `group_type`.
    pub fn bind(transport: &'static str, group_type: &TypeHandle) -> Result<Self, ResolveError> {
        let raw = group_type.group_constructor()?;
        Ok(Self {
            transport,
            group_type: group_type.clone(),
            raw,
        })
    }

    pub fn transport(&self) -> &'static str {
        self.transport
    }

    /// The type this constructor builds.
    pub fn group_type(&self) -> &TypeHandle {
        &self.group_type
    }

    /// Build a group with `n_threads` loops (0 means [`default_thread_count`]).
    pub fn construct(
        &self,
        n_threads: usize,
        factory: Arc<dyn ThreadFactory>,
    ) -> Result<Box<dyn EventLoopGroup>, TransportError> {
        let n_threads = if n_threads == 0 {
            default_thread_count()
        } else {
            n_threads
        };

        (self.raw)(n_threads, factory).map_err(|e| TransportError::GroupConstruction {
            name: self.transport,
            source: peel(e),
        })
    }
}

impl fmt::Debug for EventLoopGroupConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLoopGroupConstructor")
            .field("transport", &self.transport)
            .field("group_type", &self.group_type.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::types::TypeKind;
    use std::sync::atomic::AtomicBool;

    struct TestLoop {
        index: usize,
        open: AtomicBool,
    }

    impl EventLoop for TestLoop {
        fn transport(&self) -> &str {
            "TEST"
        }
        fn index(&self) -> usize {
            self.index
        }
        fn is_open(&self) -> bool {
            self.open.load(Ordering::Acquire)
        }
        fn close(&self) {
            self.open.store(false, Ordering::Release);
        }
    }

    struct TestGroup {
        loops: Vec<TestLoop>,
        factory: Arc<dyn ThreadFactory>,
    }

    impl EventLoopGroup for TestGroup {
        fn transport(&self) -> &str {
            "TEST"
        }
        fn thread_count(&self) -> usize {
            self.loops.len()
        }
        fn next(&self) -> &dyn EventLoop {
            &self.loops[0]
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

    fn test_group_type() -> TypeHandle {
        TypeHandle::event_loop_group("test.TestGroup", |n, factory| {
            let loops = (0..n)
                .map(|index| TestLoop {
                    index,
                    open: AtomicBool::new(true),
                })
                .collect();
            Ok(Box::new(TestGroup { loops, factory }) as Box<dyn EventLoopGroup>)
        })
    }

    #[test]
    fn test_default_thread_factory_names() {
        let factory = DefaultThreadFactory::new("netcap-test");
        let handle = factory
            .new_thread(Box::new(|| {
                assert_eq!(thread::current().name(), Some("netcap-test-1"));
            }))
            .unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn test_construct_requested_count() {
        let ctor = EventLoopGroupConstructor::bind("TEST", &test_group_type()).unwrap();
        let group = ctor
            .construct(4, Arc::new(DefaultThreadFactory::new("t")))
            .unwrap();
        assert_eq!(group.thread_count(), 4);
        assert!(!group.is_shutdown());
        group.shutdown();
        assert!(group.is_shutdown());
    }

    #[test]
    fn test_construct_zero_uses_default() {
        let ctor = EventLoopGroupConstructor::bind("TEST", &test_group_type()).unwrap();
        let group = ctor
            .construct(0, Arc::new(DefaultThreadFactory::new("t")))
            .unwrap();
        assert_eq!(group.thread_count(), default_thread_count());
    }

    #[test]
    fn test_bind_requires_constructor() {
        let plain = TypeHandle::new("test.NoCtor", TypeKind::EventLoopGroup);
        assert!(matches!(
            EventLoopGroupConstructor::bind("TEST", &plain),
            Err(ResolveError::MissingMember { .. })
        ));
    }

    #[test]
    fn test_construct_failure_is_peeled() {
        let failing = TypeHandle::event_loop_group("test.Failing", |_, _| {
            let root: BoxError = Box::new(io::Error::from(io::ErrorKind::OutOfMemory));
            Err(Box::new(ResolveError::Invocation(root)) as BoxError)
        });
        let ctor = EventLoopGroupConstructor::bind("TEST", &failing).unwrap();

        let err = ctor
            .construct(1, Arc::new(DefaultThreadFactory::new("t")))
            .err()
            .unwrap();
        match err {
            TransportError::GroupConstruction { name, source } => {
                assert_eq!(name, "TEST");
                assert!(source.downcast_ref::<io::Error>().is_some());
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
