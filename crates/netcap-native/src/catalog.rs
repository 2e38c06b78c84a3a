//! `NativeLocator`: default `TypeLocator` implementation.
//!
//! At creation time, registers the type handles of every backend compiled
//! for the current platform:
//!   - Linux: epoll (standard tier), io_uring (incubator tier)
//!   - macOS / BSD: kqueue (standard tier)
//!   - anything else: nothing; every native backend resolves as missing
//!
//! Registration only records names. No native resource is touched until
//! a backend's entry point accessor is invoked.

use std::collections::HashMap;

use netcap_core::{ResolveError, TypeHandle, TypeLocator};

/// Join a namespace and a relative type name.
pub fn qualified(namespace: &str, type_name: &str) -> String {
    format!("{namespace}{type_name}")
}

/// Catalogue of backend types, keyed by fully qualified name.
#[derive(Debug, Default)]
pub struct NativeLocator {
    types: HashMap<String, TypeHandle>,
}

impl NativeLocator {
    /// Catalogue of the backends built for this platform.
    pub fn new() -> Self {
        let mut locator = Self::empty();

        cfg_if::cfg_if! {
            if #[cfg(target_os = "linux")] {
                crate::epoll::register(&mut locator, crate::namespace::STANDARD_NAMESPACE);
                crate::uring::register(&mut locator, crate::namespace::INCUBATOR_NAMESPACE);
            } else if #[cfg(any(
                target_os = "macos",
                target_os = "ios",
                target_os = "freebsd",
                target_os = "netbsd",
                target_os = "openbsd",
                target_os = "dragonfly"
            ))] {
                crate::kqueue::register(&mut locator, crate::namespace::STANDARD_NAMESPACE);
            }
        }

        tracing::debug!(types = locator.len(), "native type catalogue built");
        locator
    }

    /// A catalogue with no types.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add a handle under its own name, replacing any previous entry.
    pub fn insert(&mut self, handle: TypeHandle) {
        self.types.insert(handle.name().to_string(), handle);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeLocator for NativeLocator {
    fn resolve(&self, namespace: &str, type_name: &str) -> Result<TypeHandle, ResolveError> {
        let name = qualified(namespace, type_name);
        match self.types.get(&name) {
            Some(handle) => Ok(handle.clone()),
            None => Err(ResolveError::NotFound(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netcap_core::TypeKind;

    #[test]
    fn test_resolve_registered() {
        let mut locator = NativeLocator::empty();
        locator.insert(TypeHandle::new("ns.x.Foo", TypeKind::SocketChannel));

        let handle = locator.resolve("ns", ".x.Foo").unwrap();
        assert_eq!(handle.kind(), TypeKind::SocketChannel);
        assert!(handle.same(&locator.resolve("ns", ".x.Foo").unwrap()));
    }

    #[test]
    fn test_resolve_missing() {
        let locator = NativeLocator::empty();
        match locator.resolve("ns", ".x.Missing") {
            Err(ResolveError::NotFound(name)) => assert_eq!(name, "ns.x.Missing"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_linux_catalogue() {
        use crate::namespace::{INCUBATOR_NAMESPACE, STANDARD_NAMESPACE};

        let locator = NativeLocator::new();
        assert!(locator.contains(&qualified(STANDARD_NAMESPACE, ".epoll.Epoll")));
        assert!(locator.contains(&qualified(STANDARD_NAMESPACE, ".epoll.EpollDomainSocketChannel")));
        assert!(locator.contains(&qualified(INCUBATOR_NAMESPACE, ".uring.IOUring")));
        assert!(!locator.contains(&qualified(STANDARD_NAMESPACE, ".kqueue.KQueue")));
    }
}
