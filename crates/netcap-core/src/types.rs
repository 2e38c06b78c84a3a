//! Opaque type handles.
//!
//! A [`TypeHandle`] stands in for a backend type that is only known at
//! runtime. Handles are reference-counted; cloning one is a pointer copy
//! and [`TypeHandle::same`] compares identity.

use std::fmt;
use std::sync::Arc;

use crate::error::BoxError;
use crate::event_loop::{EventLoopGroup, ThreadFactory};
use crate::locator::ResolveError;

/// Structural role of a resolved type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Backend entry point exposing the unavailability accessor.
    EntryPoint,
    /// Listening socket channel.
    ServerSocketChannel,
    /// Connected socket channel.
    SocketChannel,
    /// Listening Unix-domain socket channel.
    ServerDomainSocketChannel,
    /// Connected Unix-domain socket channel.
    DomainSocketChannel,
    /// Datagram channel.
    DatagramChannel,
    /// Executor group.
    EventLoopGroup,
    /// Single executor.
    EventLoop,
}

/// Zero-argument accessor returning why a backend is unusable, if it is.
pub type UnavailabilityFn = Arc<dyn Fn() -> Option<BoxError> + Send + Sync>;

/// Unbound `(thread count, thread factory)` constructor of a group type.
pub type RawGroupConstructor = Arc<
    dyn Fn(usize, Arc<dyn ThreadFactory>) -> Result<Box<dyn EventLoopGroup>, BoxError>
        + Send
        + Sync,
>;

enum Member {
    None,
    UnavailabilityCause(UnavailabilityFn),
    GroupConstructor(RawGroupConstructor),
}

struct TypeInfo {
    name: String,
    kind: TypeKind,
    member: Member,
}

/// Handle to a runtime-resolved type.
#[derive(Clone)]
pub struct TypeHandle(Arc<TypeInfo>);

impl TypeHandle {
    /// A plain type with no callable members.
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self::with_member(name.into(), kind, Member::None)
    }

    /// An entry point whose accessor reports the backend's unavailability.
    pub fn entry_point<F>(name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn() -> Option<BoxError> + Send + Sync + 'static,
    {
        Self::with_member(
            name.into(),
            TypeKind::EntryPoint,
            Member::UnavailabilityCause(Arc::new(accessor)),
        )
    }

    /// An event loop group type with a `(count, factory)` constructor.
    pub fn event_loop_group<F>(name: impl Into<String>, constructor: F) -> Self
    where
        F: Fn(usize, Arc<dyn ThreadFactory>) -> Result<Box<dyn EventLoopGroup>, BoxError>
            + Send
            + Sync
            + 'static,
    {
        Self::with_member(
            name.into(),
            TypeKind::EventLoopGroup,
            Member::GroupConstructor(Arc::new(constructor)),
        )
    }

    fn with_member(name: String, kind: TypeKind, member: Member) -> Self {
        Self(Arc::new(TypeInfo { name, kind, member }))
    }

    /// Fully qualified name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Last path segment of the name.
    pub fn simple_name(&self) -> &str {
        let name = self.name();
        let start = name
            .rfind(|c| c == '.' || c == ':')
            .map(|i| i + 1)
            .unwrap_or(0);
        &name[start..]
    }

    #[inline]
    pub fn kind(&self) -> TypeKind {
        self.0.kind
    }

    /// Identity comparison: both handles point at the same resolved type.
    #[inline]
    pub fn same(&self, other: &TypeHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Check the kind, consuming the handle on success.
    pub fn ensure_kind(self, expected: TypeKind) -> Result<Self, ResolveError> {
        if self.kind() == expected {
            Ok(self)
        } else {
            Err(ResolveError::KindMismatch {
                name: self.name().to_string(),
                expected,
                actual: self.kind(),
            })
        }
    }

    /// Invoke the entry point's unavailability accessor.
    pub fn unavailability_cause(&self) -> Result<Option<BoxError>, ResolveError> {
        match &self.0.member {
            Member::UnavailabilityCause(accessor) => Ok(accessor()),
            _ => Err(ResolveError::MissingMember {
                type_name: self.name().to_string(),
                member: "unavailability cause accessor",
            }),
        }
    }

    /// Look up the `(count, factory)` constructor.
    pub fn group_constructor(&self) -> Result<RawGroupConstructor, ResolveError> {
        match &self.0.member {
            Member::GroupConstructor(ctor) => Ok(Arc::clone(ctor)),
            _ => Err(ResolveError::MissingMember {
                type_name: self.name().to_string(),
                member: "(thread count, thread factory) constructor",
            }),
        }
    }
}

impl PartialEq for TypeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.same(other) || (self.kind() == other.kind() && self.name() == other.name())
    }
}

impl Eq for TypeHandle {}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeHandle")
            .field("name", &self.name())
            .field("kind", &self.kind())
            .finish()
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_simple_name() {
        let h = TypeHandle::new("netcap_native::channel.epoll.EpollSocketChannel", TypeKind::SocketChannel);
        assert_eq!(h.simple_name(), "EpollSocketChannel");

        let h = TypeHandle::new("Plain", TypeKind::EventLoop);
        assert_eq!(h.simple_name(), "Plain");
    }

    #[test]
    fn test_identity_vs_equality() {
        let a = TypeHandle::new("x.A", TypeKind::SocketChannel);
        let b = a.clone();
        let c = TypeHandle::new("x.A", TypeKind::SocketChannel);

        assert!(a.same(&b));
        assert!(!a.same(&c));
        assert_eq!(a, c);
    }

    #[test]
    fn test_ensure_kind() {
        let h = TypeHandle::new("x.A", TypeKind::SocketChannel);
        assert!(h.clone().ensure_kind(TypeKind::SocketChannel).is_ok());
        assert!(matches!(
            h.ensure_kind(TypeKind::DatagramChannel),
            Err(ResolveError::KindMismatch { expected: TypeKind::DatagramChannel, .. })
        ));
    }

    #[test]
    fn test_entry_point_accessor() {
        let ok = TypeHandle::entry_point("x.Ok", || None);
        assert!(ok.unavailability_cause().unwrap().is_none());

        let bad = TypeHandle::entry_point("x.Bad", || {
            Some(Box::new(io::Error::from(io::ErrorKind::Unsupported)) as BoxError)
        });
        assert!(bad.unavailability_cause().unwrap().is_some());

        let plain = TypeHandle::new("x.Plain", TypeKind::EntryPoint);
        assert!(matches!(
            plain.unavailability_cause(),
            Err(ResolveError::MissingMember { .. })
        ));
    }

    #[test]
    fn test_missing_group_constructor() {
        let h = TypeHandle::new("x.Group", TypeKind::EventLoopGroup);
        assert!(matches!(
            h.group_constructor(),
            Err(ResolveError::MissingMember { .. })
        ));
    }
}
