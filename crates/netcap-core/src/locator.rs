//! Dynamic type resolution seams.
//!
//! A backend's implementation may be absent from the process entirely.
//! Nothing here names a concrete backend type; instead a [`TypeLocator`]
//! is asked for a type by `(namespace, name)` and either hands back an
//! opaque [`TypeHandle`] or reports why it could not.
//!
//! # Implementors
//!
//! - `NativeLocator` (netcap-native): catalogue of the backends compiled
//!   for the current platform.
//! - Test fakes that simulate presence or absence without touching native
//!   libraries.

use std::fmt;

use thiserror::Error;

use crate::error::BoxError;
use crate::types::{TypeHandle, TypeKind};

/// Which namespace tier a backend lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Stable, always-shipped backends (epoll, kqueue).
    Standard,
    /// Experimental backends shipped separately (io_uring).
    Incubator,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Standard => f.write_str("standard"),
            Tier::Incubator => f.write_str("incubator"),
        }
    }
}

/// Errors reported by a [`TypeLocator`].
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No type with this fully qualified name exists.
    #[error("type not found: {0}")]
    NotFound(String),

    /// The name resolved, but to a different kind of type.
    #[error("type {name} is a {actual:?}, expected {expected:?}")]
    KindMismatch {
        name: String,
        expected: TypeKind,
        actual: TypeKind,
    },

    /// The type lacks an accessor or constructor the caller needs.
    #[error("{type_name} has no {member}")]
    MissingMember {
        type_name: String,
        member: &'static str,
    },

    /// Static initialization of a type failed. Wrapper; peeled away.
    #[error("failed to initialize {type_name}: {source}")]
    Initialization {
        type_name: String,
        #[source]
        source: BoxError,
    },

    /// A dynamically bound call failed. Wrapper; peeled away.
    #[error("invocation failed: {0}")]
    Invocation(#[source] BoxError),
}

/// Resolves type names to handles.
///
/// `namespace` and `type_name` are joined as-is, so relative names such as
/// `".epoll.Epoll"` carry their own separator.
pub trait TypeLocator: Send + Sync {
    fn resolve(&self, namespace: &str, type_name: &str) -> Result<TypeHandle, ResolveError>;
}

/// Yields the implementation namespace for each tier.
///
/// `None` means the namespace could not be determined (e.g. the hosting
/// library was repackaged or could not be located).
pub trait NamespaceProvider: Send + Sync {
    fn namespace(&self, tier: Tier) -> Option<String>;
}

impl<T: TypeLocator + ?Sized> TypeLocator for Box<T> {
    fn resolve(&self, namespace: &str, type_name: &str) -> Result<TypeHandle, ResolveError> {
        (**self).resolve(namespace, type_name)
    }
}

impl<T: NamespaceProvider + ?Sized> NamespaceProvider for Box<T> {
    fn namespace(&self, tier: Tier) -> Option<String> {
        (**self).namespace(tier)
    }
}
