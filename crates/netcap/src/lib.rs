//! # netcap: Runtime transport capability resolver
//!
//! Decides at runtime which I/O multiplexing backends the process can
//! use, and hands out their channel and event-loop types through typed,
//! fail-fast accessors.
//!
//! ```text
//! TransportRegistry ── get(kind) ──► OnceLock<CapabilityRecord>
//!        │                                  ▲
//!        │ first access                     │
//!        ▼                                  │
//!  BackendProbe(BackendSpec) ── TypeLocator / NamespaceProvider
//! ```
//!
//! Every record is probed at most once and is either fully available or
//! carries the cause it is not. Asking an unavailable record for a type
//! returns [`TransportError::NotAvailable`] with that cause as `source()`.
//!
//! ```no_run
//! use netcap::{TransportKind, TransportRegistry};
//!
//! let registry = TransportRegistry::from_env();
//! let epoll = registry.get(TransportKind::Epoll);
//! if let Some(cause) = epoll.unavailability_cause() {
//!     println!("epoll unavailable: {cause}");
//! }
//! println!("using {}", registry.preferred().name());
//! ```

pub mod backend;
pub mod probe;
pub mod registry;
pub mod version_check;

#[cfg(test)]
pub(crate) mod test_support;

pub use backend::BackendSpec;
pub use probe::BackendProbe;
pub use registry::{RegistryBuilder, TransportRegistry};
pub use version_check::{check_versions, LinkedVersions, VersionReport};

pub use netcap_core::{
    CapabilityRecord, DefaultThreadFactory, EventLoop, EventLoopGroup, EventLoopGroupConstructor,
    ThreadFactory, TransportConfig, TransportError, TransportKind, TypeHandle, TypeKind,
    UnavailableCause,
};

/// Version of this crate, reported to the version-consistency check.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
