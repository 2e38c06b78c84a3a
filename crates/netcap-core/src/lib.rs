//! # netcap-core
//!
//! Types and traits for runtime transport capability resolution.
//!
//! This crate names no concrete backend. Backends (epoll, kqueue,
//! io_uring, the portable fallback) are reached only through opaque
//! [`TypeHandle`]s handed out by a [`TypeLocator`], so a backend that is
//! missing from the process costs nothing and cannot crash it.
//!
//! ## Modules
//!
//! - `kind` - Known transport backends
//! - `types` - Opaque type handles
//! - `locator` - Type locator and namespace provider seams
//! - `event_loop` - Event loop, group and thread factory traits
//! - `record` - Validated capability records
//! - `error` - Unavailability causes and accessor errors
//! - `config` - Transport configuration
//! - `env` - Environment variable utilities
//! - `version` - Linked artifact version metadata

pub mod kind;
pub mod types;
pub mod locator;
pub mod event_loop;
pub mod record;
pub mod error;
pub mod config;
pub mod env;
pub mod version;

// Re-exports for convenience
pub use kind::{ParseTransportError, TransportKind};
pub use types::{RawGroupConstructor, TypeHandle, TypeKind, UnavailabilityFn};
pub use locator::{NamespaceProvider, ResolveError, Tier, TypeLocator};
pub use event_loop::{
    default_thread_count, DefaultThreadFactory, EventLoop, EventLoopGroup,
    EventLoopGroupConstructor, ThreadFactory,
};
pub use record::{CapabilityRecord, RecordError, RecordParts};
pub use error::{peel, BoxError, TransportError, UnavailableCause};
pub use config::{ConfigError, TransportConfig};
pub use version::{ArtifactVersion, VersionSource};

/// Version of this crate, reported to the version-consistency check.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
