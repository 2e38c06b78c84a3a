//! # netcap-native: Default transport backends
//!
//! This crate provides the backends the resolver detects, plus the
//! catalogue that exposes them by name. Nothing here is referenced by
//! type from the resolver; it only sees [`TypeHandle`]s.
//!
//! ## Backends
//!
//! | Backend  | Module   | Tier      | Platforms           | Domain sockets |
//! |----------|----------|-----------|---------------------|----------------|
//! | NIO      | `nio`    | (direct)  | all                 | no             |
//! | EPOLL    | `epoll`  | standard  | Linux               | yes            |
//! | KQUEUE   | `kqueue` | standard  | macOS, BSD          | yes            |
//! | IO_URING | `uring`  | incubator | Linux (5.6+ probe)  | no             |
//!
//! [`TypeHandle`]: netcap_core::TypeHandle

pub mod catalog;
pub mod group;
pub mod namespace;
pub mod nio;
pub mod versions;

cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        pub mod epoll;
        pub mod uring;
    } else if #[cfg(any(
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "openbsd",
        target_os = "dragonfly"
    ))] {
        pub mod kqueue;
    }
}

pub use catalog::NativeLocator;
pub use group::{NativeEventLoop, NativeEventLoopGroup};
pub use namespace::{CrateNamespaces, INCUBATOR_NAMESPACE, STANDARD_NAMESPACE};
pub use versions::NativeVersions;

/// Version of this crate, reported to the version-consistency check.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
