//! Known transport backends.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// One concrete I/O multiplexing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TransportKind {
    /// Portable fallback. Always present, no native code.
    Nio = 0,
    /// Linux epoll.
    Epoll = 1,
    /// BSD/macOS kqueue.
    KQueue = 2,
    /// Linux io_uring. Probed only when explicitly enabled.
    IoUring = 3,
}

impl TransportKind {
    /// Every known backend, in declaration order.
    pub const ALL: [TransportKind; 4] = [
        TransportKind::Nio,
        TransportKind::Epoll,
        TransportKind::KQueue,
        TransportKind::IoUring,
    ];

    /// Upper-case backend name ("NIO", "EPOLL", ...).
    pub const fn name(self) -> &'static str {
        match self {
            TransportKind::Nio => "NIO",
            TransportKind::Epoll => "EPOLL",
            TransportKind::KQueue => "KQUEUE",
            TransportKind::IoUring => "IO_URING",
        }
    }

    /// Lower-case configuration token ("nio", "epoll", "kqueue", "io_uring").
    pub const fn token(self) -> &'static str {
        match self {
            TransportKind::Nio => "nio",
            TransportKind::Epoll => "epoll",
            TransportKind::KQueue => "kqueue",
            TransportKind::IoUring => "io_uring",
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string names no known transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown transport type: {0:?}")]
pub struct ParseTransportError(pub String);

impl FromStr for TransportKind {
    type Err = ParseTransportError;

    /// Accepts either the name or the token, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        TransportKind::ALL
            .into_iter()
            .find(|k| s.eq_ignore_ascii_case(k.name()) || s.eq_ignore_ascii_case(k.token()))
            .ok_or_else(|| ParseTransportError(s.to_string()))
    }
}
