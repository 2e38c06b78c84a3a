//! Capability records.
//!
//! A [`CapabilityRecord`] is either fully available (every type and the
//! group constructor present, no cause) or fully unavailable (nothing but
//! a cause). Unix-domain socket types are an independent pair layered on
//! top of availability. [`CapabilityRecord::from_parts`] rejects any other
//! combination with a [`RecordError`].

use std::sync::Arc;

use thiserror::Error;

use crate::error::{TransportError, UnavailableCause};
use crate::event_loop::{EventLoopGroup, EventLoopGroupConstructor, ThreadFactory};
use crate::types::{TypeHandle, TypeKind};

/// Unvalidated record contents, as collected by a probe.
#[derive(Debug, Clone, Default)]
pub struct RecordParts {
    pub server_channel: Option<TypeHandle>,
    pub socket_channel: Option<TypeHandle>,
    pub domain_server_channel: Option<TypeHandle>,
    pub domain_socket_channel: Option<TypeHandle>,
    pub datagram_channel: Option<TypeHandle>,
    pub event_loop_group: Option<TypeHandle>,
    pub event_loop: Option<TypeHandle>,
    pub group_constructor: Option<EventLoopGroupConstructor>,
}

impl RecordParts {
    fn is_empty(&self) -> bool {
        self.server_channel.is_none()
            && self.socket_channel.is_none()
            && self.domain_server_channel.is_none()
            && self.domain_socket_channel.is_none()
            && self.datagram_channel.is_none()
            && self.event_loop_group.is_none()
            && self.event_loop.is_none()
            && self.group_constructor.is_none()
    }
}

/// A record whose fields break the all-or-nothing rules.
///
/// This is a programming error in the probe, not a runtime unavailability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("transport '{name}': resolved types and an unavailability cause are both present")]
    BothPresent { name: &'static str },

    #[error("transport '{name}': neither resolved types nor an unavailability cause present")]
    NeitherPresent { name: &'static str },

    #[error("transport '{name}': partially resolved, {missing} is missing")]
    Partial {
        name: &'static str,
        missing: &'static str,
    },

    #[error("transport '{name}': domain socket types must be present together")]
    DomainSocketMismatch { name: &'static str },

    #[error("transport '{name}': {slot} holds a {actual:?}, expected {expected:?}")]
    KindMismatch {
        name: &'static str,
        slot: &'static str,
        expected: TypeKind,
        actual: TypeKind,
    },
}

#[derive(Debug)]
struct DomainSockets {
    server_channel: TypeHandle,
    socket_channel: TypeHandle,
}

#[derive(Debug)]
struct Resolved {
    server_channel: TypeHandle,
    socket_channel: TypeHandle,
    domain: Option<DomainSockets>,
    datagram_channel: TypeHandle,
    event_loop_group: TypeHandle,
    event_loop: TypeHandle,
    group_constructor: EventLoopGroupConstructor,
}

#[derive(Debug)]
enum Availability {
    Available(Box<Resolved>),
    Unavailable(Arc<UnavailableCause>),
}

/// The resolved-or-failed description of one backend.
#[derive(Debug)]
pub struct CapabilityRecord {
    name: &'static str,
    availability: Availability,
}

fn require(
    name: &'static str,
    slot: &'static str,
    value: Option<TypeHandle>,
    expected: TypeKind,
) -> Result<TypeHandle, RecordError> {
    let handle = value.ok_or(RecordError::Partial {
        name,
        missing: slot,
    })?;
    check_kind(name, slot, &handle, expected)?;
    Ok(handle)
}

fn check_kind(
    name: &'static str,
    slot: &'static str,
    handle: &TypeHandle,
    expected: TypeKind,
) -> Result<(), RecordError> {
    if handle.kind() == expected {
        Ok(())
    } else {
        Err(RecordError::KindMismatch {
            name,
            slot,
            expected,
            actual: handle.kind(),
        })
    }
}

impl CapabilityRecord {
    /// Validate `parts` and `cause` against the all-or-nothing rules.
    pub fn from_parts(
        name: &'static str,
        parts: RecordParts,
        cause: Option<UnavailableCause>,
    ) -> Result<Self, RecordError> {
        if parts.domain_server_channel.is_some() != parts.domain_socket_channel.is_some() {
            return Err(RecordError::DomainSocketMismatch { name });
        }

        match (parts.is_empty(), cause) {
            (true, Some(cause)) => return Ok(Self::unavailable(name, cause)),
            (false, Some(_)) => return Err(RecordError::BothPresent { name }),
            (true, None) => return Err(RecordError::NeitherPresent { name }),
            (false, None) => {}
        }

        let domain = match (parts.domain_server_channel, parts.domain_socket_channel) {
            (Some(server), Some(socket)) => {
                check_kind(name, "domain server channel", &server, TypeKind::ServerDomainSocketChannel)?;
                check_kind(name, "domain socket channel", &socket, TypeKind::DomainSocketChannel)?;
                Some(DomainSockets {
                    server_channel: server,
                    socket_channel: socket,
                })
            }
            _ => None,
        };

        let resolved = Resolved {
            server_channel: require(name, "server channel", parts.server_channel, TypeKind::ServerSocketChannel)?,
            socket_channel: require(name, "socket channel", parts.socket_channel, TypeKind::SocketChannel)?,
            domain,
            datagram_channel: require(name, "datagram channel", parts.datagram_channel, TypeKind::DatagramChannel)?,
            event_loop_group: require(name, "event loop group", parts.event_loop_group, TypeKind::EventLoopGroup)?,
            event_loop: require(name, "event loop", parts.event_loop, TypeKind::EventLoop)?,
            group_constructor: parts.group_constructor.ok_or(RecordError::Partial {
                name,
                missing: "event loop group constructor",
            })?,
        };

        Ok(Self {
            name,
            availability: Availability::Available(Box::new(resolved)),
        })
    }

    /// A fully unavailable record. Always valid.
    pub fn unavailable(name: &'static str, cause: UnavailableCause) -> Self {
        Self {
            name,
            availability: Availability::Unavailable(Arc::new(cause)),
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn is_available(&self) -> bool {
        matches!(self.availability, Availability::Available(_))
    }

    /// The captured cause, or `None` when available. Never fails.
    pub fn unavailability_cause(&self) -> Option<&Arc<UnavailableCause>> {
        match &self.availability {
            Availability::Available(_) => None,
            Availability::Unavailable(cause) => Some(cause),
        }
    }

    /// Whether the domain socket accessors will succeed. Never fails.
    pub fn supports_domain_sockets(&self) -> bool {
        matches!(&self.availability, Availability::Available(r) if r.domain.is_some())
    }

    fn resolved(&self) -> Result<&Resolved, TransportError> {
        match &self.availability {
            Availability::Available(resolved) => Ok(resolved),
            Availability::Unavailable(cause) => Err(TransportError::NotAvailable {
                name: self.name,
                cause: Arc::clone(cause),
            }),
        }
    }

    fn domain(&self) -> Result<&DomainSockets, TransportError> {
        self.resolved()?
            .domain
            .as_ref()
            .ok_or(TransportError::Unsupported {
                name: self.name,
                capability: "domain sockets",
            })
    }

    pub fn server_channel_type(&self) -> Result<&TypeHandle, TransportError> {
        Ok(&self.resolved()?.server_channel)
    }

    pub fn socket_channel_type(&self) -> Result<&TypeHandle, TransportError> {
        Ok(&self.resolved()?.socket_channel)
    }

    pub fn domain_server_channel_type(&self) -> Result<&TypeHandle, TransportError> {
        Ok(&self.domain()?.server_channel)
    }

    pub fn domain_socket_channel_type(&self) -> Result<&TypeHandle, TransportError> {
        Ok(&self.domain()?.socket_channel)
    }

    pub fn datagram_channel_type(&self) -> Result<&TypeHandle, TransportError> {
        Ok(&self.resolved()?.datagram_channel)
    }

    pub fn event_loop_group_type(&self) -> Result<&TypeHandle, TransportError> {
        Ok(&self.resolved()?.event_loop_group)
    }

    pub fn event_loop_type(&self) -> Result<&TypeHandle, TransportError> {
        Ok(&self.resolved()?.event_loop)
    }

    pub fn event_loop_group_constructor(&self) -> Result<&EventLoopGroupConstructor, TransportError> {
        Ok(&self.resolved()?.group_constructor)
    }

    /// Shorthand for `event_loop_group_constructor()?.construct(..)`.
    pub fn new_event_loop_group(
        &self,
        n_threads: usize,
        factory: Arc<dyn ThreadFactory>,
    ) -> Result<Box<dyn EventLoopGroup>, TransportError> {
        self.event_loop_group_constructor()?.construct(n_threads, factory)
    }
}
