//! Error types for transport capability resolution.
//!
//! Two layers:
//!
//! - [`UnavailableCause`] is captured as data when a backend is probed.
//!   Probing never fails; it records one of these instead.
//! - [`TransportError`] is what an accessor returns when the caller asks an
//!   unavailable backend for a capability. It chains the captured cause.

use std::sync::Arc;

use thiserror::Error;

use crate::locator::{ResolveError, Tier};

/// Boxed, thread-safe error used for causes coming out of locators and
/// native probes.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Why a backend could not be resolved.
#[derive(Debug, Error)]
pub enum UnavailableCause {
    /// The hosting library's implementation namespace could not be determined.
    #[error("failed to determine the {tier} namespace")]
    NamespaceUnresolved { tier: Tier },

    /// A gated backend was not explicitly enabled via configuration.
    #[error("{token} not enabled explicitly")]
    NotOptedIn { token: &'static str },

    /// The backend's own availability check reported a cause.
    #[error("native transport unavailable: {0}")]
    NativeUnavailable(#[source] BoxError),

    /// A required type or constructor could not be resolved.
    #[error("failed to resolve transport types: {0}")]
    ResolutionFailure(#[source] BoxError),
}

/// Returned by capability accessors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The backend was probed and found unavailable.
    #[error("transport '{name}' not available: {cause}")]
    NotAvailable {
        name: &'static str,
        #[source]
        cause: Arc<UnavailableCause>,
    },

    /// The backend is available but lacks the requested capability.
    #[error("transport '{name}' does not support {capability}")]
    Unsupported {
        name: &'static str,
        capability: &'static str,
    },

    /// The bound event loop group constructor failed.
    #[error("failed to create an event loop group for transport '{name}': {source}")]
    GroupConstruction {
        name: &'static str,
        #[source]
        source: BoxError,
    },
}

impl TransportError {
    /// The cause captured at probe time, if this error came from an
    /// unavailable backend.
    pub fn unavailability_cause(&self) -> Option<&Arc<UnavailableCause>> {
        match self {
            TransportError::NotAvailable { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

/// Strip incidental wrapping layers ([`ResolveError::Invocation`] and
/// [`ResolveError::Initialization`]) and return the root cause.
pub fn peel(mut err: BoxError) -> BoxError {
    loop {
        match err.downcast::<ResolveError>() {
            Ok(resolve) => match *resolve {
                ResolveError::Invocation(inner)
                | ResolveError::Initialization { source: inner, .. } => err = inner,
                other => return Box::new(other),
            },
            Err(other) => return other,
        }
    }
}
