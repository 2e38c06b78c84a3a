//! Transport configuration
//!
//! Library defaults with runtime environment overrides.
//!
//! # Example
//!
//! ```rust,ignore
//! use netcap_core::config::TransportConfig;
//!
//! // Defaults with env overrides
//! let config = TransportConfig::from_env();
//!
//! // Or set programmatically
//! let config = TransportConfig::new()
//!     .transport_type("io_uring")
//!     .warn_versions(false);
//! ```

use thiserror::Error;

use crate::env::{env_get_bool, env_get_str_opt};
use crate::kind::{ParseTransportError, TransportKind};

/// Selects the transport and opts gated backends in.
pub const ENV_TRANSPORT_TYPE: &str = "NETCAP_TRANSPORT_TYPE";

/// Enables the version-consistency warning.
pub const ENV_WARN_VERSIONS: &str = "NETCAP_WARN_VERSIONS";

pub mod defaults {
    pub const WARN_VERSIONS: bool = true;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Requested transport, compared case-insensitively against backend
    /// tokens. A gated backend is probed only when this names it.
    pub transport_type: Option<String>,
    /// Emit a warning when mixed transport library versions are linked.
    pub warn_versions: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl TransportConfig {
    /// Create config from defaults with environment overrides.
    ///
    /// Environment variables (all optional):
    /// - `NETCAP_TRANSPORT_TYPE` - transport token, e.g. `epoll`, `io_uring`
    /// - `NETCAP_WARN_VERSIONS` - version-consistency warning (0/1)
    pub fn from_env() -> Self {
        Self {
            transport_type: env_get_str_opt(ENV_TRANSPORT_TYPE),
            warn_versions: env_get_bool(ENV_WARN_VERSIONS, defaults::WARN_VERSIONS),
        }
    }

    /// Create config with library defaults (no env override).
    pub fn new() -> Self {
        Self {
            transport_type: None,
            warn_versions: defaults::WARN_VERSIONS,
        }
    }

    // Builder methods

    pub fn transport_type(mut self, transport: impl Into<String>) -> Self {
        self.transport_type = Some(transport.into());
        self
    }

    pub fn warn_versions(mut self, enable: bool) -> Self {
        self.warn_versions = enable;
        self
    }

    /// Whether the configured transport type equals `token`, ignoring case.
    pub fn enables(&self, token: &str) -> bool {
        self.transport_type
            .as_deref()
            .is_some_and(|t| t.trim().eq_ignore_ascii_case(token))
    }

    /// Whether the configured transport type equals `kind`'s token.
    pub fn opts_in(&self, kind: TransportKind) -> bool {
        self.enables(kind.token())
    }

    /// The configured transport, if it names a known backend.
    pub fn preferred_kind(&self) -> Option<TransportKind> {
        self.transport_type.as_deref().and_then(|t| t.parse().ok())
    }

    /// Validate configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(t) = &self.transport_type {
            t.parse::<TransportKind>()?;
        }
        Ok(())
    }
}

/// Configuration error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid NETCAP_TRANSPORT_TYPE: {0}")]
    InvalidTransportType(#[from] ParseTransportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let config = TransportConfig::new();
        assert!(config.transport_type.is_none());
        assert!(config.warn_versions);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_opts_in_case_insensitive() {
        let config = TransportConfig::new().transport_type("IO_URING");
        assert!(config.opts_in(TransportKind::IoUring));
        assert!(!config.opts_in(TransportKind::Epoll));

        let config = TransportConfig::new().transport_type("epoll");
        assert!(!config.opts_in(TransportKind::IoUring));

        assert!(!TransportConfig::new().opts_in(TransportKind::IoUring));
    }

    #[test]
    fn test_preferred_kind() {
        let config = TransportConfig::new().transport_type("KQueue");
        assert_eq!(config.preferred_kind(), Some(TransportKind::KQueue));

        let config = TransportConfig::new().transport_type("bogus");
        assert_eq!(config.preferred_kind(), None);
    }

    #[test]
    fn test_validation() {
        let config = TransportConfig::new().transport_type("bogus");
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidTransportType(ParseTransportError(
                "bogus".to_string()
            )))
        );
    }
}
