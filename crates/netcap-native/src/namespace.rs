//! Implementation namespaces of this crate's backends.

use netcap_core::{NamespaceProvider, Tier};

/// Namespace holding the stable backends (epoll, kqueue).
pub const STANDARD_NAMESPACE: &str = concat!(env!("CARGO_CRATE_NAME"), "::channel");

/// Namespace holding the experimental backends (io_uring).
pub const INCUBATOR_NAMESPACE: &str = concat!(env!("CARGO_CRATE_NAME"), "::incubator::channel");

/// Reports this crate's namespaces. Either tier can be withheld, which
/// makes every backend in it unresolvable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrateNamespaces {
    standard: Option<String>,
    incubator: Option<String>,
}

impl Default for CrateNamespaces {
    fn default() -> Self {
        Self {
            standard: Some(STANDARD_NAMESPACE.to_string()),
            incubator: Some(INCUBATOR_NAMESPACE.to_string()),
        }
    }
}

impl CrateNamespaces {
    pub fn new() -> Self {
        Self::default()
    }

    /// Withhold the namespace for `tier`.
    pub fn without(mut self, tier: Tier) -> Self {
        match tier {
            Tier::Standard => self.standard = None,
            Tier::Incubator => self.incubator = None,
        }
        self
    }
}

impl NamespaceProvider for CrateNamespaces {
    fn namespace(&self, tier: Tier) -> Option<String> {
        match tier {
            Tier::Standard => self.standard.clone(),
            Tier::Incubator => self.incubator.clone(),
        }
    }
}
