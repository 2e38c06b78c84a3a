//! Environment variable utilities
//!
//! # Usage
//!
//! ```ignore
//! use netcap_core::env::{env_get_bool, env_get_str_opt};
//!
//! let transport: Option<String> = env_get_str_opt("NETCAP_TRANSPORT_TYPE");
//! let warn: bool = env_get_bool("NETCAP_WARN_VERSIONS", true);
//! ```

/// Get environment variable as boolean
///
/// Accepts "1", "true", "yes", "on" as true and "0", "false", "no", "off"
/// as false (case-insensitive). Unset or unrecognized values return the
/// default.
#[inline]
pub fn env_get_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => match val.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

/// Get environment variable as a trimmed, non-empty string
#[inline]
pub fn env_get_str_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
