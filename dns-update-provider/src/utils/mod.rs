//! Utility modules.

/// Log sanitization utilities to prevent sensitive data exposure.
pub mod log_sanitizer;

/// Serde helpers for TTL durations.
pub mod ttl;
