//! DNS Provider implementations

/// Shared utilities used by provider implementations.
pub mod common;

mod rfc2136;

pub use rfc2136::{Rfc2136Provider, Rfc2136ProviderBuilder, TsigCredential};
