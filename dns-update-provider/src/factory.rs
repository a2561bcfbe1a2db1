//! Provider factory functions and metadata.

use std::sync::Arc;

use crate::error::Result;
use crate::providers::Rfc2136Provider;
use crate::traits::DnsProvider;
use crate::types::{ProviderCredentials, ProviderMetadata};

/// Creates a [`DnsProvider`] instance from the given credentials.
///
/// The concrete provider type is determined by the [`ProviderCredentials`] variant.
/// The returned provider is wrapped in `Arc<dyn DnsProvider>` for easy sharing
/// across async tasks.
///
/// # Errors
///
/// Fails when the credential string cannot be parsed or the server address is empty;
/// no network activity happens here.
///
/// # Examples
///
/// ```rust,no_run
/// use dns_update_provider::{create_provider, ProviderCredentials};
///
/// let provider = create_provider(ProviderCredentials::Rfc2136 {
///     server: "ns1.example.com:53".to_string(),
///     tsig: Some("hmac-sha256:update-key:c2VjcmV0".to_string()),
/// }).unwrap();
/// ```
pub fn create_provider(credentials: ProviderCredentials) -> Result<Arc<dyn DnsProvider>> {
    match credentials {
        ProviderCredentials::Rfc2136 { server, tsig } => {
            Ok(Arc::new(Rfc2136Provider::new(server, tsig)?))
        }
    }
}

/// Returns metadata for all available providers.
///
/// Useful for building dynamic UIs that enumerate available providers
/// and their configuration fields.
pub fn get_all_provider_metadata() -> Vec<ProviderMetadata> {
    vec![Rfc2136Provider::metadata()]
}
