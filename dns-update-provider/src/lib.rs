//! # dns-update-provider
//!
//! DNS record management against an authoritative server, reading the zone with a
//! zone transfer (AXFR) and writing it with dynamic updates (RFC 2136), optionally
//! authenticated with a transaction signature (TSIG, RFC 8945).
//!
//! The crate exposes one record-management contract, [`DnsProvider`]:
//!
//! | Operation | Wire traffic |
//! |-----------|--------------|
//! | [`get_records`](DnsProvider::get_records) | one AXFR |
//! | [`append_records`](DnsProvider::append_records) | one UPDATE (inserts) |
//! | [`set_records`](DnsProvider::set_records) | one AXFR, then one UPDATE (removes + inserts) |
//! | [`delete_records`](DnsProvider::delete_records) | one UPDATE (removes) |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use dns_update_provider::{DnsProvider, Record, Rfc2136Provider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Create a provider; the credential is parsed here
//!     let provider = Rfc2136Provider::builder("ns1.example.com:53")
//!         .tsig("hmac-sha256:update-key:c2VjcmV0")
//!         .timeout(Duration::from_secs(10))
//!         .build()?;
//!
//!     // 2. List the zone
//!     for record in provider.get_records("example.com.").await? {
//!         println!("{} {} {}", record.name, record.record_type, record.data);
//!     }
//!
//!     // 3. Make `www` point to exactly one address
//!     let www = Record::new("www", "A", "192.0.2.10", Duration::from_secs(300));
//!     provider.set_records("example.com.", &[www]).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! Providers can also be built from stored configuration:
//!
//! ```rust,no_run
//! use dns_update_provider::{create_provider, ProviderCredentials};
//!
//! let provider = create_provider(ProviderCredentials::Rfc2136 {
//!     server: "127.0.0.1:53".to_string(),
//!     tsig: None,
//! })?;
//! # Ok::<(), dns_update_provider::ProviderError>(())
//! ```
//!
//! ## Record identity
//!
//! DNS records have no identifiers. Every record returned by a provider carries an
//! [`id`](Record::id) derived from its absolute text form; two records with the same
//! name, TTL, type and data share one id. Passing such a record to
//! [`delete_records`](DnsProvider::delete_records) removes exactly that record.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError):
//!
//! - [`ProviderError::InvalidCredentialFormat`] / [`ProviderError::InvalidSecretEncoding`]:
//!   bad TSIG credential, reported when the provider is built
//! - [`ProviderError::MalformedRecord`]: a record is not a valid resource record; the whole
//!   batch is rejected before anything is sent
//! - [`ProviderError::NetworkError`] / [`ProviderError::Timeout`]: transport failures
//! - [`ProviderError::ProtocolError`]: the server answered with a non-success RCODE
//!
//! Nothing is retried. Updates the server applied before a failure are not rolled back.

mod error;
mod factory;
mod providers;
mod traits;
mod transport;
mod types;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export factory functions
pub use factory::{create_provider, get_all_provider_metadata};

// Re-export core traits only (internal traits are not exported)
pub use traits::DnsProvider;
pub use transport::{DnsTransport, ExchangeKind, TcpTransport};

// Re-export types
pub use types::{
    CredentialValidationError, FieldType, ProviderCredentialField, ProviderCredentials,
    ProviderMetadata, ProviderType, Record,
};

// Re-export name helpers
pub use providers::common::{absolute_name, relative_name};

// Re-export concrete providers
pub use providers::{Rfc2136Provider, Rfc2136ProviderBuilder, TsigCredential};
