//! RFC 2136 动态更新 Provider
//!
//! 读取走 AXFR 区域传送，写入走 DNS UPDATE，可选 TSIG 签名。

mod codec;
mod diff;
mod error;
mod exchange;
mod provider;
mod sign;

use std::sync::Arc;
use std::time::Duration;

use crate::error::{ProviderError, Result};
use crate::transport::{DnsTransport, TcpTransport};

pub use sign::TsigCredential;

pub(crate) use sign::TsigAuthenticator;

pub(crate) const PROVIDER_NAME: &str = "rfc2136";

/// Record management against an authoritative server speaking AXFR and DNS UPDATE.
pub struct Rfc2136Provider {
    pub(crate) server: String,
    pub(crate) authenticator: Option<TsigAuthenticator>,
    pub(crate) transport: Arc<dyn DnsTransport>,
}

/// `Rfc2136Provider` Builder
pub struct Rfc2136ProviderBuilder {
    server: String,
    tsig: Option<String>,
    timeout: Option<Duration>,
    transport: Option<Arc<dyn DnsTransport>>,
}

impl Rfc2136ProviderBuilder {
    fn new(server: String) -> Self {
        Self {
            server,
            tsig: None,
            timeout: None,
            transport: None,
        }
    }

    /// Signs every message with the `algorithm:keyname:base64secret` credential.
    ///
    /// An empty string means anonymous mode.
    #[must_use]
    pub fn tsig(mut self, credential: impl Into<String>) -> Self {
        self.tsig = Some(credential.into());
        self
    }

    /// Bound on each exchange with the server. Ignored when a custom transport is set.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replaces the default TCP transport.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn DnsTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Validates the configuration and parses the credential.
    pub fn build(self) -> Result<Rfc2136Provider> {
        let server = self.server.trim().to_string();
        if server.is_empty() {
            return Err(ProviderError::InvalidParameter {
                provider: PROVIDER_NAME.to_string(),
                param: "server".to_string(),
                detail: "server address must not be empty".to_string(),
            });
        }

        let authenticator = match self.tsig.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(TsigAuthenticator::parse(raw)?),
            _ => None,
        };

        let transport = self.transport.unwrap_or_else(|| {
            let tcp = TcpTransport::new(PROVIDER_NAME);
            let tcp = match self.timeout {
                Some(timeout) => tcp.with_timeout(timeout),
                None => tcp,
            };
            Arc::new(tcp)
        });

        log::debug!(
            "[{PROVIDER_NAME}] provider for {server} ({})",
            authenticator
                .as_ref()
                .map_or("anonymous".to_string(), |a| format!("TSIG key {}", a.key_name()))
        );

        Ok(Rfc2136Provider {
            server,
            authenticator,
            transport,
        })
    }
}

impl Rfc2136Provider {
    /// `server` is `host:port`; `tsig` is `algorithm:keyname:base64secret`.
    pub fn new(server: impl Into<String>, tsig: Option<String>) -> Result<Self> {
        let builder = Self::builder(server);
        match tsig {
            Some(tsig) => builder.tsig(tsig).build(),
            None => builder.build(),
        }
    }

    pub fn builder(server: impl Into<String>) -> Rfc2136ProviderBuilder {
        Rfc2136ProviderBuilder::new(server.into())
    }

    /// Server address this provider talks to.
    pub fn server(&self) -> &str {
        &self.server
    }
}

impl std::fmt::Debug for Rfc2136Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rfc2136Provider")
            .field("server", &self.server)
            .field("authenticator", &self.authenticator)
            .finish_non_exhaustive()
    }
}
