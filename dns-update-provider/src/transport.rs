//! DNS transport
//!
//! Carries encoded DNS messages to a server and brings the responses back, decoded
//! once and still paired with their bytes. Signing, response matching and status
//! checks live above this layer, in each provider's round trip; the transport only
//! knows about connections and when a zone transfer ends.
//!
//! # design principles
//! - **One connection per exchange** - opened on entry, dropped on every exit path
//! - **No retries** - the caller decides what to do with a failed exchange
//! - **Cancellation by drop** - dropping the future aborts the in-flight I/O

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use hickory_proto::ProtoErrorKind;
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::RecordType;
use hickory_proto::runtime::TokioRuntimeProvider;
use hickory_proto::tcp::TcpClientStream;
use hickory_proto::xfer::{DnsResponse, DnsStreamHandle, SerialMessage};

use crate::error::{ProviderError, Result};

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认整体交换超时（秒）
const DEFAULT_EXCHANGE_TIMEOUT_SECS: u64 = 30;

/// What the caller expects back for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeKind {
    /// Exactly one response message.
    Single,
    /// A zone transfer: messages until the closing SOA record.
    ZoneTransfer,
}

/// A black-box DNS transport.
///
/// Implementations send one encoded request to `server` (`host:port`) and return every
/// response message belonging to it in arrival order. Each [`DnsResponse`] keeps the
/// bytes it was decoded from, which TSIG verification needs.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    /// Performs one request/response exchange.
    ///
    /// # Returns
    /// * `Ok(responses)` - response messages, at least one
    /// * `Err(ProviderError::NetworkError)` - connection or I/O failure
    /// * `Err(ProviderError::Timeout)` - the exchange did not finish in time
    /// * `Err(ProviderError::ParseError)` - a response could not be decoded
    async fn exchange(
        &self,
        server: &str,
        request: &[u8],
        kind: ExchangeKind,
    ) -> Result<Vec<DnsResponse>>;
}

/// DNS over TCP through hickory's client stream (RFC 1035 section 4.2.2 framing).
#[derive(Debug, Clone)]
pub struct TcpTransport {
    provider: &'static str,
    connect_timeout: Duration,
    timeout: Duration,
}

impl TcpTransport {
    pub fn new(provider: &'static str) -> Self {
        Self {
            provider,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            timeout: Duration::from_secs(DEFAULT_EXCHANGE_TIMEOUT_SECS),
        }
    }

    /// Bound on the whole exchange, connection included.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.connect_timeout = self.connect_timeout.min(timeout);
        self
    }

    fn network_error(&self, detail: impl std::fmt::Display) -> ProviderError {
        ProviderError::NetworkError {
            provider: self.provider.to_string(),
            detail: detail.to_string(),
        }
    }

    fn timeout_error(&self, what: &str, limit: Duration) -> ProviderError {
        ProviderError::Timeout {
            provider: self.provider.to_string(),
            detail: format!("{what} did not complete within {:.1}s", limit.as_secs_f32()),
        }
    }

    async fn resolve(&self, server: &str) -> Result<SocketAddr> {
        let mut addrs = tokio::net::lookup_host(server)
            .await
            .map_err(|e| self.network_error(format!("resolve {server}: {e}")))?;
        addrs
            .next()
            .ok_or_else(|| self.network_error(format!("{server} resolved to no address")))
    }

    async fn run(
        &self,
        server: &str,
        request: &[u8],
        kind: ExchangeKind,
    ) -> Result<Vec<DnsResponse>> {
        if request.len() > usize::from(u16::MAX) {
            return Err(ProviderError::SerializationError {
                provider: self.provider.to_string(),
                detail: format!("message of {} bytes exceeds TCP frame limit", request.len()),
            });
        }

        let addr = self.resolve(server).await?;
        let (connect, mut handle) = TcpClientStream::new(
            addr,
            None,
            Some(self.connect_timeout),
            TokioRuntimeProvider::new(),
        );
        let mut stream = connect.await.map_err(|e| {
            if matches!(e.kind(), ProtoErrorKind::Timeout) {
                self.timeout_error("connect", self.connect_timeout)
            } else {
                self.network_error(format!("connect to {server}: {e}"))
            }
        })?;

        handle
            .send(SerialMessage::new(request.to_vec(), addr))
            .map_err(|e| self.network_error(format!("send: {e}")))?;

        let mut responses = Vec::new();
        let mut transfer = TransferProgress::default();

        loop {
            let serial = match stream.next().await {
                Some(Ok(serial)) => serial,
                Some(Err(e)) => return Err(self.network_error(format!("read: {e}"))),
                None => {
                    return Err(self.network_error(format!(
                        "{server} closed the connection after {} message(s)",
                        responses.len()
                    )));
                }
            };

            let (bytes, _) = serial.into_parts();
            let response =
                DnsResponse::from_buffer(bytes).map_err(|e| ProviderError::ParseError {
                    provider: self.provider.to_string(),
                    detail: format!("undecodable response: {e}"),
                })?;

            let done = match kind {
                ExchangeKind::Single => true,
                ExchangeKind::ZoneTransfer => transfer.observe(&response),
            };
            responses.push(response);

            if done {
                break;
            }
        }

        log::debug!(
            "[{}] {server}: {} response message(s)",
            self.provider,
            responses.len()
        );

        Ok(responses)
    }
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn exchange(
        &self,
        server: &str,
        request: &[u8],
        kind: ExchangeKind,
    ) -> Result<Vec<DnsResponse>> {
        log::debug!(
            "[{}] {kind:?} exchange with {server} ({} bytes)",
            self.provider,
            request.len()
        );

        match tokio::time::timeout(self.timeout, self.run(server, request, kind)).await {
            Ok(result) => result,
            Err(_) => Err(self.timeout_error("exchange", self.timeout)),
        }
    }
}

/// Tracks when a zone transfer is complete.
///
/// A transfer starts and ends with the zone's SOA record; a server that refuses or
/// has nothing to send ends it early with an error code or an empty answer.
#[derive(Debug, Default)]
struct TransferProgress {
    soa_seen: usize,
}

impl TransferProgress {
    /// Returns `true` once the message that ends the transfer has been observed.
    fn observe(&mut self, message: &Message) -> bool {
        if message.response_code() != ResponseCode::NoError || message.answers().is_empty() {
            return true;
        }

        self.soa_seen += message
            .answers()
            .iter()
            .filter(|r| r.record_type() == RecordType::SOA)
            .count();
        self.soa_seen >= 2
    }
}
