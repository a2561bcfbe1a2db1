use serde::{Deserialize, Serialize};

/// Unified error type for all DNS record operations.
///
/// Each variant includes a `provider` field identifying which provider produced the error,
/// plus variant-specific context. All variants are serializable for structured error reporting.
///
/// # Failure Classes
///
/// - Configuration errors ([`InvalidCredentialFormat`](Self::InvalidCredentialFormat),
///   [`InvalidSecretEncoding`](Self::InvalidSecretEncoding)) are raised before any network
///   activity and are never worth retrying.
/// - [`MalformedRecord`](Self::MalformedRecord) aborts the whole batch it was found in.
/// - Transport errors ([`NetworkError`](Self::NetworkError), [`Timeout`](Self::Timeout))
///   carry the underlying cause so the caller can decide whether to retry.
/// - [`ProtocolError`](Self::ProtocolError) means the server explicitly rejected the message.
///
/// Nothing in this crate retries on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// The credential string is not `algorithm:keyname:secret`, or names an
    /// algorithm that cannot be used for signing.
    InvalidCredentialFormat {
        /// Provider that produced the error.
        provider: String,
        /// What is wrong with the credential.
        detail: String,
    },

    /// The secret part of the credential is not valid base64.
    InvalidSecretEncoding {
        /// Provider that produced the error.
        provider: String,
        /// Decoder error message.
        detail: String,
    },

    /// A record could not be rendered as, or parsed from, a valid resource record.
    MalformedRecord {
        /// Provider that produced the error.
        provider: String,
        /// The offending record in text form.
        record: String,
        /// Parser error message.
        detail: String,
    },

    /// A request parameter is invalid (e.g., bad zone name, empty server address).
    InvalidParameter {
        /// Provider that produced the error.
        provider: String,
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// A network-level error occurred (connection refused, reset, unexpected EOF, etc.).
    NetworkError {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The exchange did not complete before the configured deadline.
    Timeout {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The server answered with a non-success response code.
    ProtocolError {
        /// Provider that produced the error.
        provider: String,
        /// Numeric RCODE reported by the server, serialized as `status`.
        #[serde(rename = "status")]
        code: u16,
        /// Mnemonic of the RCODE (e.g. `REFUSED`, `NOTAUTH`).
        rcode: String,
        /// Zone the message was addressed to, if known.
        zone: Option<String>,
    },

    /// The transaction signature on a response did not verify.
    VerificationFailed {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// Failed to decode a response from the server.
    ParseError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to encode or sign an outbound message.
    SerializationError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the serialization failure.
        detail: String,
    },
}

impl ProviderError {
    /// 是否为预期行为（用户输入、服务器拒绝等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentialFormat { .. }
                | Self::InvalidSecretEncoding { .. }
                | Self::MalformedRecord { .. }
                | Self::InvalidParameter { .. }
                | Self::ProtocolError { .. }
        )
    }

    /// Whether the failure came from the transport rather than from the server or the caller.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::NetworkError { .. } | Self::Timeout { .. })
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentialFormat { provider, detail } => {
                write!(f, "[{provider}] Invalid TSIG credential: {detail}")
            }
            Self::InvalidSecretEncoding { provider, detail } => {
                write!(f, "[{provider}] Invalid TSIG secret: {detail}")
            }
            Self::MalformedRecord {
                provider,
                record,
                detail,
            } => {
                write!(f, "[{provider}] Malformed record '{record}': {detail}")
            }
            Self::InvalidParameter {
                provider,
                param,
                detail,
            } => {
                write!(f, "[{provider}] Invalid parameter '{param}': {detail}")
            }
            Self::NetworkError { provider, detail } => {
                write!(f, "[{provider}] Network error: {detail}")
            }
            Self::Timeout { provider, detail } => {
                write!(f, "[{provider}] Request timeout: {detail}")
            }
            Self::ProtocolError {
                provider,
                rcode,
                zone,
                ..
            } => {
                if let Some(zone) = zone {
                    write!(f, "[{provider}] DNS error for zone '{zone}': {rcode}")
                } else {
                    write!(f, "[{provider}] DNS error: {rcode}")
                }
            }
            Self::VerificationFailed { provider, detail } => {
                write!(f, "[{provider}] TSIG verification failed: {detail}")
            }
            Self::ParseError { provider, detail } => {
                write!(f, "[{provider}] Parse error: {detail}")
            }
            Self::SerializationError { provider, detail } => {
                write!(f, "[{provider}] Serialization error: {detail}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;
