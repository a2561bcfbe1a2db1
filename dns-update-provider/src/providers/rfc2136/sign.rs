//! TSIG 事务签名（RFC 8945）
//!
//! 凭证在构建 Provider 时解析为结构化的三元组，原始字符串不会继续向下传递。

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hickory_proto::dnssec::rdata::tsig::TsigAlgorithm;
use hickory_proto::dnssec::tsig::TSigner;
use hickory_proto::op::{Message, MessageVerifier};
use hickory_proto::rr::Name;

use crate::error::{ProviderError, Result};
use crate::utils::log_sanitizer::redact_secret;

use super::PROVIDER_NAME;

/// 客户端与服务器允许的最大时间差（秒）
const TSIG_FUDGE: u16 = 300;

fn invalid_format(detail: impl Into<String>) -> ProviderError {
    ProviderError::InvalidCredentialFormat {
        provider: PROVIDER_NAME.to_string(),
        detail: detail.into(),
    }
}

/// A parsed `algorithm:keyname:base64secret` credential.
#[derive(Clone, PartialEq, Eq)]
pub struct TsigCredential {
    /// Algorithm name as given, without trailing dot (e.g. `hmac-sha256`).
    pub algorithm: String,
    /// Key name as given, without trailing dot.
    pub key_name: String,
    /// Decoded shared secret.
    pub secret: Vec<u8>,
}

impl TsigCredential {
    /// Splits the credential into its three fields and decodes the secret.
    pub fn parse(raw: &str) -> Result<Self> {
        let fields: Vec<&str> = raw.trim().split(':').collect();
        if fields.len() != 3 {
            return Err(invalid_format(format!(
                "expected 3 fields (algorithm:keyname:secret), got {}",
                fields.len()
            )));
        }

        let (algorithm, key_name, secret) = (fields[0], fields[1], fields[2]);
        for (label, value) in [("algorithm", algorithm), ("key name", key_name), ("secret", secret)] {
            if value.trim().is_empty() {
                return Err(invalid_format(format!("{label} must not be empty")));
            }
        }

        let secret = STANDARD
            .decode(secret.trim())
            .map_err(|e| ProviderError::InvalidSecretEncoding {
                provider: PROVIDER_NAME.to_string(),
                detail: e.to_string(),
            })?;

        log::debug!(
            "[{PROVIDER_NAME}] TSIG credential: algorithm={algorithm}, key={key_name}, secret={}",
            redact_secret(fields[2])
        );

        Ok(Self {
            algorithm: algorithm.trim().trim_end_matches('.').to_ascii_lowercase(),
            key_name: key_name.trim().trim_end_matches('.').to_string(),
            secret,
        })
    }
}

impl FromStr for TsigCredential {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Debug for TsigCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TsigCredential")
            .field("algorithm", &self.algorithm)
            .field("key_name", &self.key_name)
            .field("secret", &"****")
            .finish()
    }
}

/// 持有已校验的签名器，对外发报文签名
#[derive(Clone)]
pub(crate) struct TsigAuthenticator {
    credential: TsigCredential,
    signer: TSigner,
}

impl TsigAuthenticator {
    /// 校验算法与密钥名，构建签名器
    pub(crate) fn new(credential: TsigCredential) -> Result<Self> {
        let algorithm_name = Name::from_ascii(&credential.algorithm)
            .map_err(|e| invalid_format(format!("algorithm '{}': {e}", credential.algorithm)))?;
        let algorithm = TsigAlgorithm::from_name(algorithm_name);

        let key_name = Name::from_ascii(format!("{}.", credential.key_name))
            .map_err(|e| invalid_format(format!("key name '{}': {e}", credential.key_name)))?;

        let signer = TSigner::new(credential.secret.clone(), algorithm, key_name, TSIG_FUDGE)
            .map_err(|e| {
                invalid_format(format!(
                    "algorithm '{}' cannot be used for signing: {e}",
                    credential.algorithm
                ))
            })?;

        Ok(Self { credential, signer })
    }

    pub(crate) fn parse(raw: &str) -> Result<Self> {
        Self::new(TsigCredential::parse(raw)?)
    }

    pub(crate) fn key_name(&self) -> &str {
        &self.credential.key_name
    }

    /// Appends a TSIG record to the message.
    ///
    /// Returns the verifier for the responses; it must see them in arrival order.
    pub(crate) fn sign(&self, message: &mut Message) -> Result<Option<MessageVerifier>> {
        let timestamp = chrono::Utc::now().timestamp();
        let now = u32::try_from(timestamp).map_err(|_| ProviderError::SerializationError {
            provider: PROVIDER_NAME.to_string(),
            detail: format!("system time {timestamp} out of TSIG range"),
        })?;

        message
            .finalize(&self.signer, now)
            .map_err(|e| ProviderError::SerializationError {
                provider: PROVIDER_NAME.to_string(),
                detail: format!("TSIG signing failed: {e}"),
            })
    }
}

impl fmt::Debug for TsigAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TsigAuthenticator")
            .field("credential", &self.credential)
            .finish_non_exhaustive()
    }
}
