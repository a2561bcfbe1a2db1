use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{ProviderMetadata, Record};

/// 服务器返回的原始错误状态（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawDnsError {
    /// RCODE 数值
    pub code: u16,
    /// RCODE 助记符
    pub mnemonic: String,
}

impl RawDnsError {
    pub fn new(code: u16, mnemonic: impl Into<String>) -> Self {
        Self {
            code,
            mnemonic: mnemonic.into(),
        }
    }
}

/// 错误上下文信息（内部使用）
/// 用于在映射错误时提供额外信息
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 报文所针对的 zone
    pub zone: Option<String>,
}

/// Provider 错误映射 Trait（内部使用）
/// 各 Provider 实现此 trait 以将服务器错误映射到统一错误类型
pub(crate) trait ProviderErrorMapper {
    /// 返回 Provider 标识符
    fn provider_name(&self) -> &'static str;

    /// 将服务器返回的错误状态映射到统一错误类型
    fn map_error(&self, raw: RawDnsError, context: ErrorContext) -> ProviderError;

    /// 快捷方法：解析错误
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }
}

/// DNS record management contract.
///
/// All four operations take a zone name (with or without the trailing dot) and work on
/// [`Record`]s whose names are relative to that zone. Each call is a single logical
/// operation: records are never cached between calls, and concurrent calls against the same
/// zone are not coordinated.
///
/// Dropping the returned future cancels the in-flight exchange. Updates the server already
/// applied are not rolled back.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// 提供商标识符
    fn id(&self) -> &'static str;

    /// 获取 Provider 元数据（类型级别）
    ///
    /// 此方法不需要实例，可以在创建 Provider 之前调用。
    fn metadata() -> ProviderMetadata
    where
        Self: Sized;

    /// Lists every record in the zone.
    async fn get_records(&self, zone: &str) -> Result<Vec<Record>>;

    /// Adds records to the zone without touching existing ones.
    ///
    /// Returns the records that were sent, as the server will now hold them.
    async fn append_records(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>>;

    /// Makes the zone's record set exactly `records`.
    ///
    /// Current records whose full text (name, TTL, class, type, data) does not appear among
    /// `records` are removed; all of `records` are inserted. An empty slice empties the zone.
    async fn set_records(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>>;

    /// Removes exactly the given records from the zone.
    ///
    /// A record carrying an identity token is rebuilt from the token; otherwise it is built
    /// from its fields. Returns the records that were removed.
    async fn delete_records(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>>;
}
