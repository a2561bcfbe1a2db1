//! RFC 2136 `DnsProvider` trait 实现

use async_trait::async_trait;

use crate::error::Result;
use crate::providers::common::normalize_zone;
use crate::traits::DnsProvider;
use crate::types::{
    FieldType, ProviderCredentialField, ProviderMetadata, ProviderType, Record,
};

use super::codec::{self, origin};
use super::diff::RecordDiff;
use super::{PROVIDER_NAME, Rfc2136Provider};

impl Rfc2136Provider {
    /// 校验并规范化 zone 名称
    fn zone_name(zone: &str) -> Result<String> {
        origin(zone)?;
        Ok(normalize_zone(zone))
    }
}

#[async_trait]
impl DnsProvider for Rfc2136Provider {
    fn id(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn metadata() -> ProviderMetadata {
        ProviderMetadata {
            id: ProviderType::Rfc2136,
            name: "RFC 2136 Dynamic Update".to_string(),
            description: "通过 AXFR 读取、DNS UPDATE 写入的权威 DNS 服务器".to_string(),
            required_fields: vec![
                ProviderCredentialField {
                    key: "server".to_string(),
                    label: "Server Address".to_string(),
                    field_type: FieldType::Text,
                    required: true,
                    placeholder: Some("ns1.example.com:53".to_string()),
                    help_text: Some("host:port，使用 TCP 连接".to_string()),
                },
                ProviderCredentialField {
                    key: "tsig".to_string(),
                    label: "TSIG Key".to_string(),
                    field_type: FieldType::Password,
                    required: false,
                    placeholder: Some("hmac-sha256:keyname:base64secret".to_string()),
                    help_text: Some("留空则不签名".to_string()),
                },
            ],
        }
    }

    async fn get_records(&self, zone: &str) -> Result<Vec<Record>> {
        let zone = Self::zone_name(zone)?;
        let current = self.transfer(&zone).await?;
        codec::unmarshal_all(&zone, &current)
    }

    async fn append_records(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>> {
        let zone = Self::zone_name(zone)?;
        let insert = codec::marshal_all(&zone, records)?;
        if insert.is_empty() {
            return Ok(Vec::new());
        }

        self.update(&zone, &[], &insert).await?;
        codec::unmarshal_all(&zone, &insert)
    }

    async fn set_records(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>> {
        let zone = Self::zone_name(zone)?;
        // 先编码，格式错误时不产生任何网络请求
        let desired = codec::marshal_all(&zone, records)?;

        let current = self.transfer(&zone).await?;
        let diff = RecordDiff::compute(&current, desired);

        log::debug!(
            "[{PROVIDER_NAME}] set {zone}: {} current, {} to insert, {} to remove",
            current.len(),
            diff.insert.len(),
            diff.remove.len()
        );

        if !diff.is_empty() {
            self.update(&zone, &diff.remove, &diff.insert).await?;
        }
        codec::unmarshal_all(&zone, &diff.insert)
    }

    async fn delete_records(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>> {
        let zone = Self::zone_name(zone)?;
        let remove = records
            .iter()
            .map(|record| match record.id.as_deref() {
                Some(id) if !id.trim().is_empty() => codec::from_identity(&zone, id),
                _ => codec::marshal(&zone, record),
            })
            .collect::<Result<Vec<_>>>()?;
        if remove.is_empty() {
            return Ok(Vec::new());
        }

        self.update(&zone, &remove, &[]).await?;
        codec::unmarshal_all(&zone, &remove)
    }
}
