//! TTL 序列化/反序列化工具
//!
//! 线上格式只有整秒，这里保持一致：
//! - 序列化: `Duration` -> 整秒（向零截断）
//! - 反序列化: 整秒 -> `Duration`

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serializer};

/// 序列化 `Duration` 为整秒数
pub fn serialize<S>(ttl: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(ttl.as_secs())
}

/// 反序列化整秒数为 `Duration`
pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_secs)
}
