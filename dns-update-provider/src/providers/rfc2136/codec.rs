//! 记录编解码：`Record` 与 hickory 资源记录互转
//!
//! 编码时先拼出 `<绝对名称> <TTL秒> IN <类型> <数据>` 的区域文件文本，再交给
//! hickory 的区域文件解析器；解码时从记录的文本形式中取出头部之后的部分作为 `data`。

use hickory_proto::rr::rdata::TXT;
use hickory_proto::rr::{Name, RData, Record as WireRecord};
use hickory_proto::serialize::txt::Parser;

use crate::error::{ProviderError, Result};
use crate::providers::common::{
    absolute_name, normalize_zone, relative_name, ttl_from_seconds, ttl_to_seconds,
};
use crate::types::Record;
use crate::utils::log_sanitizer::truncate_for_log;

use super::PROVIDER_NAME;

fn malformed(record: &str, detail: impl ToString) -> ProviderError {
    ProviderError::MalformedRecord {
        provider: PROVIDER_NAME.to_string(),
        record: truncate_for_log(record),
        detail: detail.to_string(),
    }
}

/// 将 zone 名称解析为 hickory `Name`（总是绝对名称）
pub(crate) fn origin(zone: &str) -> Result<Name> {
    let zone = normalize_zone(zone);
    if zone == "." {
        return Err(ProviderError::InvalidParameter {
            provider: PROVIDER_NAME.to_string(),
            param: "zone".to_string(),
            detail: "zone name must not be empty".to_string(),
        });
    }
    Name::from_ascii(&zone).map_err(|e| ProviderError::InvalidParameter {
        provider: PROVIDER_NAME.to_string(),
        param: "zone".to_string(),
        detail: format!("'{zone}': {e}"),
    })
}

/// 记录 -> 区域文件文本（名称已绝对化）
pub(crate) fn render(zone: &str, record: &Record) -> String {
    format!(
        "{} {} IN {} {}",
        absolute_name(&record.name, zone),
        ttl_to_seconds(record.ttl),
        record.record_type.trim(),
        record.data.trim()
    )
}

/// Builds the wire form of a caller-supplied record.
pub(crate) fn marshal(zone: &str, record: &Record) -> Result<WireRecord> {
    parse_line(zone, &render(zone, record))
}

/// Rebuilds a wire record from an identity token produced by [`identity`].
pub(crate) fn from_identity(zone: &str, id: &str) -> Result<WireRecord> {
    parse_line(zone, id.trim())
}

/// Marshals a whole batch; the first bad record aborts it.
pub(crate) fn marshal_all(zone: &str, records: &[Record]) -> Result<Vec<WireRecord>> {
    records.iter().map(|r| marshal(zone, r)).collect()
}

/// 解析单条区域文件记录；必须恰好得到一条记录
fn parse_line(zone: &str, line: &str) -> Result<WireRecord> {
    let origin = origin(zone)?;

    let (_, sets) = Parser::new(format!("{line}\n"), None, Some(origin))
        .parse()
        .map_err(|e| malformed(line, e))?;

    let mut parsed: Vec<WireRecord> = sets
        .values()
        .flat_map(|set| set.records_without_rrsigs())
        .cloned()
        .collect();

    match parsed.len() {
        1 => Ok(parsed.remove(0)),
        0 => Err(malformed(line, "no resource record found")),
        n => Err(malformed(
            line,
            format!("expected exactly one resource record, got {n}"),
        )),
    }
}

/// Canonical text of a wire record: absolute name, TTL, class, type and data.
///
/// Used both as the diff fingerprint and as the identity token handed to callers.
pub(crate) fn identity(rr: &WireRecord) -> String {
    format!("{} {}", header_text(rr), rdata_text(rr))
}

/// Converts a wire record back to a zone-relative [`Record`].
pub(crate) fn unmarshal(zone: &str, rr: &WireRecord) -> Result<Record> {
    let data = rdata_text(rr);
    if data.is_empty() {
        return Err(malformed(&rr.to_string(), "record carries no data"));
    }

    Ok(Record {
        id: Some(format!("{} {data}", header_text(rr))),
        name: relative_name(&rr.name().to_string(), zone),
        record_type: rr.record_type().to_string(),
        data,
        ttl: ttl_from_seconds(rr.ttl()),
    })
}

pub(crate) fn unmarshal_all(zone: &str, rrs: &[WireRecord]) -> Result<Vec<Record>> {
    rrs.iter().map(|rr| unmarshal(zone, rr)).collect()
}

fn header_text(rr: &WireRecord) -> String {
    format!(
        "{} {} {} {}",
        rr.name(),
        rr.ttl(),
        rr.dns_class(),
        rr.record_type()
    )
}

/// 记录数据部分的文本形式，直接取自 RDATA，不依赖头部的格式
fn rdata_text(rr: &WireRecord) -> String {
    match rr.data() {
        RData::TXT(txt) => quote_txt(txt),
        // 空 RDATA（仅出现在更新报文中）
        RData::Update0(_) => String::new(),
        data => data.to_string().trim().to_string(),
    }
}

/// TXT 数据：每个字符串单独加引号，保证能被解析器原样读回
fn quote_txt(txt: &TXT) -> String {
    txt.txt_data()
        .iter()
        .map(|chunk| {
            let text = String::from_utf8_lossy(chunk);
            let mut quoted = String::with_capacity(text.len() + 2);
            quoted.push('"');
            for c in text.chars() {
                if c == '"' || c == '\\' {
                    quoted.push('\\');
                }
                quoted.push(c);
            }
            quoted.push('"');
            quoted
        })
        .collect::<Vec<_>>()
        .join(" ")
}
