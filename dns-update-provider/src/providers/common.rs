//! Provider 公共工具函数

use std::time::Duration;

// ============ 域名名称处理 ============

/// 规范化 zone 名称：去掉首尾空白，保证以点结尾
/// 如: "example.com" -> "example.com."
pub fn normalize_zone(zone: &str) -> String {
    let zone = zone.trim();
    if zone.ends_with('.') {
        zone.to_string()
    } else {
        format!("{zone}.")
    }
}

/// 将相对名称转换为完整域名（以点结尾）
/// 如: "www" + "example.com." -> "www.example.com."
/// 如: "@" + "example.com." -> "example.com."
/// 如: "mail.other.org." + "example.com." -> "mail.other.org."（已是绝对名称）
pub fn absolute_name(name: &str, zone: &str) -> String {
    let zone = normalize_zone(zone);
    let name = name.trim();

    if name.is_empty() || name == "@" {
        zone
    } else if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.{zone}")
    }
}

/// 将完整域名转换为相对名称
/// 如: "www.example.com." + "example.com." -> "www"
/// 如: "example.com." + "example.com." -> "@"
/// 不在 zone 内的名称保持绝对形式，保证再次调用 `absolute_name` 时不变
pub fn relative_name(fqdn: &str, zone: &str) -> String {
    let zone = normalize_zone(zone);
    let fqdn = normalize_zone(fqdn);

    if fqdn.eq_ignore_ascii_case(&zone) {
        return "@".to_string();
    }

    let suffix_len = zone.len() + 1;
    if fqdn.len() > suffix_len {
        let split = fqdn.len() - suffix_len;
        if fqdn.is_char_boundary(split) {
            let (head, tail) = fqdn.split_at(split);
            // tail = ".<zone>"
            if tail.as_bytes()[0] == b'.' && tail[1..].eq_ignore_ascii_case(&zone) {
                return head.to_string();
            }
        }
    }

    fqdn
}

// ============ TTL 处理 ============

/// `Duration` -> 线上 TTL 秒数（向零截断，超出 u32 范围时饱和）
pub fn ttl_to_seconds(ttl: Duration) -> u32 {
    u32::try_from(ttl.as_secs()).unwrap_or(u32::MAX)
}

/// 线上 TTL 秒数 -> `Duration`
pub fn ttl_from_seconds(seconds: u32) -> Duration {
    Duration::from_secs(u64::from(seconds))
}
