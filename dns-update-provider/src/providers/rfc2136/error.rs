//! RFC 2136 响应码映射

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawDnsError};

use super::{PROVIDER_NAME, Rfc2136Provider};

/// RCODE 助记符
///
/// hickory 的 `ResponseCode` 文本是描述（如 `Query Refused`），不是 IANA 助记符，这里自带映射表。
/// Reference: <https://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml#dns-parameters-6>
pub(crate) fn rcode_mnemonic(code: u16) -> String {
    let name = match code {
        0 => "NOERROR",
        1 => "FORMERR",
        2 => "SERVFAIL",
        3 => "NXDOMAIN",
        4 => "NOTIMP",
        5 => "REFUSED",
        6 => "YXDOMAIN",
        7 => "YXRRSET",
        8 => "NXRRSET",
        9 => "NOTAUTH",
        10 => "NOTZONE",
        11 => "DSOTYPENI",
        16 => "BADSIG",
        17 => "BADKEY",
        18 => "BADTIME",
        19 => "BADMODE",
        20 => "BADNAME",
        21 => "BADALG",
        22 => "BADTRUNC",
        23 => "BADCOOKIE",
        _ => return format!("RCODE{code}"),
    };
    name.to_string()
}

impl ProviderErrorMapper for Rfc2136Provider {
    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn map_error(&self, raw: RawDnsError, context: ErrorContext) -> ProviderError {
        // 所有非成功响应码都视为服务器明确拒绝
        ProviderError::ProtocolError {
            provider: self.provider_name().to_string(),
            code: raw.code,
            rcode: raw.mnemonic,
            zone: context.zone,
        }
    }
}
