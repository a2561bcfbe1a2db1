//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::env;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use dns_update_provider::{
    DnsProvider, DnsTransport, ExchangeKind, ProviderCredentials, ProviderError, Record,
    Rfc2136Provider, create_provider,
};
use hickory_proto::dnssec::rdata::tsig::{TSIG, TsigAlgorithm, make_tsig_record, message_tbs};
use hickory_proto::dnssec::tsig::TSigner;
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::{DNSClass, Name, Record as WireRecord, RecordType};
use hickory_proto::serialize::txt::Parser;
use hickory_proto::xfer::DnsResponse;

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Err`，并解包返回错误（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_err {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_err(), "expected Err(..), got Ok");
        let Err(err) = res else {
            return;
        };
        err
    }};
}

pub const ZONE: &str = "example.com.";

/// 生成唯一的测试记录名称
pub fn generate_test_record_name() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("_test-{}", &uuid.to_string()[..8])
}

/// 构造记录
pub fn record(name: &str, record_type: &str, data: &str, ttl: u64) -> Record {
    Record::new(name, record_type, data, Duration::from_secs(ttl))
}

/// 记录的 (name, type, data, ttl 秒)，便于比较
pub fn summary(records: &[Record]) -> Vec<(String, String, String, u64)> {
    let mut out: Vec<_> = records
        .iter()
        .map(|r| {
            (
                r.name.clone(),
                r.record_type.clone(),
                r.data.clone(),
                r.ttl.as_secs(),
            )
        })
        .collect();
    out.sort();
    out
}

/// 解析区域文件片段
pub fn parse_zone(zone: &str, text: &str) -> Vec<WireRecord> {
    let origin = Name::from_ascii(zone).ok();
    let Ok((_, sets)) = Parser::new(format!("{text}\n"), None, origin).parse() else {
        return Vec::new();
    };
    sets.values()
        .flat_map(|set| set.records_without_rrsigs())
        .cloned()
        .collect()
}

fn same_rr(a: &WireRecord, b: &WireRecord) -> bool {
    a.name() == b.name() && a.record_type() == b.record_type() && a.data() == b.data()
}

// ============ Mock 传输层 ============

/// 内存中的权威服务器：按 RFC 2136 应用更新，并以 AXFR 提供区域内容
pub struct MockTransport {
    soa: WireRecord,
    records: Mutex<Vec<WireRecord>>,
    rcode: Mutex<Option<ResponseCode>>,
    requests: Mutex<Vec<Vec<u8>>>,
    signer: Option<TSigner>,
}

impl MockTransport {
    pub fn new(zone: &str) -> Arc<Self> {
        Self::with_records(zone, "")
    }

    /// 以区域文件片段作为初始内容
    pub fn with_records(zone: &str, text: &str) -> Arc<Self> {
        Arc::new(Self::build(zone, text, None))
    }

    /// 要求请求带有效 TSIG（否则应答 NOTAUTH），并对每条响应签名
    pub fn signed(zone: &str, text: &str, signer: TSigner) -> Arc<Self> {
        Arc::new(Self::build(zone, text, Some(signer)))
    }

    fn build(zone: &str, text: &str, signer: Option<TSigner>) -> Self {
        let mut soa = parse_zone(
            zone,
            "@ 3600 IN SOA ns1 hostmaster 1 7200 3600 1209600 300",
        );
        Self {
            soa: soa.remove(0),
            records: Mutex::new(parse_zone(zone, text)),
            rcode: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
            signer,
        }
    }

    /// 之后的所有请求都以该响应码应答，且不修改区域
    pub fn respond_with(&self, rcode: ResponseCode) {
        *self.rcode.lock().unwrap_or_else(PoisonError::into_inner) = Some(rcode);
    }

    /// 已收到的原始请求
    pub fn raw_requests(&self) -> Vec<Vec<u8>> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 已收到的请求（解码后）
    pub fn requests(&self) -> Vec<Message> {
        self.raw_requests()
            .iter()
            .filter_map(|raw| Message::from_vec(raw).ok())
            .collect()
    }

    /// 已收到的 UPDATE 请求
    pub fn updates(&self) -> Vec<Message> {
        self.requests()
            .into_iter()
            .filter(|m| m.op_code() == OpCode::Update)
            .collect()
    }

    /// 当前区域内容（不含 SOA）的文本形式，已排序
    pub fn zone_texts(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(ToString::to_string)
            .collect();
        out.sort();
        out
    }

    fn apply_update(&self, request: &Message) {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        for rr in request.name_servers() {
            // SOA 由服务器维护，增删都忽略
            if rr.record_type() == RecordType::SOA {
                continue;
            }
            if rr.dns_class() == DNSClass::NONE {
                records.retain(|existing| !same_rr(existing, rr));
            } else if let Some(existing) = records.iter_mut().find(|e| same_rr(e, rr)) {
                existing.set_ttl(rr.ttl());
            } else {
                records.push(rr.clone());
            }
        }
    }

    fn response(request: &Message, rcode: ResponseCode, answers: Vec<WireRecord>) -> Message {
        let mut response = Message::new();
        response
            .set_id(request.id())
            .set_message_type(MessageType::Response)
            .set_op_code(request.op_code())
            .set_response_code(rcode);
        response.add_queries(request.queries().to_vec());
        response.add_answers(answers);
        response
    }

    /// 不签名时直接编码
    fn encode(messages: Vec<Message>) -> Vec<Vec<u8>> {
        messages
            .iter()
            .map(|m| m.to_vec().unwrap_or_default())
            .collect()
    }

    /// RFC 8945 4.3: 首条响应的 MAC 链接请求 MAC，之后每条链接前一条，
    /// 后续报文只覆盖时间与 fudge
    fn sign_responses(
        signer: &TSigner,
        request_mac: Vec<u8>,
        time: u64,
        messages: Vec<Message>,
    ) -> Vec<Vec<u8>> {
        let mut previous = request_mac;
        let mut out = Vec::with_capacity(messages.len());
        for (i, mut message) in messages.into_iter().enumerate() {
            let pre_tsig = TSIG::new(
                signer.algorithm().clone(),
                time,
                signer.fudge(),
                Vec::new(),
                message.id(),
                0,
                Vec::new(),
            );

            let mut tbs = u16::try_from(previous.len())
                .unwrap_or_default()
                .to_be_bytes()
                .to_vec();
            tbs.extend_from_slice(&previous);
            if i == 0 {
                tbs.extend(
                    message_tbs(None, &message, &pre_tsig, signer.signer_name())
                        .unwrap_or_default(),
                );
            } else {
                tbs.extend(message.to_vec().unwrap_or_default());
                tbs.extend_from_slice(&u16::try_from(time >> 32).unwrap_or_default().to_be_bytes());
                tbs.extend_from_slice(&u32::try_from(time & 0xffff_ffff).unwrap_or_default().to_be_bytes());
                tbs.extend_from_slice(&signer.fudge().to_be_bytes());
            }

            let mac = signer.sign(&tbs).unwrap_or_default();
            message.add_tsig(make_tsig_record(
                signer.signer_name().clone(),
                pre_tsig.set_mac(mac.clone()),
            ));
            previous = mac;
            out.push(message.to_vec().unwrap_or_default());
        }
        out
    }

    /// 生成应答报文；带签名器时先校验请求签名
    fn answer(&self, raw: &[u8], message: &Message, kind: ExchangeKind) -> Vec<Vec<u8>> {
        let verified = match &self.signer {
            Some(signer) => match signer.verify_message_byte(None, raw, true) {
                Ok((mac, _, time)) => Some((signer, mac, time)),
                Err(_) => {
                    return Self::encode(vec![Self::response(
                        message,
                        ResponseCode::NotAuth,
                        Vec::new(),
                    )]);
                }
            },
            None => None,
        };

        let messages = self.handle(message, kind);
        match verified {
            Some((signer, mac, time)) => Self::sign_responses(signer, mac, time, messages),
            None => Self::encode(messages),
        }
    }

    fn handle(&self, message: &Message, kind: ExchangeKind) -> Vec<Message> {
        if let Some(rcode) = *self.rcode.lock().unwrap_or_else(PoisonError::into_inner) {
            return vec![Self::response(message, rcode, Vec::new())];
        }

        match kind {
            ExchangeKind::ZoneTransfer => {
                // 分两条报文发送，结尾是第二条 SOA
                let mut first = vec![self.soa.clone()];
                first.extend(
                    self.records
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .iter()
                        .cloned(),
                );
                vec![
                    Self::response(message, ResponseCode::NoError, first),
                    Self::response(message, ResponseCode::NoError, vec![self.soa.clone()]),
                ]
            }
            ExchangeKind::Single => {
                if message.op_code() == OpCode::Update {
                    self.apply_update(message);
                }
                vec![Self::response(message, ResponseCode::NoError, Vec::new())]
            }
        }
    }
}

#[async_trait]
impl DnsTransport for MockTransport {
    async fn exchange(
        &self,
        _server: &str,
        request: &[u8],
        kind: ExchangeKind,
    ) -> dns_update_provider::Result<Vec<DnsResponse>> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.to_vec());

        let parse_error = |e: hickory_proto::ProtoError| ProviderError::ParseError {
            provider: "mock".to_string(),
            detail: e.to_string(),
        };

        let message = Message::from_vec(request).map_err(parse_error)?;
        self.answer(request, &message, kind)
            .into_iter()
            .map(|raw| DnsResponse::from_buffer(raw).map_err(parse_error))
            .collect()
    }
}

/// 基于 Mock 传输层的匿名 Provider
pub fn mock_provider(transport: &Arc<MockTransport>) -> Rfc2136Provider {
    let transport: Arc<dyn DnsTransport> = transport.clone();
    Rfc2136Provider::builder("127.0.0.1:53")
        .transport(transport)
        .build()
        .unwrap_or_else(|e| panic!("mock provider: {e}"))
}

pub const TSIG_KEY: &str = "update-key";
/// `base64("secret")`
pub const TSIG_SECRET: &str = "c2VjcmV0";

/// 与 `hmac-sha256:update-key:c2VjcmV0` 对应的服务器端签名器
pub fn server_signer(secret: &[u8]) -> TSigner {
    let name = Name::from_ascii(format!("{TSIG_KEY}.")).unwrap_or_else(|e| panic!("{e}"));
    TSigner::new(secret.to_vec(), TsigAlgorithm::HmacSha256, name, 300)
        .unwrap_or_else(|e| panic!("server signer: {e}"))
}

/// 基于 Mock 传输层、使用 TSIG 的 Provider
pub fn signed_mock_provider(transport: &Arc<MockTransport>, tsig: &str) -> Rfc2136Provider {
    let transport: Arc<dyn DnsTransport> = transport.clone();
    Rfc2136Provider::builder("127.0.0.1:53")
        .tsig(tsig)
        .transport(transport)
        .build()
        .unwrap_or_else(|e| panic!("signed mock provider: {e}"))
}

// ============ 真实服务器 ============

/// 测试上下文 - 封装 Provider 和测试 zone
pub struct TestContext {
    pub provider: Arc<dyn DnsProvider>,
    pub zone: String,
}

impl TestContext {
    /// 从 `RFC2136_SERVER` / `RFC2136_TSIG` / `TEST_ZONE` 创建测试上下文
    pub fn rfc2136() -> Option<Self> {
        let server = env::var("RFC2136_SERVER").ok()?;
        let tsig = env::var("RFC2136_TSIG").ok();
        let zone = env::var("TEST_ZONE").ok()?;

        let provider = create_provider(ProviderCredentials::Rfc2136 { server, tsig }).ok()?;

        Some(Self { provider, zone })
    }

    /// 清理测试记录（以 _test- 开头的记录）
    pub async fn cleanup_all_test_records(&self) {
        if let Ok(records) = self.provider.get_records(&self.zone).await {
            let stale: Vec<Record> = records
                .into_iter()
                .filter(|r| r.name.starts_with("_test-"))
                .collect();
            let _ = self.provider.delete_records(&self.zone, &stale).await;
        }
    }
}
