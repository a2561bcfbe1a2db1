//! 报文构造与单次往返：签名 -> 编码 -> 传输 -> 解码 -> 校验

use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::{DNSClass, Record as WireRecord, RecordType};

use crate::error::{ProviderError, Result};
use crate::traits::{ErrorContext, ProviderErrorMapper, RawDnsError};
use crate::transport::ExchangeKind;

use super::Rfc2136Provider;
use super::codec::origin;
use super::error::rcode_mnemonic;

fn new_message(op_code: OpCode) -> Message {
    let mut message = Message::new();
    message
        .set_id(rand::random::<u16>())
        .set_message_type(MessageType::Query)
        .set_op_code(op_code)
        .set_recursion_desired(false);
    message
}

/// `<zone> IN AXFR`
pub(crate) fn transfer_request(zone: &str) -> Result<Message> {
    let mut message = new_message(OpCode::Query);
    message.add_query(Query::query(origin(zone)?, RecordType::AXFR));
    Ok(message)
}

/// UPDATE 报文：zone 段为 `<zone> IN SOA`，更新段先删除后插入
///
/// 删除使用 CLASS NONE、TTL 0（RFC 2136 2.5.4）。服务器按顺序处理更新段，
/// 而按 RDATA 删除不看 TTL，先删后插才能让仅 TTL 变化的记录生效。
pub(crate) fn update_request(
    zone: &str,
    remove: &[WireRecord],
    insert: &[WireRecord],
) -> Result<Message> {
    let mut message = new_message(OpCode::Update);
    message.add_query(Query::query(origin(zone)?, RecordType::SOA));

    let removals = remove.iter().map(|rr| {
        let mut rr = rr.clone();
        rr.set_dns_class(DNSClass::NONE).set_ttl(0);
        rr
    });
    let inserts = insert.iter().map(|rr| {
        let mut rr = rr.clone();
        rr.set_dns_class(DNSClass::IN);
        rr
    });

    // UPDATE 报文的更新段位于权威段
    message.add_name_servers(removals.chain(inserts));
    Ok(message)
}

impl Rfc2136Provider {
    /// Sends one message and returns the decoded responses.
    ///
    /// Every response must match the request id, carry `NOERROR`, and (when signing) pass
    /// TSIG verification. Never retries.
    pub(crate) async fn round_trip(
        &self,
        mut request: Message,
        kind: ExchangeKind,
        ctx: ErrorContext,
    ) -> Result<Vec<Message>> {
        // 1. 签名
        let mut verifier = match &self.authenticator {
            Some(authenticator) => authenticator.sign(&mut request)?,
            None => None,
        };

        // 2. 编码
        let payload = request
            .to_vec()
            .map_err(|e| ProviderError::SerializationError {
                provider: self.provider_name().to_string(),
                detail: e.to_string(),
            })?;

        log::debug!(
            "[{}] {:?} id={} to {} ({} bytes, zone: {})",
            self.provider_name(),
            request.op_code(),
            request.id(),
            self.server,
            payload.len(),
            ctx.zone.as_deref().unwrap_or("-")
        );

        // 3. 传输（传输层已完成解码）
        let responses = self
            .transport
            .exchange(&self.server, &payload, kind)
            .await
            .inspect_err(|e| log::error!("[{}] {e}", self.provider_name()))?;

        if responses.is_empty() {
            return Err(self.parse_error("server sent no response"));
        }

        // 4. 校验
        let mut messages = Vec::with_capacity(responses.len());
        for response in responses {
            if response.id() != request.id() {
                return Err(self.parse_error(format!(
                    "response id {} does not match request id {}",
                    response.id(),
                    request.id()
                )));
            }

            let rcode = response.response_code();
            if rcode != ResponseCode::NoError {
                let code = u16::from(rcode);
                let err = self.map_error(RawDnsError::new(code, rcode_mnemonic(code)), ctx.clone());
                if err.is_expected() {
                    log::warn!("{err}");
                } else {
                    log::error!("{err}");
                }
                return Err(err);
            }

            if let Some(verify) = verifier.as_mut() {
                verify(response.as_buffer()).map_err(|e| ProviderError::VerificationFailed {
                    provider: self.provider_name().to_string(),
                    detail: e.to_string(),
                })?;
            }

            messages.push(response.into_message());
        }

        Ok(messages)
    }

    /// AXFR 全量读取；去掉结束传送的那条 SOA
    pub(crate) async fn transfer(&self, zone: &str) -> Result<Vec<WireRecord>> {
        let request = transfer_request(zone)?;
        let ctx = ErrorContext {
            zone: Some(zone.to_string()),
        };

        let responses = self
            .round_trip(request, ExchangeKind::ZoneTransfer, ctx)
            .await?;

        let mut answers: Vec<WireRecord> = responses
            .iter()
            .flat_map(|m| m.answers().iter().cloned())
            .collect();

        let closed = answers.len() >= 2
            && answers.first().map(WireRecord::record_type) == Some(RecordType::SOA)
            && answers.last().map(WireRecord::record_type) == Some(RecordType::SOA);
        if closed {
            answers.pop();
        }

        log::debug!(
            "[{}] AXFR {zone}: {} record(s)",
            self.provider_name(),
            answers.len()
        );
        Ok(answers)
    }

    /// 发送一条 UPDATE 报文
    pub(crate) async fn update(
        &self,
        zone: &str,
        remove: &[WireRecord],
        insert: &[WireRecord],
    ) -> Result<()> {
        let request = update_request(zone, remove, insert)?;
        let ctx = ErrorContext {
            zone: Some(zone.to_string()),
        };

        log::debug!(
            "[{}] UPDATE {zone}: {} removal(s), {} insert(s)",
            self.provider_name(),
            remove.len(),
            insert.len()
        );

        self.round_trip(request, ExchangeKind::Single, ctx).await?;
        Ok(())
    }
}
