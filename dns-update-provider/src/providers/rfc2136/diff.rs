//! 计算把 zone 收敛到期望记录集所需的增删集合
//!
//! 动态更新只有“插入”和“删除”两种操作，没有原子替换，所以 `set_records`
//! 先取当前状态，再按记录的完整文本（指纹）做差集。

use std::collections::HashSet;

use hickory_proto::rr::Record as WireRecord;

use super::codec::identity;

/// Insert and remove sets for one update message.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordDiff {
    /// Every desired record, in caller order.
    pub insert: Vec<WireRecord>,
    /// Current records whose fingerprint is not among the desired ones.
    pub remove: Vec<WireRecord>,
}

impl RecordDiff {
    /// `(current, desired) -> (insert, remove)`.
    ///
    /// Desired records already present are still inserted; the server treats an insert of an
    /// existing RR as a no-op. Identical desired records collapse to one fingerprint.
    pub(crate) fn compute(current: &[WireRecord], desired: Vec<WireRecord>) -> Self {
        let wanted: HashSet<String> = desired.iter().map(identity).collect();

        let remove = current
            .iter()
            .filter(|rr| !wanted.contains(&identity(rr)))
            .cloned()
            .collect();

        Self {
            insert: desired,
            remove,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.insert.is_empty() && self.remove.is_empty()
    }
}
