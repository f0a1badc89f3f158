// ==========================================
// CTF 管理系统 - 参赛记录领域模型
// ==========================================
// 对齐: participations 表
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Participation - 参赛记录 (一次 CTF 得分)
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participation {
    pub participation_id: i64, // 主键 (由数据库分配)
    pub group_id: i64,         // 所属小组
    pub event_id: Option<i64>, // 所属 CTF 赛事 (可选)
    pub score: i64,            // 得分
}

impl Participation {
    /// 导出分组所用的赛事键
    ///
    /// 未指定赛事的记录各自独立成组，不与任何真实赛事合并。
    pub fn event_key(&self) -> EventKey {
        match self.event_id {
            Some(event_id) => EventKey::Event(event_id),
            None => EventKey::Unassigned(self.participation_id),
        }
    }
}

// ==========================================
// EventKey - 赛事分组键
// ==========================================
/// 排序: 全部真实赛事（按赛事 ID）在前，未指定赛事的记录（按参赛记录 ID）在后
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKey {
    /// 真实 CTF 赛事
    Event(i64),
    /// 未指定赛事，值为参赛记录 ID
    Unassigned(i64),
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKey::Event(event_id) => write!(f, "{}", event_id),
            EventKey::Unassigned(participation_id) => write!(f, "- (#{})", participation_id),
        }
    }
}
