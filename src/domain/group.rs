// ==========================================
// CTF 管理系统 - 小组领域模型
// ==========================================
// 对齐: groups 表
// 红线: best_participation_id 为派生字段，只能经由
//       GroupService::update_best_participation 重算
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Group - 参赛小组
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub group_id: i64,                      // 主键 (由数据库分配)
    pub description: String,                // 小组描述
    pub best_participation_id: Option<i64>, // 最佳参赛记录 (null 表示无参赛记录)
}

impl Group {
    /// 返回携带新最佳参赛指针的副本
    pub fn with_best_participation(&self, best_participation_id: Option<i64>) -> Self {
        Self {
            best_participation_id,
            ..self.clone()
        }
    }
}
