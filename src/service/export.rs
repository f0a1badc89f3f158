// ==========================================
// CTF 管理系统 - 排名导出
// ==========================================
// 格式（纯文本，不用于回读）:
//   CTF: <赛事>
//   1. <小组描述> (<得分> 分)
//   2. ...
//   <空行>
// ==========================================

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use crate::domain::{EventKey, Participation};

/// 小组描述查询（导出时解析小组名）
pub trait GroupLookup {
    fn group_description(&self, group_id: i64) -> Option<String>;
}

impl GroupLookup for HashMap<i64, String> {
    fn group_description(&self, group_id: i64) -> Option<String> {
        self.get(&group_id).cloned()
    }
}

/// 无法解析小组名时的占位符
pub const UNKNOWN_GROUP: &str = "N/A";

/// 生成排名文本
///
/// - 真实赛事按赛事 ID 升序；未指定赛事的记录各自成段，排在最后
/// - 赛事内按得分降序，同分按 participation_id 升序
pub fn render_classification(participations: &[Participation], groups: &dyn GroupLookup) -> String {
    let mut by_event: BTreeMap<EventKey, Vec<&Participation>> = BTreeMap::new();
    for p in participations {
        by_event.entry(p.event_key()).or_default().push(p);
    }

    let mut out = String::new();
    for (event, mut entries) in by_event {
        entries.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(a.participation_id.cmp(&b.participation_id))
        });

        out.push_str(&format!("CTF: {}\n", event));
        for (index, p) in entries.iter().enumerate() {
            let name = groups
                .group_description(p.group_id)
                .unwrap_or_else(|| UNKNOWN_GROUP.to_string());
            out.push_str(&format!("{}. {} ({} 分)\n", index + 1, name, p.score));
        }
        out.push('\n');
    }
    out
}

/// 写入导出文件（自动创建父目录，覆盖原有内容）
pub fn write_export(destination: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(destination, content)
}
