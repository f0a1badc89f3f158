// ==========================================
// CTF 管理系统 - 小组数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 每个操作在独立的事务作用域内完成
// ==========================================

use crate::domain::{Group, Participation};
use crate::repository::error::RepositoryResult;
use crate::repository::participation_repo::map_participation_row;
use crate::repository::transaction::{run_in_scope, SharedScope};
use rusqlite::{params, OptionalExtension, Row};

// ==========================================
// GroupRepository Trait
// ==========================================
// 用途: groups 表 CRUD + 最佳参赛记录查询
// 实现者: GroupRepositoryImpl（使用 rusqlite）
pub trait GroupRepository: Send + Sync {
    /// 新建小组，返回数据库分配的 ID
    fn create(&self, description: &str) -> RepositoryResult<i64>;

    /// 按主键更新描述与最佳参赛指针
    ///
    /// # 返回
    /// - Ok(usize): 受影响行数（0 表示无匹配，不视为错误）
    fn update(&self, group: &Group) -> RepositoryResult<usize>;

    /// 按主键删除（不存在时为空操作）
    fn delete(&self, group_id: i64) -> RepositoryResult<usize>;

    /// 在同一事务内删除小组及其全部参赛记录
    fn delete_with_participations(&self, group_id: i64) -> RepositoryResult<usize>;

    fn find_by_id(&self, group_id: i64) -> RepositoryResult<Option<Group>>;

    fn find_all(&self) -> RepositoryResult<Vec<Group>>;

    /// 查询小组得分最高的参赛记录（同分取 participation_id 最小者）
    fn find_best_participation(&self, group_id: i64) -> RepositoryResult<Option<Participation>>;
}

// ==========================================
// GroupRepositoryImpl - SQLite 实现
// ==========================================
pub struct GroupRepositoryImpl {
    scope: SharedScope,
}

impl GroupRepositoryImpl {
    /// 基于共享事务作用域创建仓储
    pub fn new(scope: SharedScope) -> Self {
        Self { scope }
    }
}

impl GroupRepository for GroupRepositoryImpl {
    fn create(&self, description: &str) -> RepositoryResult<i64> {
        run_in_scope(&self.scope, |conn| {
            conn.execute(
                "INSERT INTO groups (description) VALUES (?1)",
                params![description],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    fn update(&self, group: &Group) -> RepositoryResult<usize> {
        run_in_scope(&self.scope, |conn| {
            let affected = conn.execute(
                r#"
                UPDATE groups
                SET description = ?1, best_participation_id = ?2
                WHERE group_id = ?3
                "#,
                params![
                    group.description,
                    group.best_participation_id,
                    group.group_id
                ],
            )?;
            Ok(affected)
        })
    }

    fn delete(&self, group_id: i64) -> RepositoryResult<usize> {
        run_in_scope(&self.scope, |conn| {
            let affected = conn.execute("DELETE FROM groups WHERE group_id = ?1", params![group_id])?;
            Ok(affected)
        })
    }

    fn delete_with_participations(&self, group_id: i64) -> RepositoryResult<usize> {
        run_in_scope(&self.scope, |conn| {
            // 1) 先断开最佳指针，避免与参赛记录的循环引用
            conn.execute(
                "UPDATE groups SET best_participation_id = NULL WHERE group_id = ?1",
                params![group_id],
            )?;

            // 2) 删除参赛记录
            let removed = conn.execute(
                "DELETE FROM participations WHERE group_id = ?1",
                params![group_id],
            )?;
            tracing::debug!(group_id, removed, "已删除小组的参赛记录");

            // 3) 删除小组
            let affected = conn.execute("DELETE FROM groups WHERE group_id = ?1", params![group_id])?;
            Ok(affected)
        })
    }

    fn find_by_id(&self, group_id: i64) -> RepositoryResult<Option<Group>> {
        run_in_scope(&self.scope, |conn| {
            let group = conn
                .query_row(
                    r#"
                    SELECT group_id, description, best_participation_id
                    FROM groups
                    WHERE group_id = ?1
                    "#,
                    params![group_id],
                    map_group_row,
                )
                .optional()?;
            Ok(group)
        })
    }

    fn find_all(&self) -> RepositoryResult<Vec<Group>> {
        run_in_scope(&self.scope, |conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT group_id, description, best_participation_id
                FROM groups
                ORDER BY group_id ASC
                "#,
            )?;
            let groups = stmt
                .query_map([], map_group_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(groups)
        })
    }

    fn find_best_participation(&self, group_id: i64) -> RepositoryResult<Option<Participation>> {
        run_in_scope(&self.scope, |conn| {
            let best = conn
                .query_row(
                    r#"
                    SELECT participation_id, group_id, event_id, score
                    FROM participations
                    WHERE group_id = ?1
                    ORDER BY score DESC, participation_id ASC
                    LIMIT 1
                    "#,
                    params![group_id],
                    map_participation_row,
                )
                .optional()?;
            Ok(best)
        })
    }
}

// ==========================================
// 辅助函数
// ==========================================

fn map_group_row(row: &Row<'_>) -> rusqlite::Result<Group> {
    Ok(Group {
        group_id: row.get(0)?,
        description: row.get(1)?,
        best_participation_id: row.get(2)?,
    })
}
