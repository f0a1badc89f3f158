// ==========================================
// CTF 管理系统 - 参赛记录数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 说明: 不校验 group_id 是否存在，由 Service 层负责
// ==========================================

use crate::domain::Participation;
use crate::repository::error::RepositoryResult;
use crate::repository::transaction::{run_in_scope, SharedScope};
use rusqlite::{params, OptionalExtension, Row};

// ==========================================
// ParticipationRepository Trait
// ==========================================
// 用途: participations 表 CRUD
// 实现者: ParticipationRepositoryImpl（使用 rusqlite）
pub trait ParticipationRepository: Send + Sync {
    /// 新建参赛记录（不归属具体赛事），返回数据库分配的 ID
    fn create(&self, group_id: i64, score: i64) -> RepositoryResult<i64>;

    /// 新建归属指定赛事的参赛记录
    fn create_in_event(&self, event_id: i64, group_id: i64, score: i64) -> RepositoryResult<i64>;

    fn find_by_id(&self, participation_id: i64) -> RepositoryResult<Option<Participation>>;

    /// 更新所属小组与得分
    ///
    /// # 返回
    /// - Ok(usize): 受影响行数（0 表示无匹配）
    fn update(&self, participation_id: i64, group_id: i64, new_score: i64)
        -> RepositoryResult<usize>;

    /// 按主键删除（不存在时为空操作）
    fn delete(&self, participation_id: i64) -> RepositoryResult<usize>;

    fn find_all(&self) -> RepositoryResult<Vec<Participation>>;

    fn find_by_group(&self, group_id: i64) -> RepositoryResult<Vec<Participation>>;
}

// ==========================================
// ParticipationRepositoryImpl - SQLite 实现
// ==========================================
pub struct ParticipationRepositoryImpl {
    scope: SharedScope,
}

impl ParticipationRepositoryImpl {
    /// 基于共享事务作用域创建仓储
    pub fn new(scope: SharedScope) -> Self {
        Self { scope }
    }

    fn insert(&self, event_id: Option<i64>, group_id: i64, score: i64) -> RepositoryResult<i64> {
        run_in_scope(&self.scope, |conn| {
            conn.execute(
                "INSERT INTO participations (group_id, event_id, score) VALUES (?1, ?2, ?3)",
                params![group_id, event_id, score],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }
}

impl ParticipationRepository for ParticipationRepositoryImpl {
    fn create(&self, group_id: i64, score: i64) -> RepositoryResult<i64> {
        self.insert(None, group_id, score)
    }

    fn create_in_event(&self, event_id: i64, group_id: i64, score: i64) -> RepositoryResult<i64> {
        self.insert(Some(event_id), group_id, score)
    }

    fn find_by_id(&self, participation_id: i64) -> RepositoryResult<Option<Participation>> {
        run_in_scope(&self.scope, |conn| {
            let participation = conn
                .query_row(
                    r#"
                    SELECT participation_id, group_id, event_id, score
                    FROM participations
                    WHERE participation_id = ?1
                    "#,
                    params![participation_id],
                    map_participation_row,
                )
                .optional()?;
            Ok(participation)
        })
    }

    fn update(
        &self,
        participation_id: i64,
        group_id: i64,
        new_score: i64,
    ) -> RepositoryResult<usize> {
        run_in_scope(&self.scope, |conn| {
            let affected = conn.execute(
                r#"
                UPDATE participations
                SET group_id = ?1, score = ?2
                WHERE participation_id = ?3
                "#,
                params![group_id, new_score, participation_id],
            )?;
            Ok(affected)
        })
    }

    fn delete(&self, participation_id: i64) -> RepositoryResult<usize> {
        run_in_scope(&self.scope, |conn| {
            let affected = conn.execute(
                "DELETE FROM participations WHERE participation_id = ?1",
                params![participation_id],
            )?;
            Ok(affected)
        })
    }

    fn find_all(&self) -> RepositoryResult<Vec<Participation>> {
        run_in_scope(&self.scope, |conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT participation_id, group_id, event_id, score
                FROM participations
                ORDER BY participation_id ASC
                "#,
            )?;
            let participations = stmt
                .query_map([], map_participation_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(participations)
        })
    }

    fn find_by_group(&self, group_id: i64) -> RepositoryResult<Vec<Participation>> {
        run_in_scope(&self.scope, |conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT participation_id, group_id, event_id, score
                FROM participations
                WHERE group_id = ?1
                ORDER BY participation_id ASC
                "#,
            )?;
            let participations = stmt
                .query_map(params![group_id], map_participation_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(participations)
        })
    }
}

// ==========================================
// 辅助函数
// ==========================================

/// 映射 participations 行（列顺序: participation_id, group_id, event_id, score）
pub(crate) fn map_participation_row(row: &Row<'_>) -> rusqlite::Result<Participation> {
    Ok(Participation {
        participation_id: row.get(0)?,
        group_id: row.get(1)?,
        event_id: row.get(2)?,
        score: row.get(3)?,
    })
}
