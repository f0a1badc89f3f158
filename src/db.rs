// ==========================================
// CTF 管理系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为（外键必须每个连接单独开启）
// - 统一 busy_timeout
// - 建表（仅 CREATE IF NOT EXISTS，不做迁移）
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 创建 groups / participations 表（幂等）
///
/// 说明：
/// - groups.best_participation_id 在参赛记录被删除时置空，由重算补齐
/// - participations.group_id 不级联，删除仍有参赛记录的小组会触发外键错误
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS groups (
            group_id INTEGER PRIMARY KEY AUTOINCREMENT,
            description TEXT NOT NULL,
            best_participation_id INTEGER
                REFERENCES participations(participation_id) ON DELETE SET NULL
        );

        CREATE TABLE IF NOT EXISTS participations (
            participation_id INTEGER PRIMARY KEY AUTOINCREMENT,
            group_id INTEGER NOT NULL REFERENCES groups(group_id),
            event_id INTEGER,
            score INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_participations_group
            ON participations(group_id, score DESC, participation_id ASC);
        "#,
    )
}

/// 打开连接并确保 schema 存在
pub fn init_database(db_path: &str) -> rusqlite::Result<()> {
    let conn = open_sqlite_connection(db_path)?;
    ensure_schema(&conn)?;
    Ok(())
}
