// ==========================================
// 高校排课系统 - SQLite 连接初始化与建表
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为（外键、busy_timeout）
// - 提供幂等建表 init_schema，供应用启动与测试共用
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

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

/// 打开内存数据库（单元测试用），已建表
pub fn open_in_memory() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure_sqlite_connection(&conn)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// 初始化数据库 schema（幂等）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL DEFAULT 'global',
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS semester (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            start_date TEXT,
            end_date TEXT
        );

        CREATE TABLE IF NOT EXISTS teacher (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            status TEXT,
            semester TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS course (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            min_teachers INTEGER,
            max_teachers INTEGER
        );

        CREATE TABLE IF NOT EXISTS section (
            id TEXT PRIMARY KEY,
            name TEXT,
            course_id TEXT NOT NULL REFERENCES course(id) ON DELETE CASCADE,
            period_required INTEGER,
            required_seats INTEGER
        );

        CREATE TABLE IF NOT EXISTS classroom (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            capacity INTEGER,
            status TEXT,
            semester TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS period (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            order_index INTEGER NOT NULL UNIQUE,
            description TEXT
        );

        CREATE TABLE IF NOT EXISTS teaching_registration (
            id TEXT PRIMARY KEY,
            teacher_id TEXT NOT NULL REFERENCES teacher(id) ON DELETE CASCADE,
            semester TEXT NOT NULL,
            status TEXT NOT NULL,
            max_courses INTEGER,
            UNIQUE (teacher_id, semester)
        );

        CREATE TABLE IF NOT EXISTS course_preference (
            id TEXT PRIMARY KEY,
            semester TEXT NOT NULL,
            teacher_id TEXT NOT NULL REFERENCES teacher(id) ON DELETE CASCADE,
            teaching_registration_id TEXT NOT NULL
                REFERENCES teaching_registration(id) ON DELETE CASCADE,
            course_id TEXT REFERENCES course(id) ON DELETE SET NULL,
            preference_value INTEGER,
            UNIQUE (teacher_id, course_id)
        );

        CREATE TABLE IF NOT EXISTS time_preference (
            id TEXT PRIMARY KEY,
            teacher_id TEXT NOT NULL REFERENCES teacher(id) ON DELETE CASCADE,
            semester TEXT NOT NULL,
            teaching_registration_id TEXT NOT NULL
                REFERENCES teaching_registration(id) ON DELETE CASCADE,
            day TEXT NOT NULL,
            period_id TEXT NOT NULL REFERENCES period(id) ON DELETE CASCADE,
            preference_value INTEGER,
            UNIQUE (teacher_id, semester, day, period_id)
        );

        CREATE TABLE IF NOT EXISTS schedule (
            id TEXT PRIMARY KEY,
            semester TEXT NOT NULL,
            name TEXT NOT NULL,
            assignments_json TEXT NOT NULL,
            statistics_json TEXT NOT NULL,
            objective_value INTEGER,
            penalties_json TEXT,
            scores_json TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE (semester, name)
        );

        CREATE INDEX IF NOT EXISTS idx_registration_semester_status
            ON teaching_registration(semester, status);
        CREATE INDEX IF NOT EXISTS idx_classroom_semester ON classroom(semester);
        CREATE INDEX IF NOT EXISTS idx_section_course ON section(course_id);
        CREATE INDEX IF NOT EXISTS idx_schedule_semester ON schedule(semester);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), Some(CURRENT_SCHEMA_VERSION));
    }

    #[test]
    fn test_schema_version_absent_on_empty_db() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), None);
    }
}
