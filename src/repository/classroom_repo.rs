// ==========================================
// 高校排课系统 - 教室数据仓储
// ==========================================

use crate::domain::academic::Classroom;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// ClassroomRepository - 教室仓储
// ==========================================
pub struct ClassroomRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ClassroomRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增或更新教室
    pub fn upsert(&self, classroom: &Classroom) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"INSERT INTO classroom (id, name, capacity, status, semester)
               VALUES (?1, ?2, ?3, ?4, ?5)
               ON CONFLICT(id) DO UPDATE SET
                   name = excluded.name,
                   capacity = excluded.capacity,
                   status = excluded.status,
                   semester = excluded.semester"#,
            params![
                &classroom.id,
                &classroom.name,
                &classroom.capacity,
                &classroom.status,
                &classroom.semester,
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Classroom>> {
        let conn = self.get_conn()?;
        let classroom = conn
            .query_row(
                "SELECT id, name, capacity, status, semester FROM classroom WHERE id = ?1",
                params![id],
                map_classroom,
            )
            .optional()?;
        Ok(classroom)
    }

    /// 查询学期内全部教室
    pub fn find_by_semester(&self, semester: &str) -> RepositoryResult<Vec<Classroom>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT id, name, capacity, status, semester
               FROM classroom WHERE semester = ?1 ORDER BY id"#,
        )?;
        let classrooms = stmt
            .query_map(params![semester], map_classroom)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(classrooms)
    }

    /// 统计学期内教室数量
    pub fn count_by_semester(&self, semester: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM classroom WHERE semester = ?1",
            params![semester],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn map_classroom(row: &rusqlite::Row) -> rusqlite::Result<Classroom> {
    Ok(Classroom {
        id: row.get(0)?,
        name: row.get(1)?,
        capacity: row.get(2)?,
        status: row.get(3)?,
        semester: row.get(4)?,
    })
}
