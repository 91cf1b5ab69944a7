// ==========================================
// 高校排课系统 - 教师与学期数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::academic::{Semester, Teacher};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// TeacherRepository - 教师仓储
// ==========================================
pub struct TeacherRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TeacherRepository {
    /// 创建新的TeacherRepository实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增或更新教师
    pub fn upsert(&self, teacher: &Teacher) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"INSERT INTO teacher (id, name, status, semester)
               VALUES (?1, ?2, ?3, ?4)
               ON CONFLICT(id) DO UPDATE SET
                   name = excluded.name,
                   status = excluded.status,
                   semester = excluded.semester"#,
            params![&teacher.id, &teacher.name, &teacher.status, &teacher.semester],
        )?;
        Ok(())
    }

    /// 按ID查询教师
    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Teacher>> {
        let conn = self.get_conn()?;
        let teacher = conn
            .query_row(
                "SELECT id, name, status, semester FROM teacher WHERE id = ?1",
                params![id],
                map_teacher,
            )
            .optional()?;
        Ok(teacher)
    }

    /// 查询学期内全部教师
    pub fn find_by_semester(&self, semester: &str) -> RepositoryResult<Vec<Teacher>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, status, semester FROM teacher WHERE semester = ?1 ORDER BY id",
        )?;
        let teachers = stmt
            .query_map(params![semester], map_teacher)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(teachers)
    }

    /// 删除教师（注册与偏好级联删除）
    pub fn delete(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM teacher WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Teacher".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

fn map_teacher(row: &rusqlite::Row) -> rusqlite::Result<Teacher> {
    Ok(Teacher {
        id: row.get(0)?,
        name: row.get(1)?,
        status: row.get(2)?,
        semester: row.get(3)?,
    })
}

// ==========================================
// SemesterRepository - 学期仓储
// ==========================================
pub struct SemesterRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SemesterRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增或更新学期
    pub fn upsert(&self, semester: &Semester) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"INSERT INTO semester (id, name, start_date, end_date)
               VALUES (?1, ?2, ?3, ?4)
               ON CONFLICT(id) DO UPDATE SET
                   name = excluded.name,
                   start_date = excluded.start_date,
                   end_date = excluded.end_date"#,
            params![
                &semester.id,
                &semester.name,
                &semester.start_date,
                &semester.end_date,
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Semester>> {
        let conn = self.get_conn()?;
        let semester = conn
            .query_row(
                "SELECT id, name, start_date, end_date FROM semester WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Semester {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        start_date: row.get(2)?,
                        end_date: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(semester)
    }

    /// 查询全部学期（按开始日期倒序）
    pub fn find_all(&self) -> RepositoryResult<Vec<Semester>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, start_date, end_date FROM semester ORDER BY start_date DESC, id",
        )?;
        let semesters = stmt
            .query_map([], |row| {
                Ok(Semester {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    start_date: row.get(2)?,
                    end_date: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(semesters)
    }
}
