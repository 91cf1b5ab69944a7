// ==========================================
// 高校排课系统 - 教学注册数据仓储
// ==========================================

use crate::domain::academic::TeachingRegistration;
use crate::domain::types::RegistrationStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// TeachingRegistrationRepository - 教学注册仓储
// ==========================================
pub struct TeachingRegistrationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TeachingRegistrationRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增或更新注册
    pub fn upsert(&self, registration: &TeachingRegistration) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"INSERT INTO teaching_registration (id, teacher_id, semester, status, max_courses)
               VALUES (?1, ?2, ?3, ?4, ?5)
               ON CONFLICT(id) DO UPDATE SET
                   teacher_id = excluded.teacher_id,
                   semester = excluded.semester,
                   status = excluded.status,
                   max_courses = excluded.max_courses"#,
            params![
                &registration.id,
                &registration.teacher_id,
                &registration.semester,
                registration.status.to_db_str(),
                &registration.max_courses,
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<TeachingRegistration>> {
        let conn = self.get_conn()?;
        let registration = conn
            .query_row(
                r#"SELECT id, teacher_id, semester, status, max_courses
                   FROM teaching_registration WHERE id = ?1"#,
                params![id],
                map_registration,
            )
            .optional()?;
        Ok(registration)
    }

    /// 按状态与学期查询注册（按教师ID排序）
    pub fn find_by_status_and_semester(
        &self,
        status: RegistrationStatus,
        semester: &str,
    ) -> RepositoryResult<Vec<TeachingRegistration>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT id, teacher_id, semester, status, max_courses
               FROM teaching_registration
               WHERE status = ?1 AND semester = ?2
               ORDER BY teacher_id, id"#,
        )?;
        let registrations = stmt
            .query_map(params![status.to_db_str(), semester], map_registration)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(registrations)
    }

    /// 更新注册状态（审核）
    pub fn update_status(&self, id: &str, status: RegistrationStatus) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE teaching_registration SET status = ?1 WHERE id = ?2",
            params![status.to_db_str(), id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "TeachingRegistration".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

fn map_registration(row: &rusqlite::Row) -> rusqlite::Result<TeachingRegistration> {
    let status: String = row.get(3)?;
    Ok(TeachingRegistration {
        id: row.get(0)?,
        teacher_id: row.get(1)?,
        semester: row.get(2)?,
        status: RegistrationStatus::from_str(&status),
        max_courses: row.get(4)?,
    })
}
