// ==========================================
// 高校排课系统 - 课程与教学班数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::academic::{Course, Section};
use crate::repository::db_utils::build_in_clause;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// CourseRepository - 课程仓储
// ==========================================
pub struct CourseRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CourseRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增或更新课程
    pub fn upsert(&self, course: &Course) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"INSERT INTO course (id, name, min_teachers, max_teachers)
               VALUES (?1, ?2, ?3, ?4)
               ON CONFLICT(id) DO UPDATE SET
                   name = excluded.name,
                   min_teachers = excluded.min_teachers,
                   max_teachers = excluded.max_teachers"#,
            params![&course.id, &course.name, &course.min_teachers, &course.max_teachers],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Course>> {
        let conn = self.get_conn()?;
        let course = conn
            .query_row(
                "SELECT id, name, min_teachers, max_teachers FROM course WHERE id = ?1",
                params![id],
                map_course,
            )
            .optional()?;
        Ok(course)
    }

    /// 按ID列表批量查询课程（按ID排序）
    pub fn find_by_ids(&self, ids: &[String]) -> RepositoryResult<Vec<Course>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT id, name, min_teachers, max_teachers FROM course WHERE {} ORDER BY id",
            build_in_clause("id", ids.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let courses = stmt
            .query_map(params_from_iter(ids.iter()), map_course)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(courses)
    }
}

fn map_course(row: &rusqlite::Row) -> rusqlite::Result<Course> {
    Ok(Course {
        id: row.get(0)?,
        name: row.get(1)?,
        min_teachers: row.get(2)?,
        max_teachers: row.get(3)?,
    })
}

// ==========================================
// SectionRepository - 教学班仓储
// ==========================================
pub struct SectionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SectionRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增或更新教学班
    pub fn upsert(&self, section: &Section) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"INSERT INTO section (id, name, course_id, period_required, required_seats)
               VALUES (?1, ?2, ?3, ?4, ?5)
               ON CONFLICT(id) DO UPDATE SET
                   name = excluded.name,
                   course_id = excluded.course_id,
                   period_required = excluded.period_required,
                   required_seats = excluded.required_seats"#,
            params![
                &section.id,
                &section.name,
                &section.course_id,
                &section.period_required,
                &section.required_seats,
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Section>> {
        let conn = self.get_conn()?;
        let section = conn
            .query_row(
                r#"SELECT id, name, course_id, period_required, required_seats
                   FROM section WHERE id = ?1"#,
                params![id],
                map_section,
            )
            .optional()?;
        Ok(section)
    }

    /// 查询若干课程下的全部教学班（按课程、ID排序）
    pub fn find_by_course_ids(&self, course_ids: &[String]) -> RepositoryResult<Vec<Section>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"SELECT id, name, course_id, period_required, required_seats
               FROM section WHERE {} ORDER BY course_id, id"#,
            build_in_clause("course_id", course_ids.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let sections = stmt
            .query_map(params_from_iter(course_ids.iter()), map_section)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sections)
    }

    pub fn find_by_course(&self, course_id: &str) -> RepositoryResult<Vec<Section>> {
        self.find_by_course_ids(&[course_id.to_string()])
    }
}

fn map_section(row: &rusqlite::Row) -> rusqlite::Result<Section> {
    Ok(Section {
        id: row.get(0)?,
        name: row.get(1)?,
        course_id: row.get(2)?,
        period_required: row.get(3)?,
        required_seats: row.get(4)?,
    })
}
