// ==========================================
// 高校排课系统 - 课程偏好 / 时间偏好数据仓储
// ==========================================
// 偏好均挂靠教学注册 (teaching_registration_id)
// ==========================================

use crate::domain::academic::{CoursePreference, TimePreference};
use crate::domain::types::Weekday;
use crate::repository::db_utils::build_in_clause;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, params_from_iter, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// CoursePreferenceRepository - 课程偏好仓储
// ==========================================
pub struct CoursePreferenceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CoursePreferenceRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增或更新课程偏好（唯一键: teacher_id + course_id）
    pub fn upsert(&self, pref: &CoursePreference) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"INSERT INTO course_preference (
                   id, semester, teacher_id, teaching_registration_id, course_id, preference_value
               ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
               ON CONFLICT(id) DO UPDATE SET
                   semester = excluded.semester,
                   teacher_id = excluded.teacher_id,
                   teaching_registration_id = excluded.teaching_registration_id,
                   course_id = excluded.course_id,
                   preference_value = excluded.preference_value"#,
            params![
                &pref.id,
                &pref.semester,
                &pref.teacher_id,
                &pref.registration_id,
                &pref.course_id,
                &pref.preference_value,
            ],
        )?;
        Ok(())
    }

    /// 查询挂靠在给定注册下的课程偏好
    pub fn find_by_registration_ids(
        &self,
        registration_ids: &[String],
    ) -> RepositoryResult<Vec<CoursePreference>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"SELECT id, semester, teacher_id, teaching_registration_id, course_id, preference_value
               FROM course_preference WHERE {} ORDER BY teacher_id, course_id"#,
            build_in_clause("teaching_registration_id", registration_ids.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let prefs = stmt
            .query_map(params_from_iter(registration_ids.iter()), map_course_preference)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(prefs)
    }

    /// 查询学期内全部课程偏好
    pub fn find_by_semester(&self, semester: &str) -> RepositoryResult<Vec<CoursePreference>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT id, semester, teacher_id, teaching_registration_id, course_id, preference_value
               FROM course_preference WHERE semester = ?1 ORDER BY teacher_id, course_id"#,
        )?;
        let prefs = stmt
            .query_map(params![semester], map_course_preference)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(prefs)
    }
}

fn map_course_preference(row: &rusqlite::Row) -> rusqlite::Result<CoursePreference> {
    Ok(CoursePreference {
        id: row.get(0)?,
        semester: row.get(1)?,
        teacher_id: row.get(2)?,
        registration_id: row.get(3)?,
        course_id: row.get(4)?,
        preference_value: row.get(5)?,
    })
}

// ==========================================
// TimePreferenceRepository - 时间偏好仓储
// ==========================================
pub struct TimePreferenceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TimePreferenceRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增或更新时间偏好（唯一键: teacher_id + semester + day + period_id）
    pub fn upsert(&self, pref: &TimePreference) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"INSERT INTO time_preference (
                   id, teacher_id, semester, teaching_registration_id, day, period_id, preference_value
               ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
               ON CONFLICT(id) DO UPDATE SET
                   teacher_id = excluded.teacher_id,
                   semester = excluded.semester,
                   teaching_registration_id = excluded.teaching_registration_id,
                   day = excluded.day,
                   period_id = excluded.period_id,
                   preference_value = excluded.preference_value"#,
            params![
                &pref.id,
                &pref.teacher_id,
                &pref.semester,
                &pref.registration_id,
                pref.day.to_db_str(),
                &pref.period_id,
                &pref.preference_value,
            ],
        )?;
        Ok(())
    }

    /// 查询挂靠在给定注册下的时间偏好
    pub fn find_by_registration_ids(
        &self,
        registration_ids: &[String],
    ) -> RepositoryResult<Vec<TimePreference>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"SELECT id, teacher_id, semester, teaching_registration_id, day, period_id, preference_value
               FROM time_preference WHERE {} ORDER BY teacher_id, day, period_id"#,
            build_in_clause("teaching_registration_id", registration_ids.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let prefs = stmt
            .query_map(params_from_iter(registration_ids.iter()), map_time_preference)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(prefs)
    }

    /// 查询学期内全部时间偏好
    pub fn find_by_semester(&self, semester: &str) -> RepositoryResult<Vec<TimePreference>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT id, teacher_id, semester, teaching_registration_id, day, period_id, preference_value
               FROM time_preference WHERE semester = ?1 ORDER BY teacher_id, day, period_id"#,
        )?;
        let prefs = stmt
            .query_map(params![semester], map_time_preference)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(prefs)
    }
}

fn map_time_preference(row: &rusqlite::Row) -> rusqlite::Result<TimePreference> {
    let day_str: String = row.get(4)?;
    let day = Weekday::parse(&day_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Text,
            format!("无法识别的星期: {}", day_str).into(),
        )
    })?;
    Ok(TimePreference {
        id: row.get(0)?,
        teacher_id: row.get(1)?,
        semester: row.get(2)?,
        registration_id: row.get(3)?,
        day,
        period_id: row.get(5)?,
        preference_value: row.get(6)?,
    })
}
