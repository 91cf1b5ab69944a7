// ==========================================
// 高校排课系统 - 排课结果数据仓储
// ==========================================
// 红线: Schedule 只能整体替换 (先删后插, 同一事务)
// 存储: assignments / statistics / penalties / scores 以 JSON 文本保存
// ==========================================

use crate::domain::schedule::{Assignment, Schedule, ScheduleStatistics};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

const SCHEDULE_COLUMNS: &str = "id, semester, name, assignments_json, statistics_json, \
     objective_value, penalties_json, scores_json";

// ==========================================
// ScheduleRepository - 排课结果仓储
// ==========================================
pub struct ScheduleRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ScheduleRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 整体替换 (semester, name) 对应的排课结果
    ///
    /// 删除旧记录与插入新记录处于同一事务: 任一步失败则原记录保持不变
    ///
    /// # 返回
    /// 被替换掉的旧记录数 (0 或 1)
    pub fn replace(&self, schedule: &Schedule) -> RepositoryResult<usize> {
        let assignments_json = serde_json::to_string(&schedule.assignments)?;
        let statistics_json = serde_json::to_string(&schedule.statistics)?;
        let penalties_json = schedule
            .penalties
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let scores_json = schedule
            .scores
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let removed = tx.execute(
            "DELETE FROM schedule WHERE semester = ?1 AND name = ?2",
            params![&schedule.semester, &schedule.name],
        )?;

        tx.execute(
            r#"INSERT INTO schedule (
                   id, semester, name, assignments_json, statistics_json,
                   objective_value, penalties_json, scores_json
               ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
            params![
                &schedule.id,
                &schedule.semester,
                &schedule.name,
                assignments_json,
                statistics_json,
                &schedule.objective_value,
                penalties_json,
                scores_json,
            ],
        )?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(removed)
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Schedule>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM schedule WHERE id = ?1", SCHEDULE_COLUMNS);
        let row = conn.query_row(&sql, params![id], map_schedule_row).optional()?;
        row.map(ScheduleRow::into_schedule).transpose()
    }

    /// 查询学期内全部排课结果（按方案名排序）
    pub fn find_by_semester(&self, semester: &str) -> RepositoryResult<Vec<Schedule>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM schedule WHERE semester = ?1 ORDER BY name",
            SCHEDULE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![semester], map_schedule_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(ScheduleRow::into_schedule).collect()
    }

    /// 查询 (semester, name) 对应的排课结果
    ///
    /// 唯一约束保证最多一条, 返回列表与 find_by_semester 保持一致
    pub fn find_by_semester_and_name(
        &self,
        semester: &str,
        name: &str,
    ) -> RepositoryResult<Vec<Schedule>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM schedule WHERE semester = ?1 AND name = ?2",
            SCHEDULE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![semester, name], map_schedule_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(ScheduleRow::into_schedule).collect()
    }

    /// 查询学期内已有的方案名（去重, 按名称排序）
    pub fn find_distinct_names_by_semester(&self, semester: &str) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT name FROM schedule WHERE semester = ?1 ORDER BY name",
        )?;
        let names = stmt
            .query_map(params![semester], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    /// 删除 (semester, name) 对应的排课结果, 返回删除条数
    pub fn delete_by_semester_and_name(&self, semester: &str, name: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM schedule WHERE semester = ?1 AND name = ?2",
            params![semester, name],
        )?;
        Ok(affected)
    }

    pub fn delete_by_id(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM schedule WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Schedule".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

// 数据库原始行, JSON 反序列化放在连接锁之外的 Result 链中完成
struct ScheduleRow {
    id: String,
    semester: String,
    name: String,
    assignments_json: String,
    statistics_json: String,
    objective_value: Option<i64>,
    penalties_json: Option<String>,
    scores_json: Option<String>,
}

impl ScheduleRow {
    fn into_schedule(self) -> RepositoryResult<Schedule> {
        let assignments: Vec<Assignment> = serde_json::from_str(&self.assignments_json)?;
        let statistics: ScheduleStatistics = serde_json::from_str(&self.statistics_json)?;
        let penalties = self
            .penalties_json
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;
        let scores = self
            .scores_json
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;

        Ok(Schedule {
            id: self.id,
            semester: self.semester,
            name: self.name,
            assignments,
            statistics,
            objective_value: self.objective_value,
            penalties,
            scores,
        })
    }
}

fn map_schedule_row(row: &rusqlite::Row) -> rusqlite::Result<ScheduleRow> {
    Ok(ScheduleRow {
        id: row.get(0)?,
        semester: row.get(1)?,
        name: row.get(2)?,
        assignments_json: row.get(3)?,
        statistics_json: row.get(4)?,
        objective_value: row.get(5)?,
        penalties_json: row.get(6)?,
        scores_json: row.get(7)?,
    })
}
