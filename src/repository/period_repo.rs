// ==========================================
// 高校排课系统 - 节次数据仓储
// ==========================================
// 红线: 重叠/间隔校验不在仓储层, 见 engine::period_rules
// 数据库层仅保证 name、order_index 唯一
// ==========================================

use crate::domain::academic::Period;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

const PERIOD_COLUMNS: &str = "id, name, start_time, end_time, order_index, description";

// ==========================================
// PeriodRepository - 节次仓储
// ==========================================
pub struct PeriodRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PeriodRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增节次
    pub fn insert(&self, period: &Period) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"INSERT INTO period (id, name, start_time, end_time, order_index, description)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
            params![
                &period.id,
                &period.name,
                &period.start_time,
                &period.end_time,
                &period.order_index,
                &period.description,
            ],
        )?;
        Ok(())
    }

    /// 更新节次
    pub fn update(&self, period: &Period) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"UPDATE period
               SET name = ?2, start_time = ?3, end_time = ?4, order_index = ?5, description = ?6
               WHERE id = ?1"#,
            params![
                &period.id,
                &period.name,
                &period.start_time,
                &period.end_time,
                &period.order_index,
                &period.description,
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Period".to_string(),
                id: period.id.clone(),
            });
        }
        Ok(())
    }

    /// 删除节次（关联时间偏好级联删除）
    pub fn delete(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM period WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Period".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Period>> {
        self.find_one("id = ?1", id)
    }

    pub fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Period>> {
        self.find_one("name = ?1", name)
    }

    pub fn find_by_order_index(&self, order_index: i32) -> RepositoryResult<Option<Period>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM period WHERE order_index = ?1", PERIOD_COLUMNS);
        let period = conn
            .query_row(&sql, params![order_index], map_period)
            .optional()?;
        Ok(period)
    }

    /// 查询全部节次（按 order_index 升序）
    pub fn find_all_ordered(&self) -> RepositoryResult<Vec<Period>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM period ORDER BY order_index ASC", PERIOD_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let periods = stmt
            .query_map([], map_period)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(periods)
    }

    fn find_one(&self, predicate: &str, value: &str) -> RepositoryResult<Option<Period>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM period WHERE {}", PERIOD_COLUMNS, predicate);
        let period = conn.query_row(&sql, params![value], map_period).optional()?;
        Ok(period)
    }
}

fn map_period(row: &rusqlite::Row) -> rusqlite::Result<Period> {
    Ok(Period {
        id: row.get(0)?,
        name: row.get(1)?,
        start_time: row.get(2)?,
        end_time: row.get(3)?,
        order_index: row.get(4)?,
        description: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use chrono::NaiveTime;

    fn period(id: &str, order_index: i32, start_hour: u32) -> Period {
        Period {
            id: id.to_string(),
            name: format!("第{}节", order_index),
            start_time: NaiveTime::from_hms_opt(start_hour, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(start_hour, 45, 0).unwrap(),
            order_index,
            description: None,
        }
    }

    #[test]
    fn test_periods_listed_in_order_index() {
        let repo = PeriodRepository::new(Arc::new(Mutex::new(open_in_memory().unwrap())));
        repo.insert(&period("P3", 3, 10)).unwrap();
        repo.insert(&period("P1", 1, 8)).unwrap();
        repo.insert(&period("P2", 2, 9)).unwrap();

        let orders: Vec<i32> = repo
            .find_all_ordered()
            .unwrap()
            .iter()
            .map(|p| p.order_index)
            .collect();
        assert_eq!(orders, vec![1, 2, 3]);
        assert_eq!(repo.find_by_order_index(2).unwrap().unwrap().id, "P2");
        assert_eq!(
            repo.find_by_id("P1").unwrap().unwrap().start_time,
            NaiveTime::from_hms_opt(8, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_duplicate_order_index_rejected_by_database() {
        let repo = PeriodRepository::new(Arc::new(Mutex::new(open_in_memory().unwrap())));
        repo.insert(&period("P1", 1, 8)).unwrap();
        let mut dup = period("P2", 1, 10);
        dup.name = "另一节".to_string();
        let err = repo.insert(&dup).unwrap_err();
        assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
    }

    #[test]
    fn test_update_missing_period_is_not_found() {
        let repo = PeriodRepository::new(Arc::new(Mutex::new(open_in_memory().unwrap())));
        let err = repo.update(&period("ghost", 1, 8)).unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }
}
