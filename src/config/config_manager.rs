// ==========================================
// 高校排课系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope, 当前仅使用 global)
// ==========================================

use crate::config::scheduling_config_trait::SchedulingConfigReader;
use crate::db::open_sqlite_connection;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            r#"INSERT INTO config_kv (scope_id, key, value, updated_at)
               VALUES ('global', ?1, ?2, datetime('now'))
               ON CONFLICT(scope_id, key) DO UPDATE SET
                   value = excluded.value,
                   updated_at = excluded.updated_at"#,
            params![key, value],
        )?;
        Ok(())
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self
            .get_global_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 读取数值型配置, 无法解析时回退默认值并告警
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> ConfigResult<T>
    where
        T: std::str::FromStr + std::fmt::Display + Copy,
    {
        let raw = match self.get_global_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };
        match raw.trim().parse::<T>() {
            Ok(v) => Ok(v),
            Err(_) => {
                tracing::warn!(
                    config_key = key,
                    raw_value = %raw,
                    default = %default,
                    "配置值格式错误，使用默认值"
                );
                Ok(default)
            }
        }
    }

    /// 获取所有 global 配置的快照（JSON格式, 按键排序）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn
            .prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }
}

// ==========================================
// SchedulingConfigReader Trait 实现
// ==========================================
#[async_trait]
impl SchedulingConfigReader for ConfigManager {
    async fn get_solver_service_url(&self) -> ConfigResult<String> {
        let value =
            self.get_config_or_default(config_keys::SOLVER_SERVICE_URL, defaults::SOLVER_SERVICE_URL)?;
        Ok(value.trim().trim_end_matches('/').to_string())
    }

    async fn get_solver_endpoint(&self) -> ConfigResult<String> {
        let value =
            self.get_config_or_default(config_keys::SOLVER_ENDPOINT, defaults::SOLVER_ENDPOINT)?;
        let value = value.trim();
        if value.starts_with('/') {
            Ok(value.to_string())
        } else {
            Ok(format!("/{}", value))
        }
    }

    async fn get_solver_timeout_secs(&self) -> ConfigResult<u64> {
        self.get_parsed_or_default(config_keys::SOLVER_TIMEOUT_SECS, defaults::SOLVER_TIMEOUT_SECS)
    }

    async fn get_exact_max_teachers(&self) -> ConfigResult<usize> {
        self.get_parsed_or_default(config_keys::EXACT_MAX_TEACHERS, defaults::EXACT_MAX_TEACHERS)
    }

    async fn get_exact_max_sections(&self) -> ConfigResult<usize> {
        self.get_parsed_or_default(config_keys::EXACT_MAX_SECTIONS, defaults::EXACT_MAX_SECTIONS)
    }

    async fn get_period_min_gap_minutes(&self) -> ConfigResult<i64> {
        self.get_parsed_or_default(
            config_keys::PERIOD_MIN_GAP_MINUTES,
            defaults::PERIOD_MIN_GAP_MINUTES,
        )
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 求解服务
    pub const SOLVER_SERVICE_URL: &str = "solver.service_url";
    pub const SOLVER_ENDPOINT: &str = "solver.endpoint";
    pub const SOLVER_TIMEOUT_SECS: &str = "solver.timeout_secs";

    // 精确求解规模上限
    pub const EXACT_MAX_TEACHERS: &str = "exact.max_teachers";
    pub const EXACT_MAX_SECTIONS: &str = "exact.max_sections";

    // 节次
    pub const PERIOD_MIN_GAP_MINUTES: &str = "period.min_gap_minutes";
}

// ==========================================
// 配置默认值
// ==========================================
pub mod defaults {
    pub const SOLVER_SERVICE_URL: &str = "http://localhost:8081";
    pub const SOLVER_ENDPOINT: &str = "/schedule";
    pub const SOLVER_TIMEOUT_SECS: u64 = 300;
    pub const EXACT_MAX_TEACHERS: usize = 15;
    pub const EXACT_MAX_SECTIONS: usize = 30;
    pub const PERIOD_MIN_GAP_MINUTES: i64 = 30;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn manager() -> ConfigManager {
        let conn = Arc::new(Mutex::new(open_in_memory().unwrap()));
        ConfigManager::from_connection(conn).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_when_unset() {
        let config = manager();
        assert_eq!(config.get_solver_service_url().await.unwrap(), "http://localhost:8081");
        assert_eq!(config.get_solver_endpoint().await.unwrap(), "/schedule");
        assert_eq!(config.get_solver_timeout_secs().await.unwrap(), 300);
        assert_eq!(config.get_exact_max_teachers().await.unwrap(), 15);
        assert_eq!(config.get_exact_max_sections().await.unwrap(), 30);
        assert_eq!(config.get_period_min_gap_minutes().await.unwrap(), 30);
    }

    #[tokio::test]
    async fn test_overrides_and_normalization() {
        let config = manager();
        config
            .set_global_config_value(config_keys::SOLVER_SERVICE_URL, "http://solver:9000/")
            .unwrap();
        config
            .set_global_config_value(config_keys::SOLVER_ENDPOINT, "solve")
            .unwrap();
        config
            .set_global_config_value(config_keys::EXACT_MAX_TEACHERS, "8")
            .unwrap();

        assert_eq!(config.get_solver_service_url().await.unwrap(), "http://solver:9000");
        assert_eq!(config.get_solver_endpoint().await.unwrap(), "/solve");
        assert_eq!(config.get_exact_max_teachers().await.unwrap(), 8);
    }

    #[tokio::test]
    async fn test_malformed_number_falls_back_to_default() {
        let config = manager();
        config
            .set_global_config_value(config_keys::SOLVER_TIMEOUT_SECS, "很久")
            .unwrap();
        assert_eq!(config.get_solver_timeout_secs().await.unwrap(), 300);
    }

    #[test]
    fn test_snapshot_is_sorted_json() {
        let config = manager();
        config.set_global_config_value("b", "2").unwrap();
        config.set_global_config_value("a", "1").unwrap();
        assert_eq!(config.get_config_snapshot().unwrap(), r#"{"a":"1","b":"2"}"#);
    }
}
