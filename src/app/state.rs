// ==========================================
// 高校排课系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::api::{PeriodApi, ScheduleApi};
use crate::config::config_manager::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::engine::SchedulingRepositories;
use crate::solver::{HttpSolverGateway, SolverGateway};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "UNIVERSITY_SCHEDULE_DB";

/// 应用状态
///
/// 包含所有API实例和共享资源, 全部仓储共享同一数据库连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配置管理器
    pub config: Arc<ConfigManager>,

    /// 仓储集合（用于基础数据维护）
    pub repos: SchedulingRepositories,

    /// 排课管理API
    pub schedule_api: Arc<ScheduleApi<ConfigManager>>,

    /// 节次管理API
    pub period_api: Arc<PeriodApi<ConfigManager>>,
}

impl AppState {
    /// 创建新的AppState实例（使用 HTTP 求解网关）
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并初始化表结构
    /// 2. 按 config_kv 中的 solver.* 配置创建求解网关
    /// 3. 创建所有API实例
    pub async fn new(db_path: String) -> Result<Self, String> {
        let conn = open_database(&db_path)?;
        let config = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        let gateway = HttpSolverGateway::from_config(config.as_ref())
            .await
            .map_err(|e| format!("无法创建求解网关: {}", e))?;
        tracing::info!(url = %gateway.url(), "求解网关已就绪");

        Ok(Self::assemble(db_path, conn, config, Arc::new(gateway)))
    }

    /// 使用指定求解网关创建AppState（测试或替换求解实现时使用）
    pub fn with_gateway(db_path: String, gateway: Arc<dyn SolverGateway>) -> Result<Self, String> {
        let conn = open_database(&db_path)?;
        let config = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        Ok(Self::assemble(db_path, conn, config, gateway))
    }

    fn assemble(
        db_path: String,
        conn: Arc<Mutex<Connection>>,
        config: Arc<ConfigManager>,
        gateway: Arc<dyn SolverGateway>,
    ) -> Self {
        let repos = SchedulingRepositories::from_connection(conn);

        let schedule_api = Arc::new(ScheduleApi::new(config.clone(), repos.clone(), gateway));
        let period_api = Arc::new(PeriodApi::new(config.clone(), repos.period_repo.clone()));

        tracing::info!("AppState初始化完成");

        Self {
            db_path,
            config,
            repos,
            schedule_api,
            period_api,
        }
    }
}

fn open_database(db_path: &str) -> Result<Arc<Mutex<Connection>>, String> {
    tracing::info!("初始化AppState，数据库路径: {}", db_path);

    let conn = open_sqlite_connection(db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
    init_schema(&conn).map_err(|e| format!("数据库表结构初始化失败: {}", e))?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// 获取默认数据库路径
///
/// 优先使用环境变量 UNIVERSITY_SCHEDULE_DB, 否则放在用户数据目录下
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./university_schedule.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("university-schedule");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("university_schedule.db");
        }
    }

    path.to_string_lossy().to_string()
}
