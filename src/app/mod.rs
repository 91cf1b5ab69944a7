// ==========================================
// 高校排课系统 - 应用层
// ==========================================
// 职责: 组装数据库、配置、求解网关与各 API 实例
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState, DB_PATH_ENV};
