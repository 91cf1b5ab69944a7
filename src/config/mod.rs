// ==========================================
// 高校排课系统 - 配置层
// ==========================================
// 职责: 系统配置管理 (求解服务地址、精确求解上限、节次间隔)
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod scheduling_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, defaults, ConfigManager};
pub use scheduling_config_trait::SchedulingConfigReader;
