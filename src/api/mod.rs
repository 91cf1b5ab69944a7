// ==========================================
// 高校排课系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口, 供命令行及上层应用调用
// ==========================================

pub mod error;
pub mod period_api;
pub mod schedule_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use period_api::{PeriodApi, PeriodInput};
pub use schedule_api::{parse_algorithm, ScheduleApi};
