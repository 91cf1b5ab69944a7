// ==========================================
// 高校排课系统 - 引擎层
// ==========================================
// 职责: 实现排课业务规则, 不拼 SQL
// 组成: 前置校验 / 请求组装 / 结果入库 / 评估 / 节次规则 / 生成编排
// ==========================================

pub mod assembler;
pub mod error;
pub mod evaluation;
pub mod ingestor;
pub mod orchestrator;
pub mod period_rules;
pub mod repositories;
pub mod validator;

// 重导出核心引擎
pub use assembler::{ExactLimits, RequestAssembler};
pub use error::{EngineError, EngineResult};
pub use evaluation::{EvaluationContext, EvaluationEngine};
pub use ingestor::ResultIngestor;
pub use orchestrator::ScheduleGenerationOrchestrator;
pub use period_rules::{validate_period_layout, PeriodRuleViolation};
pub use repositories::SchedulingRepositories;
pub use validator::PreconditionValidator;
