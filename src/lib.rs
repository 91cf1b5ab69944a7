// ==========================================
// 高校排课系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + 外部求解服务 (HTTP/JSON)
// 系统定位: 组装求解请求、入库求解结果、评估排课质量
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 求解服务层 - 报文与网关
pub mod solver;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{RegistrationStatus, SolverAlgorithm, Weekday};

// 领域实体
pub use domain::{
    Assignment, Classroom, Course, CoursePreference, Period, Schedule, ScheduleEvaluation,
    ScheduleGenerationResult, ScheduleStatistics, Section, Semester, Teacher,
    TeachingRegistration, TimePreference,
};

// 引擎
pub use engine::{
    EngineError, EvaluationEngine, PreconditionValidator, RequestAssembler, ResultIngestor,
    ScheduleGenerationOrchestrator, SchedulingRepositories,
};

// 求解服务
pub use solver::{HttpSolverGateway, SolverError, SolverGateway, SolverRequest, SolverResponse};

// API
pub use api::{ApiError, ApiResult, PeriodApi, ScheduleApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "高校排课系统";
