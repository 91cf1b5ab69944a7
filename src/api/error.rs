// ==========================================
// 高校排课系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，将Repository/Engine错误转换为用户友好的错误消息
// ==========================================

use crate::engine::error::EngineError;
use crate::engine::period_rules::PeriodRuleViolation;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
/// 所有错误信息必须包含显式原因
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    /// 排课前置条件不满足（多条缺陷合并）
    #[error("无法生成排课: {}", .0.join("; "))]
    PreconditionFailed(Vec<String>),

    #[error("配置错误: {0}")]
    ConfigurationError(String),

    // ==========================================
    // 外部服务错误
    // ==========================================
    #[error("求解服务错误: {0}")]
    UpstreamError(String),

    #[error("数据完整性错误: {0}")]
    DataIntegrityError(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),
}

// ==========================================
// 从 RepositoryError 转换
// 目的: 将Repository层的技术错误转换为用户友好的业务错误
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }
            RepositoryError::SerializationError(msg) => {
                ApiError::DataIntegrityError(format!("存储数据无法解析: {}", msg))
            }
        }
    }
}

// ==========================================
// 从 EngineError 转换
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::ValidationDefects(defects) => ApiError::PreconditionFailed(defects),
            e @ EngineError::ExactLimitExceeded { .. } => {
                ApiError::BusinessRuleViolation(e.to_string())
            }
            EngineError::Upstream(e) => ApiError::UpstreamError(e.to_string()),
            EngineError::DataIntegrity(msg) => ApiError::DataIntegrityError(msg),
            EngineError::Configuration(msg) => ApiError::ConfigurationError(msg),
            EngineError::Repository(e) => e.into(),
        }
    }
}

impl From<PeriodRuleViolation> for ApiError {
    fn from(err: PeriodRuleViolation) -> Self {
        ApiError::InvalidInput(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
