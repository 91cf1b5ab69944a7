// ==========================================
// 高校排课系统 - 引擎层错误类型
// ==========================================
// 分类: 前置条件缺陷 / 上游失败 / 数据完整性 / 配置错误
// 红线: 任何错误均不自动重试, 失败时不修改已存排课
// ==========================================

use crate::repository::error::RepositoryError;
use crate::solver::SolverError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// 前置条件缺陷（多条合并为一条消息）
    #[error("排课前置条件不满足: {}", .0.join("; "))]
    ValidationDefects(Vec<String>),

    /// 精确求解规模超限
    #[error(
        "数据规模超出精确求解上限: 教师{teachers}人(上限{max_teachers}), 教学班{sections}个(上限{max_sections}), 请改用启发式算法"
    )]
    ExactLimitExceeded {
        teachers: usize,
        sections: usize,
        max_teachers: usize,
        max_sections: usize,
    },

    #[error("求解服务失败: {0}")]
    Upstream(#[from] SolverError),

    #[error("数据完整性错误: {0}")]
    DataIntegrity(String),

    #[error("配置错误: {0}")]
    Configuration(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defects_joined_into_single_message() {
        let err = EngineError::ValidationDefects(vec!["缺少教室".to_string(), "缺少偏好".to_string()]);
        assert_eq!(err.to_string(), "排课前置条件不满足: 缺少教室; 缺少偏好");
    }

    #[test]
    fn test_exact_limit_reports_both_counts() {
        let err = EngineError::ExactLimitExceeded {
            teachers: 16,
            sections: 31,
            max_teachers: 15,
            max_sections: 30,
        };
        let msg = err.to_string();
        assert!(msg.contains("教师16人"));
        assert!(msg.contains("教学班31个"));
    }
}
