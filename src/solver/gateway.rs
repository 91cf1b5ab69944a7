// ==========================================
// 高校排课系统 - 求解服务网关
// ==========================================
// 职责: 与外部求解服务的唯一交互边界 (一次请求, 一次响应)
// 红线: 网关不持有状态, 不做自动重试
// ==========================================

use crate::solver::payload::{RawAssignment, SolverRequest, SolverResponse};
use async_trait::async_trait;
use thiserror::Error;

/// 求解服务成功状态字
pub const STATUS_SUCCESS: &str = "success";

// ==========================================
// SolverError - 求解服务错误
// ==========================================
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("求解服务不可达: {0}")]
    Unreachable(String),

    #[error("求解服务超时: {0}")]
    Timeout(String),

    #[error("求解服务返回HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("求解服务响应格式错误: {0}")]
    MalformedResponse(String),

    #[error("求解服务返回错误状态: {0}")]
    Rejected(String),

    #[error("求解服务响应缺少 solution.assignments")]
    MissingAssignments,

    #[error("求解客户端初始化失败: {0}")]
    ClientInit(String),
}

impl From<reqwest::Error> for SolverError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SolverError::Timeout(err.to_string())
        } else if err.is_decode() {
            SolverError::MalformedResponse(err.to_string())
        } else {
            SolverError::Unreachable(err.to_string())
        }
    }
}

// ==========================================
// SolverGateway Trait
// ==========================================
// 实现者: HttpSolverGateway（生产）, 测试中的 Mock 网关
#[async_trait]
pub trait SolverGateway: Send + Sync {
    /// 提交求解请求并等待响应
    ///
    /// 返回值未经校验, 调用方须使用 validate_response 检查
    async fn submit(&self, request: &SolverRequest) -> Result<SolverResponse, SolverError>;
}

/// 校验求解响应
///
/// status 必须为 "success" 且 solution.assignments 存在, 否则视为上游失败
///
/// # 返回
/// 未经逐条校验的排课记录
pub fn validate_response(response: &SolverResponse) -> Result<&[RawAssignment], SolverError> {
    match response.status.as_deref() {
        Some(STATUS_SUCCESS) => {}
        other => {
            let detail = match (other, response.message.as_deref()) {
                (Some(status), Some(msg)) => format!("status={}, message={}", status, msg),
                (Some(status), None) => format!("status={}", status),
                (None, Some(msg)) => format!("status缺失, message={}", msg),
                (None, None) => "status缺失".to_string(),
            };
            return Err(SolverError::Rejected(detail));
        }
    }

    response
        .solution
        .as_ref()
        .and_then(|s| s.assignments.as_deref())
        .ok_or(SolverError::MissingAssignments)
}
