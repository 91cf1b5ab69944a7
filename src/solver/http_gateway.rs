// ==========================================
// 高校排课系统 - HTTP 求解网关
// ==========================================
// POST {service_url}{endpoint}, 请求/响应均为 JSON
// 超时由配置 solver.timeout_secs 决定, 不重试
// ==========================================

use crate::config::SchedulingConfigReader;
use crate::solver::gateway::{SolverError, SolverGateway};
use crate::solver::payload::{SolverRequest, SolverResponse};
use async_trait::async_trait;
use std::time::Duration;

pub struct HttpSolverGateway {
    url: String,
    http_client: reqwest::Client,
}

impl HttpSolverGateway {
    /// 创建 HTTP 求解网关
    ///
    /// # 参数
    /// - service_url: 求解服务基础地址
    /// - endpoint: 接口路径 (以 / 开头)
    /// - timeout: 整体请求超时
    pub fn new(service_url: &str, endpoint: &str, timeout: Duration) -> Result<Self, SolverError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SolverError::ClientInit(e.to_string()))?;

        Ok(Self {
            url: format!("{}{}", service_url.trim_end_matches('/'), endpoint),
            http_client,
        })
    }

    /// 按配置创建网关
    pub async fn from_config(config: &dyn SchedulingConfigReader) -> Result<Self, SolverError> {
        let service_url = config
            .get_solver_service_url()
            .await
            .map_err(|e| SolverError::ClientInit(e.to_string()))?;
        let endpoint = config
            .get_solver_endpoint()
            .await
            .map_err(|e| SolverError::ClientInit(e.to_string()))?;
        let timeout_secs = config
            .get_solver_timeout_secs()
            .await
            .map_err(|e| SolverError::ClientInit(e.to_string()))?;

        Self::new(&service_url, &endpoint, Duration::from_secs(timeout_secs))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SolverGateway for HttpSolverGateway {
    async fn submit(&self, request: &SolverRequest) -> Result<SolverResponse, SolverError> {
        tracing::info!(
            url = %self.url,
            teachers = request.teachers.len(),
            courses = request.courses.len(),
            sections = request.section_count(),
            algorithm = ?request.algorithm,
            "提交求解请求"
        );

        let response = self.http_client.post(&self.url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(url = %self.url, status = %status, "求解服务返回非成功HTTP状态");
            return Err(SolverError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: SolverResponse = serde_json::from_str(&body)
            .map_err(|e| SolverError::MalformedResponse(e.to_string()))?;

        tracing::info!(url = %self.url, status = ?parsed.status, "求解服务已响应");
        Ok(parsed)
    }
}
