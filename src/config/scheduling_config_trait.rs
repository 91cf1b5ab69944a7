// ==========================================
// 高校排课系统 - 排课配置读取 Trait
// ==========================================
// 职责: 定义排课流程所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

// ==========================================
// SchedulingConfigReader Trait
// ==========================================
// 用途: 求解网关、请求组装、节次校验所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait SchedulingConfigReader: Send + Sync {
    // ===== 求解服务 =====

    /// 获取求解服务基础地址
    ///
    /// # 默认值
    /// - http://localhost:8081
    async fn get_solver_service_url(&self) -> Result<String, Box<dyn Error + Send + Sync>>;

    /// 获取求解服务接口路径
    ///
    /// # 默认值
    /// - /schedule
    async fn get_solver_endpoint(&self) -> Result<String, Box<dyn Error + Send + Sync>>;

    /// 获取求解请求超时（秒）
    ///
    /// # 默认值
    /// - 300
    async fn get_solver_timeout_secs(&self) -> Result<u64, Box<dyn Error + Send + Sync>>;

    // ===== 精确求解规模上限 =====

    /// 精确模式允许的最大教师数
    ///
    /// # 默认值
    /// - 15
    async fn get_exact_max_teachers(&self) -> Result<usize, Box<dyn Error + Send + Sync>>;

    /// 精确模式允许的最大教学班数
    ///
    /// # 默认值
    /// - 30
    async fn get_exact_max_sections(&self) -> Result<usize, Box<dyn Error + Send + Sync>>;

    // ===== 节次 =====

    /// 相邻节次之间的最小间隔（分钟）
    ///
    /// # 默认值
    /// - 30
    async fn get_period_min_gap_minutes(&self) -> Result<i64, Box<dyn Error + Send + Sync>>;
}
