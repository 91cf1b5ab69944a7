// ==========================================
// 高校排课系统 - 排课生成编排器
// ==========================================
// 用途: 协调生成流程的执行顺序
// 流程: 前置校验 -> 请求组装 -> 求解服务 -> 结果入库
// 红线: 入库之前的任一步失败, 已存排课保持不变
// ==========================================

use crate::config::SchedulingConfigReader;
use crate::domain::schedule::ScheduleGenerationResult;
use crate::domain::types::SolverAlgorithm;
use crate::engine::assembler::{ExactLimits, RequestAssembler};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::ingestor::ResultIngestor;
use crate::engine::repositories::SchedulingRepositories;
use crate::engine::validator::PreconditionValidator;
use crate::solver::SolverGateway;
use std::sync::Arc;
use tracing::{debug, error, info};

// ==========================================
// ScheduleGenerationOrchestrator - 排课生成编排器
// ==========================================
pub struct ScheduleGenerationOrchestrator<C>
where
    C: SchedulingConfigReader,
{
    config: Arc<C>,
    repos: SchedulingRepositories,
    gateway: Arc<dyn SolverGateway>,
    validator: PreconditionValidator,
    ingestor: ResultIngestor,
}

impl<C> ScheduleGenerationOrchestrator<C>
where
    C: SchedulingConfigReader,
{
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - config: 配置读取器
    /// - repos: 仓储集合
    /// - gateway: 求解服务网关
    pub fn new(
        config: Arc<C>,
        repos: SchedulingRepositories,
        gateway: Arc<dyn SolverGateway>,
    ) -> Self {
        Self {
            validator: PreconditionValidator::new(repos.clone()),
            ingestor: ResultIngestor::new(repos.clone()),
            config,
            repos,
            gateway,
        }
    }

    /// 执行排课生成
    ///
    /// # 参数
    /// - semester: 学期
    /// - name: 方案名（同名方案被整体替换）
    /// - algorithm: 求解算法, None 时由求解服务决定
    ///
    /// # 返回
    /// 生成并保存的排课及求解服务自报目标值
    pub async fn generate(
        &self,
        semester: &str,
        name: &str,
        algorithm: Option<SolverAlgorithm>,
    ) -> EngineResult<ScheduleGenerationResult> {
        info!(semester = %semester, name = %name, algorithm = ?algorithm, "开始生成排课");

        if name.trim().is_empty() {
            return Err(EngineError::Configuration(
                "生成排课必须指定方案名, 以免误删已有排课".to_string(),
            ));
        }

        // ==========================================
        // 步骤1: 前置条件校验
        // ==========================================
        let defects = self.validator.validate(semester)?;
        if !defects.is_empty() {
            info!(semester = %semester, defects = defects.len(), "前置条件不满足, 终止生成");
            return Err(EngineError::ValidationDefects(defects));
        }

        // ==========================================
        // 步骤2: 组装求解请求
        // ==========================================
        debug!("步骤2: 组装求解请求");
        let exact_limits = self.read_exact_limits().await?;
        let assembler = RequestAssembler::new(self.repos.clone(), exact_limits);
        let request = assembler.assemble(semester, algorithm)?;

        // ==========================================
        // 步骤3: 调用求解服务
        // ==========================================
        debug!("步骤3: 调用求解服务");
        let response = self.gateway.submit(&request).await.map_err(|e| {
            error!(semester = %semester, name = %name, error = %e, "求解服务调用失败");
            EngineError::Upstream(e)
        })?;

        // ==========================================
        // 步骤4: 结果入库
        // ==========================================
        debug!("步骤4: 结果入库");
        let schedule = self.ingestor.ingest(&response, semester, name)?;
        let objective_value = schedule.objective_value;

        info!(
            schedule_id = %schedule.id,
            assignments = schedule.statistics.num_assignments,
            objective_value = ?objective_value,
            "排课生成完成"
        );

        Ok(ScheduleGenerationResult {
            schedules: vec![schedule],
            objective_value,
        })
    }

    async fn read_exact_limits(&self) -> EngineResult<ExactLimits> {
        let max_teachers = self
            .config
            .get_exact_max_teachers()
            .await
            .map_err(|e| EngineError::Configuration(e.to_string()))?;
        let max_sections = self
            .config
            .get_exact_max_sections()
            .await
            .map_err(|e| EngineError::Configuration(e.to_string()))?;
        Ok(ExactLimits {
            max_teachers,
            max_sections,
        })
    }
}
