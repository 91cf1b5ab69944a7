// ==========================================
// 高校排课系统 - 排课管理 API
// ==========================================
// 职责: 排课生成、查询、删除、评估
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::config::SchedulingConfigReader;
use crate::domain::schedule::{Schedule, ScheduleEvaluation, ScheduleGenerationResult};
use crate::domain::types::SolverAlgorithm;
use crate::engine::{EvaluationEngine, ScheduleGenerationOrchestrator, SchedulingRepositories};
use crate::repository::ScheduleRepository;
use crate::solver::SolverGateway;

// ==========================================
// ScheduleApi - 排课管理 API
// ==========================================

/// 排课管理API
///
/// 职责：
/// 1. 排课生成（校验 -> 组装 -> 求解 -> 入库）
/// 2. 排课查询（按ID、按学期、按学期+方案名、方案名列表）
/// 3. 排课删除（按方案、按ID）
/// 4. 排课评估
pub struct ScheduleApi<C>
where
    C: SchedulingConfigReader,
{
    orchestrator: ScheduleGenerationOrchestrator<C>,
    evaluation: EvaluationEngine,
    schedule_repo: Arc<ScheduleRepository>,
}

impl<C> ScheduleApi<C>
where
    C: SchedulingConfigReader,
{
    /// 创建新的ScheduleApi实例
    pub fn new(
        config: Arc<C>,
        repos: SchedulingRepositories,
        gateway: Arc<dyn SolverGateway>,
    ) -> Self {
        Self {
            schedule_repo: repos.schedule_repo.clone(),
            evaluation: EvaluationEngine::new(repos.clone()),
            orchestrator: ScheduleGenerationOrchestrator::new(config, repos, gateway),
        }
    }

    /// 生成排课
    ///
    /// # 参数
    /// - semester: 学期
    /// - name: 方案名（必填, 同名方案被整体替换）
    /// - algorithm: "heuristic" / "exact", 为空时由求解服务决定
    ///
    /// # 返回
    /// - Ok(ScheduleGenerationResult): 保存后的排课与目标值
    /// - Err(ApiError): 前置条件不满足、求解失败、配置错误等
    pub async fn generate_schedule(
        &self,
        semester: &str,
        name: &str,
        algorithm: Option<&str>,
    ) -> ApiResult<ScheduleGenerationResult> {
        if semester.trim().is_empty() {
            return Err(ApiError::InvalidInput("学期不能为空".to_string()));
        }
        let algorithm = parse_algorithm(algorithm)?;

        let result = self
            .orchestrator
            .generate(semester.trim(), name, algorithm)
            .await?;
        Ok(result)
    }

    /// 按ID查询排课
    pub fn get_schedule(&self, id: &str) -> ApiResult<Schedule> {
        self.schedule_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("排课(id={})不存在", id)))
    }

    /// 查询学期内全部排课
    pub fn list_schedules(&self, semester: &str) -> ApiResult<Vec<Schedule>> {
        Ok(self.schedule_repo.find_by_semester(semester)?)
    }

    /// 查询学期内指定方案的排课
    pub fn list_schedules_by_name(&self, semester: &str, name: &str) -> ApiResult<Vec<Schedule>> {
        Ok(self.schedule_repo.find_by_semester_and_name(semester, name)?)
    }

    /// 查询学期内已有方案名（按名称排序）
    pub fn list_schedule_set_names(&self, semester: &str) -> ApiResult<Vec<String>> {
        Ok(self.schedule_repo.find_distinct_names_by_semester(semester)?)
    }

    /// 删除学期内指定方案
    ///
    /// # 返回
    /// 删除的记录数
    pub fn delete_schedule_set(&self, semester: &str, name: &str) -> ApiResult<usize> {
        if name.trim().is_empty() {
            return Err(ApiError::InvalidInput("方案名不能为空".to_string()));
        }
        let removed = self
            .schedule_repo
            .delete_by_semester_and_name(semester, name.trim())?;
        tracing::info!(semester = %semester, name = %name, removed, "已删除排课方案");
        Ok(removed)
    }

    /// 按ID删除排课
    pub fn delete_schedule(&self, id: &str) -> ApiResult<()> {
        self.schedule_repo.delete_by_id(id)?;
        tracing::info!(schedule_id = %id, "已删除排课");
        Ok(())
    }

    /// 评估排课
    ///
    /// # 参数
    /// - semester: 学期
    /// - name: 方案名, 为空时评估学期内全部排课
    pub fn evaluate_schedule(
        &self,
        semester: &str,
        name: Option<&str>,
    ) -> ApiResult<ScheduleEvaluation> {
        Ok(self.evaluation.evaluate(semester, name)?)
    }
}

/// 解析算法名; 空白视为未指定, 未知名称为无效输入
pub fn parse_algorithm(algorithm: Option<&str>) -> ApiResult<Option<SolverAlgorithm>> {
    match algorithm.map(str::trim).filter(|a| !a.is_empty()) {
        None => Ok(None),
        Some(raw) => SolverAlgorithm::parse(raw).map(Some).ok_or_else(|| {
            ApiError::InvalidInput(format!("未知的求解算法: {} (可选 heuristic / exact)", raw))
        }),
    }
}
