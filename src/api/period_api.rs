// ==========================================
// 高校排课系统 - 节次管理 API
// ==========================================
// 职责: 节次的新增、修改、删除、查询
// 红线: 写入前必须通过 engine::period_rules 布局校验
// ==========================================

use std::sync::Arc;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::config::SchedulingConfigReader;
use crate::domain::academic::Period;
use crate::engine::period_rules::validate_period_layout;
use crate::repository::PeriodRepository;

/// 节次新增/修改请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodInput {
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub order_index: i32,
    pub description: Option<String>,
}

impl PeriodInput {
    fn into_period(self, id: String) -> Period {
        Period {
            id,
            name: self.name.trim().to_string(),
            start_time: self.start_time,
            end_time: self.end_time,
            order_index: self.order_index,
            description: self.description,
        }
    }
}

// ==========================================
// PeriodApi - 节次管理 API
// ==========================================
pub struct PeriodApi<C>
where
    C: SchedulingConfigReader,
{
    config: Arc<C>,
    period_repo: Arc<PeriodRepository>,
}

impl<C> PeriodApi<C>
where
    C: SchedulingConfigReader,
{
    pub fn new(config: Arc<C>, period_repo: Arc<PeriodRepository>) -> Self {
        Self {
            config,
            period_repo,
        }
    }

    /// 新增节次
    ///
    /// # 返回
    /// - Ok(Period): 已保存的节次（id 自动生成）
    /// - Err(ApiError::InvalidInput): 时间非法、重叠、间隔不足、名称或序号重复
    pub async fn create_period(&self, input: PeriodInput) -> ApiResult<Period> {
        if input.name.trim().is_empty() {
            return Err(ApiError::InvalidInput("节次名称不能为空".to_string()));
        }
        let period = input.into_period(Uuid::new_v4().to_string());
        self.check_layout(&period).await?;

        self.period_repo.insert(&period)?;
        tracing::info!(
            period_id = %period.id,
            name = %period.name,
            order_index = period.order_index,
            "已新增节次"
        );
        Ok(period)
    }

    /// 修改节次
    pub async fn update_period(&self, id: &str, input: PeriodInput) -> ApiResult<Period> {
        if input.name.trim().is_empty() {
            return Err(ApiError::InvalidInput("节次名称不能为空".to_string()));
        }
        if self.period_repo.find_by_id(id)?.is_none() {
            return Err(ApiError::NotFound(format!("节次(id={})不存在", id)));
        }
        let period = input.into_period(id.to_string());
        self.check_layout(&period).await?;

        self.period_repo.update(&period)?;
        tracing::info!(period_id = %period.id, name = %period.name, "已修改节次");
        Ok(period)
    }

    /// 删除节次
    pub fn delete_period(&self, id: &str) -> ApiResult<()> {
        self.period_repo.delete(id)?;
        tracing::info!(period_id = %id, "已删除节次");
        Ok(())
    }

    pub fn get_period(&self, id: &str) -> ApiResult<Period> {
        self.period_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("节次(id={})不存在", id)))
    }

    /// 查询全部节次（按序号升序）
    pub fn list_periods(&self) -> ApiResult<Vec<Period>> {
        Ok(self.period_repo.find_all_ordered()?)
    }

    async fn check_layout(&self, period: &Period) -> ApiResult<()> {
        let min_gap = self
            .config
            .get_period_min_gap_minutes()
            .await
            .map_err(|e| ApiError::ConfigurationError(e.to_string()))?;
        let existing = self.period_repo.find_all_ordered()?;
        validate_period_layout(period, &existing, min_gap)?;
        Ok(())
    }
}
