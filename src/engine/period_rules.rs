// ==========================================
// 高校排课系统 - 节次布局规则
// ==========================================
// 规则 (新增/修改节次时校验, 按顺序):
// 1. 名称唯一, 序号唯一
// 2. 开始时间早于结束时间
// 3. 与已有节次时间不重叠
// 4. 与已有节次的间隔不少于最小间隔
// 校验时忽略与候选节次同 id 的记录 (修改场景)
// ==========================================

use crate::domain::academic::Period;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeriodRuleViolation {
    #[error("节次开始时间 {start} 必须早于结束时间 {end}")]
    InvalidTimeRange { start: String, end: String },

    #[error("节次名称已存在: {name}")]
    DuplicateName { name: String },

    #[error("节次序号 {order_index} 已被节次 {existing} 使用")]
    DuplicateOrderIndex { order_index: i32, existing: String },

    #[error("节次时间 {start}-{end} 与节次 {existing} ({existing_start}-{existing_end}) 重叠")]
    Overlap {
        start: String,
        end: String,
        existing: String,
        existing_start: String,
        existing_end: String,
    },

    #[error("节次与 {existing} ({existing_start}-{existing_end}) 间隔仅 {gap_minutes} 分钟, 至少需要 {min_gap_minutes} 分钟")]
    GapTooShort {
        existing: String,
        existing_start: String,
        existing_end: String,
        gap_minutes: i64,
        min_gap_minutes: i64,
    },
}

fn hm(t: &chrono::NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// 校验候选节次与已有节次的布局
///
/// # 参数
/// - candidate: 待新增/修改的节次
/// - existing: 当前全部节次 (可包含候选节次自身的旧记录)
/// - min_gap_minutes: 最小间隔（分钟）
pub fn validate_period_layout(
    candidate: &Period,
    existing: &[Period],
    min_gap_minutes: i64,
) -> Result<(), PeriodRuleViolation> {
    let others: Vec<&Period> = existing.iter().filter(|p| p.id != candidate.id).collect();

    if others.iter().any(|p| p.name == candidate.name) {
        return Err(PeriodRuleViolation::DuplicateName {
            name: candidate.name.clone(),
        });
    }
    if let Some(other) = others.iter().find(|p| p.order_index == candidate.order_index) {
        return Err(PeriodRuleViolation::DuplicateOrderIndex {
            order_index: candidate.order_index,
            existing: other.name.clone(),
        });
    }

    if candidate.start_time >= candidate.end_time {
        return Err(PeriodRuleViolation::InvalidTimeRange {
            start: hm(&candidate.start_time),
            end: hm(&candidate.end_time),
        });
    }

    if let Some(other) = others
        .iter()
        .find(|p| p.start_time < candidate.end_time && p.end_time > candidate.start_time)
    {
        return Err(PeriodRuleViolation::Overlap {
            start: hm(&candidate.start_time),
            end: hm(&candidate.end_time),
            existing: other.name.clone(),
            existing_start: hm(&other.start_time),
            existing_end: hm(&other.end_time),
        });
    }

    for other in &others {
        // 不重叠时两者之一为非负间隔
        let gap_before = (candidate.start_time - other.end_time).num_minutes();
        let gap_after = (other.start_time - candidate.end_time).num_minutes();
        for gap in [gap_before, gap_after] {
            if (0..min_gap_minutes).contains(&gap) {
                return Err(PeriodRuleViolation::GapTooShort {
                    existing: other.name.clone(),
                    existing_start: hm(&other.start_time),
                    existing_end: hm(&other.end_time),
                    gap_minutes: gap,
                    min_gap_minutes,
                });
            }
        }
    }

    Ok(())
}
