// ==========================================
// 高校排课系统 - 排课结果领域模型
// ==========================================
// 职责: 排课结果 (Schedule)、排课明细 (Assignment)、统计与评估结果
// 红线: Schedule 只能整体替换, 不做局部修改
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Assignment - 排课明细
// ==========================================
// day/period 保留求解服务返回的原始文本 (day="Mon", period=节次序号)
// course_id 无法解析时显式为 null
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    pub teacher_id: String,
    pub section_id: String,
    pub classroom_id: String,
    pub day: String,
    pub period: String,
    pub course_id: Option<String>,
}

// ==========================================
// ScheduleStatistics - 排课统计快照
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleStatistics {
    pub num_assignments: usize,
    pub num_classrooms: usize,
    pub num_courses: usize,
    pub num_sections: usize,
    pub num_teachers: usize,
}

// ==========================================
// Schedule - 排课结果
// ==========================================
// 主键: "<name>_<semester>", 唯一约束: (semester, name)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: String,
    pub semester: String,
    pub name: String,
    pub assignments: Vec<Assignment>,
    pub statistics: ScheduleStatistics,
    pub objective_value: Option<i64>,         // 求解服务自报目标值
    pub penalties: Option<serde_json::Value>, // 罚分明细 (自由格式)
    pub scores: Option<serde_json::Value>,    // 得分明细 (自由格式)
}

impl Schedule {
    /// 由方案名与学期生成主键
    pub fn make_id(name: &str, semester: &str) -> String {
        format!("{}_{}", name, semester)
    }
}

// ==========================================
// ScheduleEvaluation - 排课评估结果
// ==========================================
// total_score = course_preference_score + time_preference_score
//             - workload_penalty - compactness_penalty
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEvaluation {
    pub total_score: f64,
    pub workload_penalty: f64,
    pub compactness_penalty: f64,
    pub course_preference_score: f64,
    pub time_preference_score: f64,
}

// ==========================================
// ScheduleGenerationResult - 排课生成结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleGenerationResult {
    pub schedules: Vec<Schedule>,
    pub objective_value: Option<i64>,
}
