// ==========================================
// 高校排课系统 - 求解服务报文
// ==========================================
// 请求: 组装阶段已填充默认值的强类型结构, 序列化即为线上格式
// 响应: 不可信输入, 所有字段均为 Option, 由调用方逐项校验
// ==========================================

use crate::domain::types::SolverAlgorithm;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

// ==========================================
// 请求报文
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverRequest {
    pub teachers: Vec<TeacherPayload>,
    pub courses: Vec<CoursePayload>,
    pub classrooms: ClassroomsPayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<SolverAlgorithm>,
}

impl SolverRequest {
    /// 请求中的教学班总数
    pub fn section_count(&self) -> usize {
        self.courses.iter().map(|c| c.sections.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherPayload {
    pub id: String,
    pub name: String,
    pub max_courses: i32,
    /// course_id -> 偏好值
    pub course_preferences: BTreeMap<String, i32>,
    pub eligible_courses: Vec<String>,
    /// "Mon".."Sun" -> 节次序号字符串 -> 偏好值
    pub day_time_preferences: BTreeMap<String, BTreeMap<String, i32>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoursePayload {
    pub id: String,
    pub name: String,
    pub min_teachers: i32,
    pub max_teachers: i32,
    pub sections: Vec<SectionPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionPayload {
    pub id: String,
    pub required_periods: i32,
    pub required_seats: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassroomsPayload {
    pub days: Vec<String>,
    pub periods: Vec<String>,
    pub classrooms: Vec<ClassroomPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassroomPayload {
    pub id: String,
    pub capacity: i32,
}

// ==========================================
// 响应报文
// ==========================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolverResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub solution: Option<SolverSolution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolverSolution {
    #[serde(default, deserialize_with = "lenient_integer")]
    pub objective_value: Option<i64>,
    #[serde(default, deserialize_with = "lenient_records")]
    pub assignments: Option<Vec<RawAssignment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalties: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<serde_json::Value>,
}

/// 求解服务返回的单条排课记录（原样, 未校验）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAssignment {
    #[serde(default, deserialize_with = "lenient_text")]
    pub teacher_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub section_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub classroom_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub day: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub period: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub course_id: Option<String>,
}

// 字符串或数字均接受 (节次常以整数返回), null 视为缺失
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

// 整数、浮点 (截断) 或数字字符串均接受, 其余视为缺失
fn lenient_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok().map(|f| f as i64),
        _ => None,
    })
}

// 非对象记录保留为空记录, 由入库阶段按缺字段跳过
fn lenient_records<'de, D>(deserializer: D) -> Result<Option<Vec<RawAssignment>>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?;
    Ok(values.map(|values| {
        values
            .into_iter()
            .map(|value| match value {
                serde_json::Value::Object(_) => {
                    serde_json::from_value(value).unwrap_or_default()
                }
                _ => RawAssignment::default(),
            })
            .collect()
    }))
}
