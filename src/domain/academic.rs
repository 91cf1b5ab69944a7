// ==========================================
// 高校排课系统 - 教学基础数据领域模型
// ==========================================
// 职责: 教师/课程/教学班/教室/节次/学期/注册/偏好实体
// 红线: 不含数据访问逻辑
// ==========================================

use crate::domain::types::{RegistrationStatus, Weekday};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

// ==========================================
// Teacher - 教师
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: String,             // 教师ID
    pub name: String,           // 姓名
    pub status: Option<String>, // 在职状态
    pub semester: String,       // 所属学期
}

// ==========================================
// Semester - 学期
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Semester {
    pub id: String,
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

// ==========================================
// Course - 课程
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub min_teachers: Option<i32>, // 最少授课教师数
    pub max_teachers: Option<i32>, // 最多授课教师数
}

// ==========================================
// Section - 教学班
// ==========================================
// 每个教学班只属于一门课程
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub name: Option<String>,
    pub course_id: String,
    pub period_required: Option<i32>, // 连续占用节数
    pub required_seats: Option<i32>,  // 需要座位数
}

impl Section {
    /// 连续占用节数（未设置时为 1）
    pub fn duration(&self) -> i32 {
        self.period_required.unwrap_or(1)
    }

    /// 展示标签: "<id> (<name>)"
    pub fn label(&self) -> String {
        format!("{} ({})", self.id, self.name.as_deref().unwrap_or(""))
    }
}

// ==========================================
// Classroom - 教室
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classroom {
    pub id: String,
    pub name: String,
    pub capacity: Option<i32>,
    pub status: Option<String>,
    pub semester: String,
}

// ==========================================
// Period - 节次
// ==========================================
// 约束: name 唯一, order_index 唯一, 时间段互不重叠且间隔不少于最小间隔
// 约束校验见 engine::period_rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub id: String,
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub order_index: i32,
    pub description: Option<String>,
}

// ==========================================
// TeachingRegistration - 教学注册
// ==========================================
// 唯一约束: (teacher_id, semester)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeachingRegistration {
    pub id: String,
    pub teacher_id: String,
    pub semester: String,
    pub status: RegistrationStatus,
    pub max_courses: Option<i32>, // 最大授课门数
}

impl TeachingRegistration {
    pub fn is_approved(&self) -> bool {
        self.status == RegistrationStatus::Approved
    }
}

// ==========================================
// CoursePreference - 课程偏好
// ==========================================
// 唯一约束: (teacher_id, course_id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoursePreference {
    pub id: String,
    pub semester: String,
    pub teacher_id: String,
    pub registration_id: String,
    pub course_id: Option<String>,
    pub preference_value: Option<i32>,
}

// ==========================================
// TimePreference - 时间偏好
// ==========================================
// 唯一约束: (teacher_id, semester, day, period_id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePreference {
    pub id: String,
    pub teacher_id: String,
    pub semester: String,
    pub registration_id: String,
    pub day: Weekday,
    pub period_id: String,
    pub preference_value: Option<i32>,
}
