// ==========================================
// 高校排课系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod academic;
pub mod schedule;
pub mod types;

// 重导出核心类型
pub use academic::{
    Classroom, Course, CoursePreference, Period, Section, Semester, Teacher, TeachingRegistration,
    TimePreference,
};
pub use schedule::{
    Assignment, Schedule, ScheduleEvaluation, ScheduleGenerationResult, ScheduleStatistics,
};
pub use types::{RegistrationStatus, SolverAlgorithm, Weekday};
