// ==========================================
// 高校排课系统 - 引擎层仓储聚合
// ==========================================
// 职责: 聚合排课引擎所需的所有 Repository
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::repository::{
    ClassroomRepository, CoursePreferenceRepository, CourseRepository, PeriodRepository,
    ScheduleRepository, SectionRepository, TeacherRepository, TeachingRegistrationRepository,
    TimePreferenceRepository,
};

/// 排课引擎仓储集合
///
/// 校验器、组装器、入库器、评估引擎共享同一组仓储
///
/// # 包含的仓储
/// - `registration_repo`: 教学注册
/// - `teacher_repo`: 教师
/// - `course_pref_repo` / `time_pref_repo`: 课程偏好 / 时间偏好
/// - `course_repo` / `section_repo`: 课程 / 教学班
/// - `classroom_repo`: 教室
/// - `period_repo`: 节次
/// - `schedule_repo`: 排课结果
#[derive(Clone)]
pub struct SchedulingRepositories {
    pub registration_repo: Arc<TeachingRegistrationRepository>,
    pub teacher_repo: Arc<TeacherRepository>,
    pub course_pref_repo: Arc<CoursePreferenceRepository>,
    pub time_pref_repo: Arc<TimePreferenceRepository>,
    pub course_repo: Arc<CourseRepository>,
    pub section_repo: Arc<SectionRepository>,
    pub classroom_repo: Arc<ClassroomRepository>,
    pub period_repo: Arc<PeriodRepository>,
    pub schedule_repo: Arc<ScheduleRepository>,
}

impl SchedulingRepositories {
    /// 基于同一数据库连接创建全部仓储
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            registration_repo: Arc::new(TeachingRegistrationRepository::new(conn.clone())),
            teacher_repo: Arc::new(TeacherRepository::new(conn.clone())),
            course_pref_repo: Arc::new(CoursePreferenceRepository::new(conn.clone())),
            time_pref_repo: Arc::new(TimePreferenceRepository::new(conn.clone())),
            course_repo: Arc::new(CourseRepository::new(conn.clone())),
            section_repo: Arc::new(SectionRepository::new(conn.clone())),
            classroom_repo: Arc::new(ClassroomRepository::new(conn.clone())),
            period_repo: Arc::new(PeriodRepository::new(conn.clone())),
            schedule_repo: Arc::new(ScheduleRepository::new(conn)),
        }
    }
}
