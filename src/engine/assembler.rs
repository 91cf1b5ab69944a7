// ==========================================
// 高校排课系统 - 求解请求组装器
// ==========================================
// 职责: 将已审核注册、偏好、教学班、教室、节次组装为求解请求
// 红线: 默认值在构造时落入强类型结构, 不在序列化阶段补齐
// ==========================================
// 默认值:
// - max_courses = 1, 偏好值 = 0
// - min_teachers = 1, max_teachers = max(min_teachers, 10)
// - required_periods = 1, required_seats = 0, capacity = 0
// ==========================================

use crate::domain::academic::{Course, Section, TeachingRegistration};
use crate::domain::types::{RegistrationStatus, SolverAlgorithm, Weekday};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::repositories::SchedulingRepositories;
use crate::engine::validator::{qualifying_course_preferences, registration_teacher_index};
use crate::solver::payload::{
    ClassroomPayload, ClassroomsPayload, CoursePayload, SectionPayload, SolverRequest,
    TeacherPayload,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info, warn};

pub const DEFAULT_MAX_COURSES: i32 = 1;
pub const DEFAULT_PREFERENCE_VALUE: i32 = 0;
pub const DEFAULT_MIN_TEACHERS: i32 = 1;
pub const DEFAULT_MAX_TEACHERS: i32 = 10;
pub const DEFAULT_REQUIRED_PERIODS: i32 = 1;
pub const DEFAULT_REQUIRED_SEATS: i32 = 0;
pub const DEFAULT_CAPACITY: i32 = 0;

/// 精确求解规模上限
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExactLimits {
    pub max_teachers: usize,
    pub max_sections: usize,
}

impl Default for ExactLimits {
    fn default() -> Self {
        Self {
            max_teachers: crate::config::defaults::EXACT_MAX_TEACHERS,
            max_sections: crate::config::defaults::EXACT_MAX_SECTIONS,
        }
    }
}

pub struct RequestAssembler {
    repos: SchedulingRepositories,
    exact_limits: ExactLimits,
}

impl RequestAssembler {
    pub fn new(repos: SchedulingRepositories, exact_limits: ExactLimits) -> Self {
        Self { repos, exact_limits }
    }

    /// 组装求解请求
    ///
    /// # 参数
    /// - semester: 学期
    /// - algorithm: 求解算法, None 时请求中不带该字段
    ///
    /// # 返回
    /// - Ok(SolverRequest): 已填充默认值的请求
    /// - Err(ExactLimitExceeded): 精确模式下数据规模超限
    pub fn assemble(
        &self,
        semester: &str,
        algorithm: Option<SolverAlgorithm>,
    ) -> EngineResult<SolverRequest> {
        let registrations = self
            .repos
            .registration_repo
            .find_by_status_and_semester(RegistrationStatus::Approved, semester)?;
        let registration_ids: Vec<String> = registrations.iter().map(|r| r.id.clone()).collect();

        let course_prefs = qualifying_course_preferences(
            self.repos
                .course_pref_repo
                .find_by_registration_ids(&registration_ids)?,
        );
        let course_ids: Vec<String> = course_prefs
            .iter()
            .filter_map(|p| p.course_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let sections = self.repos.section_repo.find_by_course_ids(&course_ids)?;

        // 精确模式规模校验（在组装与提交之前）
        if algorithm == Some(SolverAlgorithm::Exact) {
            self.check_exact_limits(&registrations, sections.len())?;
        }

        // ===== teachers =====
        let periods = self.repos.period_repo.find_all_ordered()?;
        let period_order: HashMap<&str, String> = periods
            .iter()
            .map(|p| (p.id.as_str(), p.order_index.to_string()))
            .collect();
        let time_prefs = self
            .repos
            .time_pref_repo
            .find_by_registration_ids(&registration_ids)?;

        let mut teachers: BTreeMap<&str, TeacherPayload> = BTreeMap::new();
        for registration in &registrations {
            if teachers.contains_key(registration.teacher_id.as_str()) {
                continue;
            }
            let teacher = self
                .repos
                .teacher_repo
                .find_by_id(&registration.teacher_id)?
                .ok_or_else(|| {
                    EngineError::DataIntegrity(format!("教师不存在: {}", registration.teacher_id))
                })?;

            let mut course_preferences = BTreeMap::new();
            let mut eligible_courses = Vec::new();
            for pref in course_prefs.iter().filter(|p| p.registration_id == registration.id) {
                if let Some(course_id) = &pref.course_id {
                    course_preferences.insert(
                        course_id.clone(),
                        pref.preference_value.unwrap_or(DEFAULT_PREFERENCE_VALUE),
                    );
                    if !eligible_courses.contains(course_id) {
                        eligible_courses.push(course_id.clone());
                    }
                }
            }

            let mut day_time_preferences: BTreeMap<String, BTreeMap<String, i32>> = BTreeMap::new();
            for pref in time_prefs.iter().filter(|p| p.registration_id == registration.id) {
                let Some(order) = period_order.get(pref.period_id.as_str()) else {
                    warn!(
                        teacher_id = %registration.teacher_id,
                        period_id = %pref.period_id,
                        "时间偏好引用的节次不存在, 已忽略"
                    );
                    continue;
                };
                day_time_preferences
                    .entry(pref.day.abbreviation().to_string())
                    .or_default()
                    .insert(
                        order.clone(),
                        pref.preference_value.unwrap_or(DEFAULT_PREFERENCE_VALUE),
                    );
            }

            teachers.insert(
                registration.teacher_id.as_str(),
                TeacherPayload {
                    id: teacher.id,
                    name: teacher.name,
                    max_courses: registration.max_courses.unwrap_or(DEFAULT_MAX_COURSES),
                    course_preferences,
                    eligible_courses,
                    day_time_preferences,
                },
            );
        }

        // ===== courses =====
        let courses = self.repos.course_repo.find_by_ids(&course_ids)?;
        if courses.len() != course_ids.len() {
            let found: BTreeSet<&str> = courses.iter().map(|c| c.id.as_str()).collect();
            let missing: Vec<&str> = course_ids
                .iter()
                .map(String::as_str)
                .filter(|id| !found.contains(id))
                .collect();
            return Err(EngineError::DataIntegrity(format!(
                "课程不存在: {}",
                missing.join(", ")
            )));
        }
        let course_payloads: Vec<CoursePayload> = courses
            .iter()
            .map(|course| build_course_payload(course, &sections))
            .collect();

        // ===== classrooms =====
        let classrooms = self.repos.classroom_repo.find_by_semester(semester)?;
        let classrooms_payload = ClassroomsPayload {
            days: Weekday::TEACHING_WEEK
                .iter()
                .map(|d| d.abbreviation().to_string())
                .collect(),
            periods: periods.iter().map(|p| p.order_index.to_string()).collect(),
            classrooms: classrooms
                .iter()
                .map(|c| ClassroomPayload {
                    id: c.id.clone(),
                    capacity: c.capacity.unwrap_or(DEFAULT_CAPACITY),
                })
                .collect(),
        };

        let request = SolverRequest {
            teachers: teachers.into_values().collect(),
            courses: course_payloads,
            classrooms: classrooms_payload,
            algorithm,
        };

        info!(
            semester = %semester,
            teachers = request.teachers.len(),
            courses = request.courses.len(),
            sections = request.section_count(),
            classrooms = request.classrooms.classrooms.len(),
            periods = request.classrooms.periods.len(),
            "求解请求组装完成"
        );
        Ok(request)
    }

    fn check_exact_limits(
        &self,
        registrations: &[TeachingRegistration],
        section_count: usize,
    ) -> EngineResult<()> {
        let teacher_count = registration_teacher_index(registrations)
            .values()
            .collect::<BTreeSet<_>>()
            .len();
        debug!(
            teachers = teacher_count,
            sections = section_count,
            max_teachers = self.exact_limits.max_teachers,
            max_sections = self.exact_limits.max_sections,
            "精确模式规模校验"
        );
        if teacher_count > self.exact_limits.max_teachers
            || section_count > self.exact_limits.max_sections
        {
            return Err(EngineError::ExactLimitExceeded {
                teachers: teacher_count,
                sections: section_count,
                max_teachers: self.exact_limits.max_teachers,
                max_sections: self.exact_limits.max_sections,
            });
        }
        Ok(())
    }
}

/// 课程 max_teachers 缺省时取 max(min_teachers, 10), 保证 max >= min
pub fn resolve_teacher_bounds(course: &Course) -> (i32, i32) {
    let min_teachers = course.min_teachers.unwrap_or(DEFAULT_MIN_TEACHERS);
    let max_teachers = course
        .max_teachers
        .unwrap_or_else(|| min_teachers.max(DEFAULT_MAX_TEACHERS));
    (min_teachers, max_teachers)
}

fn build_course_payload(course: &Course, sections: &[Section]) -> CoursePayload {
    let (min_teachers, max_teachers) = resolve_teacher_bounds(course);
    CoursePayload {
        id: course.id.clone(),
        name: course.name.clone(),
        min_teachers,
        max_teachers,
        sections: sections
            .iter()
            .filter(|s| s.course_id == course.id)
            .map(|s| SectionPayload {
                id: s.id.clone(),
                required_periods: s.period_required.unwrap_or(DEFAULT_REQUIRED_PERIODS),
                required_seats: s.required_seats.unwrap_or(DEFAULT_REQUIRED_SEATS),
            })
            .collect(),
    }
}
