// ==========================================
// 高校排课系统 - 排课前置条件校验器
// ==========================================
// 职责: 汇总阻断排课的数据缺陷（人类可读）
// 红线: 只读, 不修改任何数据
// ==========================================
// 校验顺序:
// 1. 存在已审核通过的教学注册 (否则立即返回)
// 2. 每位教师都有课程偏好
// 3. 每位教师都有时间偏好
// 4. 学期内存在教室
// 5. 已登记课程的每个教学班都有可授课教师
// ==========================================

use crate::domain::academic::{CoursePreference, TeachingRegistration};
use crate::domain::types::RegistrationStatus;
use crate::engine::repositories::SchedulingRepositories;
use crate::repository::RepositoryResult;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info};

pub struct PreconditionValidator {
    repos: SchedulingRepositories,
}

impl PreconditionValidator {
    pub fn new(repos: SchedulingRepositories) -> Self {
        Self { repos }
    }

    /// 校验学期是否具备排课条件
    ///
    /// # 返回
    /// 缺陷列表, 为空表示可以排课
    pub fn validate(&self, semester: &str) -> RepositoryResult<Vec<String>> {
        let mut defects = Vec::new();

        let registrations = self
            .repos
            .registration_repo
            .find_by_status_and_semester(RegistrationStatus::Approved, semester)?;
        if registrations.is_empty() {
            defects.push("本学期没有已审核通过的教学注册".to_string());
            info!(semester = %semester, "前置条件校验: 无已审核注册");
            return Ok(defects);
        }

        let reg_to_teacher = registration_teacher_index(&registrations);
        let teachers: BTreeSet<&str> = reg_to_teacher.values().copied().collect();
        let registration_ids: Vec<String> = registrations.iter().map(|r| r.id.clone()).collect();

        // 课程偏好
        let course_prefs = qualifying_course_preferences(
            self.repos
                .course_pref_repo
                .find_by_registration_ids(&registration_ids)?,
        );
        if course_prefs.is_empty() {
            defects.push("已审核通过的注册均未设置课程偏好".to_string());
        } else {
            let covered: BTreeSet<&str> = course_prefs
                .iter()
                .filter_map(|p| reg_to_teacher.get(p.registration_id.as_str()).copied())
                .collect();
            let missing: Vec<&str> = teachers.difference(&covered).copied().collect();
            if !missing.is_empty() {
                defects.push(format!("以下教师缺少课程偏好: {}", missing.join(", ")));
            }
        }

        // 时间偏好
        let time_prefs = self
            .repos
            .time_pref_repo
            .find_by_registration_ids(&registration_ids)?;
        if time_prefs.is_empty() {
            defects.push("已审核通过的注册均未设置时间偏好".to_string());
        } else {
            let covered: BTreeSet<&str> = time_prefs
                .iter()
                .filter_map(|p| reg_to_teacher.get(p.registration_id.as_str()).copied())
                .collect();
            let missing: Vec<&str> = teachers.difference(&covered).copied().collect();
            if !missing.is_empty() {
                defects.push(format!("以下教师缺少时间偏好: {}", missing.join(", ")));
            }
        }

        // 教室
        if self.repos.classroom_repo.count_by_semester(semester)? == 0 {
            defects.push("本学期没有教室".to_string());
        }

        // 教学班
        let course_to_teachers = course_teacher_index(&course_prefs, &reg_to_teacher);
        let course_ids: Vec<String> = course_to_teachers.keys().cloned().collect();
        let sections = self.repos.section_repo.find_by_course_ids(&course_ids)?;
        if sections.is_empty() {
            defects.push("已登记课程下没有任何教学班".to_string());
        } else {
            let uncovered: Vec<String> = sections
                .iter()
                .filter(|s| {
                    course_to_teachers
                        .get(&s.course_id)
                        .map_or(true, |t| t.is_empty())
                })
                .map(|s| s.label())
                .collect();
            if !uncovered.is_empty() {
                defects.push(format!("以下教学班没有可授课教师: {}", uncovered.join(", ")));
            }
        }

        debug!(semester = %semester, defects = defects.len(), "前置条件校验完成");
        Ok(defects)
    }
}

/// registration_id -> teacher_id
pub(crate) fn registration_teacher_index(
    registrations: &[TeachingRegistration],
) -> HashMap<&str, &str> {
    registrations
        .iter()
        .map(|r| (r.id.as_str(), r.teacher_id.as_str()))
        .collect()
}

/// 仅保留指向具体课程的偏好
pub(crate) fn qualifying_course_preferences(
    prefs: Vec<CoursePreference>,
) -> Vec<CoursePreference> {
    prefs.into_iter().filter(|p| p.course_id.is_some()).collect()
}

/// course_id -> 可授课教师集合
pub(crate) fn course_teacher_index<'a>(
    course_prefs: &'a [CoursePreference],
    reg_to_teacher: &HashMap<&'a str, &'a str>,
) -> BTreeMap<String, BTreeSet<&'a str>> {
    let mut index: BTreeMap<String, BTreeSet<&'a str>> = BTreeMap::new();
    for pref in course_prefs {
        let Some(course_id) = pref.course_id.as_ref() else {
            continue;
        };
        let entry = index.entry(course_id.clone()).or_default();
        if let Some(teacher) = reg_to_teacher.get(pref.registration_id.as_str()) {
            entry.insert(*teacher);
        }
    }
    index
}
