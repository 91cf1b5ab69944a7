// ==========================================
// 高校排课系统 - 求解结果入库器
// ==========================================
// 职责: 校验求解响应, 构建排课明细与统计, 整体替换 (semester, name) 对应的排课
// 红线: 方案名缺失或响应无效时不做任何修改
// 红线: 删除旧记录与写入新记录在同一事务中完成
// ==========================================

use crate::domain::schedule::{Assignment, Schedule, ScheduleStatistics};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::repositories::SchedulingRepositories;
use crate::solver::gateway::validate_response;
use crate::solver::payload::{RawAssignment, SolverResponse};
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

pub struct ResultIngestor {
    repos: SchedulingRepositories,
}

impl ResultIngestor {
    pub fn new(repos: SchedulingRepositories) -> Self {
        Self { repos }
    }

    /// 入库求解结果
    ///
    /// # 参数
    /// - response: 求解服务原始响应
    /// - semester: 学期
    /// - name: 方案名（必填, 同名方案被整体替换）
    ///
    /// # 返回
    /// 已保存的排课结果
    pub fn ingest(
        &self,
        response: &SolverResponse,
        semester: &str,
        name: &str,
    ) -> EngineResult<Schedule> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::Configuration(
                "生成排课必须指定方案名, 以免误删已有排课".to_string(),
            ));
        }

        let raw_assignments = validate_response(response)?;
        let solution = response.solution.as_ref();

        let mut section_courses: HashMap<String, Option<String>> = HashMap::new();
        let mut assignments = Vec::with_capacity(raw_assignments.len());
        for raw in raw_assignments {
            match self.build_assignment(raw, &mut section_courses) {
                Some(assignment) => assignments.push(assignment),
                None => warn!(record = ?raw, "排课记录缺少必填字段, 已跳过"),
            }
        }

        let statistics = compute_statistics(&assignments);
        let schedule = Schedule {
            id: Schedule::make_id(name, semester),
            semester: semester.to_string(),
            name: name.to_string(),
            assignments,
            statistics,
            objective_value: solution.and_then(|s| s.objective_value),
            penalties: solution.and_then(|s| s.penalties.clone()),
            scores: solution.and_then(|s| s.scores.clone()),
        };

        let replaced = self.repos.schedule_repo.replace(&schedule)?;

        info!(
            schedule_id = %schedule.id,
            semester = %semester,
            name = %name,
            received = raw_assignments.len(),
            stored = schedule.statistics.num_assignments,
            replaced,
            "排课结果已入库"
        );
        Ok(schedule)
    }

    // 必填字段缺失时返回 None
    fn build_assignment(
        &self,
        raw: &RawAssignment,
        section_courses: &mut HashMap<String, Option<String>>,
    ) -> Option<Assignment> {
        let (Some(teacher_id), Some(section_id), Some(classroom_id), Some(day), Some(period)) = (
            non_blank(&raw.teacher_id),
            non_blank(&raw.section_id),
            non_blank(&raw.classroom_id),
            non_blank(&raw.day),
            non_blank(&raw.period),
        ) else {
            return None;
        };

        let course_id = match non_blank(&raw.course_id) {
            Some(course_id) => Some(course_id.to_string()),
            None => self.course_of_section(section_id, section_courses),
        };

        Some(Assignment {
            teacher_id: teacher_id.to_string(),
            section_id: section_id.to_string(),
            classroom_id: classroom_id.to_string(),
            day: day.to_string(),
            period: period.to_string(),
            course_id,
        })
    }

    // 尽力从教学班推断课程, 找不到或查询失败时为 None, 不中断入库
    fn course_of_section(
        &self,
        section_id: &str,
        cache: &mut HashMap<String, Option<String>>,
    ) -> Option<String> {
        if let Some(cached) = cache.get(section_id) {
            return cached.clone();
        }
        let course_id = match self.repos.section_repo.find_by_id(section_id) {
            Ok(section) => section.map(|s| s.course_id),
            Err(e) => {
                warn!(section_id = %section_id, error = %e, "查询教学班失败, 课程置空");
                None
            }
        };
        if course_id.is_none() {
            warn!(section_id = %section_id, "无法从教学班推断课程");
        }
        cache.insert(section_id.to_string(), course_id.clone());
        course_id
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// 统计排课明细: 条数及教师/教室/课程/教学班去重数量 (课程不计空值)
pub fn compute_statistics(assignments: &[Assignment]) -> ScheduleStatistics {
    let mut teachers = HashSet::new();
    let mut classrooms = HashSet::new();
    let mut courses = HashSet::new();
    let mut sections = HashSet::new();
    for a in assignments {
        teachers.insert(a.teacher_id.as_str());
        classrooms.insert(a.classroom_id.as_str());
        sections.insert(a.section_id.as_str());
        if let Some(course_id) = &a.course_id {
            courses.insert(course_id.as_str());
        }
    }
    ScheduleStatistics {
        num_assignments: assignments.len(),
        num_classrooms: classrooms.len(),
        num_courses: courses.len(),
        num_sections: sections.len(),
        num_teachers: teachers.len(),
    }
}
