// ==========================================
// 高校排课系统 - 排课评估引擎
// ==========================================
// 职责: 对已存排课重新计算四项得分
// 红线: 只读; 结果只依赖已存数据, 与求解服务自报目标值无关
// ==========================================
// total = 课程偏好得分 + 时间偏好得分 - 负载均衡罚分 - 紧凑度罚分
// - 课程偏好: 每条排课计一次
// - 时间偏好 / 负载: 按教学班连续占用的每一节累计
// - 负载均衡: 仅当至少两名教师有课时, 罚 (最大节数 - 最小节数)
// - 紧凑度: 同一教师同一天, 统计 "本节有课且下一节无课" 的次数
// ==========================================

use crate::domain::academic::{Period, Section};
use crate::domain::schedule::{Schedule, ScheduleEvaluation};
use crate::domain::types::Weekday;
use crate::engine::repositories::SchedulingRepositories;
use crate::repository::RepositoryResult;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};

pub const W_COURSE_PREF: f64 = 1.0;
pub const W_TIME_PREF: f64 = 1.0;
pub const W_WORKLOAD_BALANCE: f64 = 5.0;
pub const W_COMPACTNESS: f64 = 3.0;

// ==========================================
// EvaluationContext - 评估所需的只读数据
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext {
    /// section_id -> 教学班
    pub sections: HashMap<String, Section>,
    /// 按 order_index 升序的全部节次
    pub periods: Vec<Period>,
    /// teacher_id -> course_id -> 偏好值
    pub course_prefs: HashMap<String, HashMap<String, i32>>,
    /// teacher_id -> (星期, period_id) -> 偏好值
    pub time_prefs: HashMap<String, HashMap<(Weekday, String), i32>>,
}

impl EvaluationContext {
    /// 计算一组排课的评估结果
    pub fn score(&self, schedules: &[Schedule]) -> ScheduleEvaluation {
        // order_index -> 在有序节次列表中的位置
        let position_by_order: HashMap<i32, usize> = self
            .periods
            .iter()
            .enumerate()
            .map(|(pos, p)| (p.order_index, pos))
            .collect();

        let mut course_score = 0.0;
        let mut time_score = 0.0;
        let mut workloads: HashMap<&str, f64> = HashMap::new();
        let mut occupied: BTreeMap<(&str, Weekday), Vec<bool>> = BTreeMap::new();

        for assignment in schedules.iter().flat_map(|s| s.assignments.iter()) {
            let Some(section) = self.sections.get(&assignment.section_id) else {
                debug!(section_id = %assignment.section_id, "教学班不存在, 跳过该排课");
                continue;
            };
            let (Some(day), Ok(start)) = (
                Weekday::parse(&assignment.day),
                assignment.period.trim().parse::<i32>(),
            ) else {
                warn!(
                    day = %assignment.day,
                    period = %assignment.period,
                    "排课星期或节次无法解析, 跳过该排课"
                );
                continue;
            };
            let teacher = assignment.teacher_id.as_str();

            // 课程偏好（每条排课一次）
            if let Some(value) = self
                .course_prefs
                .get(teacher)
                .and_then(|prefs| prefs.get(&section.course_id))
            {
                course_score += W_COURSE_PREF * f64::from(*value);
            }

            for offset in 0..section.duration() {
                let Some(&position) = start
                    .checked_add(offset)
                    .and_then(|order| position_by_order.get(&order))
                else {
                    continue;
                };
                let period = &self.periods[position];

                if let Some(value) = self
                    .time_prefs
                    .get(teacher)
                    .and_then(|prefs| prefs.get(&(day, period.id.clone())))
                {
                    time_score += W_TIME_PREF * f64::from(*value);
                }

                *workloads.entry(teacher).or_insert(0.0) += 1.0;

                occupied
                    .entry((teacher, day))
                    .or_insert_with(|| vec![false; self.periods.len()])[position] = true;
            }
        }

        let workload_penalty = if workloads.len() >= 2 {
            let max = workloads.values().copied().fold(f64::MIN, f64::max);
            let min = workloads.values().copied().fold(f64::MAX, f64::min);
            W_WORKLOAD_BALANCE * (max - min)
        } else {
            0.0
        };

        let gaps: usize = occupied
            .values()
            .map(|slots| slots.windows(2).filter(|w| w[0] && !w[1]).count())
            .sum();
        let compactness_penalty = W_COMPACTNESS * gaps as f64;

        ScheduleEvaluation {
            total_score: course_score + time_score - workload_penalty - compactness_penalty,
            workload_penalty,
            compactness_penalty,
            course_preference_score: course_score,
            time_preference_score: time_score,
        }
    }
}

// ==========================================
// EvaluationEngine - 评估引擎
// ==========================================
pub struct EvaluationEngine {
    repos: SchedulingRepositories,
}

impl EvaluationEngine {
    pub fn new(repos: SchedulingRepositories) -> Self {
        Self { repos }
    }

    /// 评估学期内的排课
    ///
    /// # 参数
    /// - semester: 学期
    /// - name: 方案名; None 或空白时评估学期内全部排课
    pub fn evaluate(&self, semester: &str, name: Option<&str>) -> RepositoryResult<ScheduleEvaluation> {
        let schedules = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => self
                .repos
                .schedule_repo
                .find_by_semester_and_name(semester, name)?,
            None => self.repos.schedule_repo.find_by_semester(semester)?,
        };

        if schedules.iter().all(|s| s.assignments.is_empty()) {
            info!(semester = %semester, name = ?name, "无排课可评估");
            return Ok(ScheduleEvaluation::default());
        }

        let context = self.load_context(semester, &schedules)?;
        let evaluation = context.score(&schedules);

        info!(
            semester = %semester,
            name = ?name,
            schedules = schedules.len(),
            total_score = evaluation.total_score,
            workload_penalty = evaluation.workload_penalty,
            compactness_penalty = evaluation.compactness_penalty,
            "排课评估完成"
        );
        Ok(evaluation)
    }

    fn load_context(
        &self,
        semester: &str,
        schedules: &[Schedule],
    ) -> RepositoryResult<EvaluationContext> {
        let mut sections = HashMap::new();
        for section_id in schedules
            .iter()
            .flat_map(|s| s.assignments.iter().map(|a| &a.section_id))
        {
            if sections.contains_key(section_id) {
                continue;
            }
            if let Some(section) = self.repos.section_repo.find_by_id(section_id)? {
                sections.insert(section_id.clone(), section);
            }
        }

        let mut course_prefs: HashMap<String, HashMap<String, i32>> = HashMap::new();
        for pref in self.repos.course_pref_repo.find_by_semester(semester)? {
            if let Some(course_id) = pref.course_id {
                course_prefs
                    .entry(pref.teacher_id)
                    .or_default()
                    .insert(course_id, pref.preference_value.unwrap_or(0));
            }
        }

        let mut time_prefs: HashMap<String, HashMap<(Weekday, String), i32>> = HashMap::new();
        for pref in self.repos.time_pref_repo.find_by_semester(semester)? {
            time_prefs
                .entry(pref.teacher_id)
                .or_default()
                .insert((pref.day, pref.period_id), pref.preference_value.unwrap_or(0));
        }

        Ok(EvaluationContext {
            sections,
            periods: self.repos.period_repo.find_all_ordered()?,
            course_prefs,
            time_prefs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schedule::{Assignment, ScheduleStatistics};
    use chrono::NaiveTime;

    fn periods(count: i32) -> Vec<Period> {
        (1..=count)
            .map(|i| Period {
                id: format!("P{}", i),
                name: format!("第{}节", i),
                start_time: NaiveTime::from_hms_opt(7 + i as u32, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(7 + i as u32, 30, 0).unwrap(),
                order_index: i,
                description: None,
            })
            .collect()
    }

    fn section(id: &str, duration: Option<i32>) -> (String, Section) {
        (
            id.to_string(),
            Section {
                id: id.to_string(),
                name: None,
                course_id: "C1".to_string(),
                period_required: duration,
                required_seats: None,
            },
        )
    }

    fn assignment(teacher: &str, section: &str, day: &str, period: i32) -> Assignment {
        Assignment {
            teacher_id: teacher.to_string(),
            section_id: section.to_string(),
            classroom_id: "R1".to_string(),
            day: day.to_string(),
            period: period.to_string(),
            course_id: Some("C1".to_string()),
        }
    }

    fn schedule(assignments: Vec<Assignment>) -> Schedule {
        Schedule {
            id: "A_S1".to_string(),
            semester: "S1".to_string(),
            name: "A".to_string(),
            assignments,
            statistics: ScheduleStatistics::default(),
            objective_value: None,
            penalties: None,
            scores: None,
        }
    }

    #[test]
    fn test_empty_set_scores_zero() {
        let context = EvaluationContext {
            periods: periods(4),
            ..Default::default()
        };
        assert_eq!(context.score(&[]), ScheduleEvaluation::default());
        assert_eq!(context.score(&[schedule(vec![])]), ScheduleEvaluation::default());
    }

    #[test]
    fn test_workload_imbalance_penalized() {
        // T1 三节, T2 一节 -> 5 * (3 - 1) = 10
        let context = EvaluationContext {
            sections: [section("S3", Some(3)), section("S1", Some(1))].into_iter().collect(),
            periods: periods(4),
            ..Default::default()
        };
        let eval = context.score(&[schedule(vec![
            assignment("T1", "S3", "Mon", 1),
            assignment("T2", "S1", "Tue", 1),
        ])]);
        assert_eq!(eval.workload_penalty, 10.0);
    }

    #[test]
    fn test_single_teacher_has_no_workload_penalty() {
        let context = EvaluationContext {
            sections: [section("S3", Some(3))].into_iter().collect(),
            periods: periods(4),
            ..Default::default()
        };
        let eval = context.score(&[schedule(vec![assignment("T1", "S3", "Mon", 1)])]);
        assert_eq!(eval.workload_penalty, 0.0);
    }

    #[test]
    fn test_compactness_counts_class_to_free_transitions() {
        // 节次 1..4, 占用 {1, 3}: (1,2) 与 (3,4) 两处 -> 3 * 2 = 6
        let context = EvaluationContext {
            sections: [section("S1", None)].into_iter().collect(),
            periods: periods(4),
            ..Default::default()
        };
        let eval = context.score(&[schedule(vec![
            assignment("T1", "S1", "Mon", 1),
            assignment("T1", "S1", "Mon", 3),
        ])]);
        assert_eq!(eval.compactness_penalty, 6.0);

        // 占用 {2}: 仅 (2,3) 一处 -> 3
        let eval = context.score(&[schedule(vec![assignment("T1", "S1", "Mon", 2)])]);
        assert_eq!(eval.compactness_penalty, 3.0);

        // 占用最后一节不计罚
        let eval = context.score(&[schedule(vec![assignment("T1", "S1", "Mon", 4)])]);
        assert_eq!(eval.compactness_penalty, 0.0);
    }

    #[test]
    fn test_compactness_scenario_positions_0_1_3() {
        // 占用位置 [0,1,3] (节次 1,2,4): 仅 (1,2) 一处 -> 3
        let context = EvaluationContext {
            sections: [section("S2", Some(2)), section("S1", None)].into_iter().collect(),
            periods: periods(4),
            ..Default::default()
        };
        let eval = context.score(&[schedule(vec![
            assignment("T1", "S2", "Mon", 1),
            assignment("T1", "S1", "Mon", 4),
        ])]);
        assert_eq!(eval.compactness_penalty, 3.0);
    }

    #[test]
    fn test_period_near_integer_limit_is_skipped_without_overflow() {
        let context = EvaluationContext {
            sections: [section("S2", Some(2))].into_iter().collect(),
            periods: periods(4),
            ..Default::default()
        };
        let eval = context.score(&[schedule(vec![assignment("T1", "S2", "Mon", i32::MAX)])]);
        assert_eq!(eval, ScheduleEvaluation::default());
    }

    #[test]
    fn test_preferences_summed_per_covered_period() {
        let mut course_prefs = HashMap::new();
        course_prefs.insert(
            "T1".to_string(),
            [("C1".to_string(), 4)].into_iter().collect::<HashMap<_, _>>(),
        );
        let mut time_prefs = HashMap::new();
        time_prefs.insert(
            "T1".to_string(),
            [
                ((Weekday::Monday, "P1".to_string()), 2),
                ((Weekday::Monday, "P2".to_string()), 5),
                ((Weekday::Tuesday, "P1".to_string()), 100),
            ]
            .into_iter()
            .collect::<HashMap<_, _>>(),
        );
        let context = EvaluationContext {
            sections: [section("S2", Some(2))].into_iter().collect(),
            periods: periods(4),
            course_prefs,
            time_prefs,
        };

        let eval = context.score(&[schedule(vec![assignment("T1", "S2", "Mon", 1)])]);
        assert_eq!(eval.course_preference_score, 4.0);
        assert_eq!(eval.time_preference_score, 7.0);
        // 占用 {1,2}: (2,3) 一处
        assert_eq!(eval.compactness_penalty, 3.0);
        assert_eq!(eval.total_score, 4.0 + 7.0 - 3.0);
    }

    #[test]
    fn test_unresolvable_section_skipped_entirely() {
        let context = EvaluationContext {
            sections: [section("S1", None)].into_iter().collect(),
            periods: periods(4),
            ..Default::default()
        };
        let eval = context.score(&[schedule(vec![
            assignment("T1", "S1", "Mon", 4),
            assignment("T2", "ghost", "Mon", 1),
        ])]);
        // T2 的排课被整体跳过, 只有一名教师有负载
        assert_eq!(eval.workload_penalty, 0.0);
        assert_eq!(eval.compactness_penalty, 0.0);
    }
}
