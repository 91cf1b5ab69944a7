// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成、Mock 求解网关
// ==========================================

#![allow(dead_code)]

use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveTime;
use rusqlite::Connection;
use tempfile::NamedTempFile;
use university_schedule::app::AppState;
use university_schedule::db::{init_schema, open_sqlite_connection};
use university_schedule::domain::{
    Classroom, Course, CoursePreference, Period, Section, Teacher, TeachingRegistration,
    TimePreference,
};
use university_schedule::engine::SchedulingRepositories;
use university_schedule::solver::{SolverError, SolverGateway, SolverRequest, SolverResponse};
use university_schedule::{RegistrationStatus, Weekday};

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库连接（统一 PRAGMA）
pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    Ok(open_sqlite_connection(db_path)?)
}

/// 基于临时数据库与 Mock 网关创建 AppState
pub fn create_test_state(
    gateway: Arc<MockSolverGateway>,
) -> Result<(NamedTempFile, AppState), Box<dyn Error>> {
    let (temp_file, db_path) = create_test_db()?;
    let state = AppState::with_gateway(db_path, gateway)?;
    Ok((temp_file, state))
}

// ==========================================
// 测试数据生成
// ==========================================

pub fn teacher(id: &str, semester: &str) -> Teacher {
    Teacher {
        id: id.to_string(),
        name: format!("教师{}", id),
        status: Some("在职".to_string()),
        semester: semester.to_string(),
    }
}

pub fn registration(teacher_id: &str, semester: &str, status: RegistrationStatus) -> TeachingRegistration {
    TeachingRegistration {
        id: format!("R-{}", teacher_id),
        teacher_id: teacher_id.to_string(),
        semester: semester.to_string(),
        status,
        max_courses: Some(2),
    }
}

pub fn course(id: &str, min_teachers: Option<i32>, max_teachers: Option<i32>) -> Course {
    Course {
        id: id.to_string(),
        name: format!("课程{}", id),
        min_teachers,
        max_teachers,
    }
}

pub fn section(id: &str, course_id: &str, period_required: i32, required_seats: i32) -> Section {
    Section {
        id: id.to_string(),
        name: Some(format!("{}班", id)),
        course_id: course_id.to_string(),
        period_required: Some(period_required),
        required_seats: Some(required_seats),
    }
}

pub fn classroom(id: &str, semester: &str, capacity: i32) -> Classroom {
    Classroom {
        id: id.to_string(),
        name: format!("教室{}", id),
        capacity: Some(capacity),
        status: Some("可用".to_string()),
        semester: semester.to_string(),
    }
}

pub fn period(id: &str, order_index: i32, start: (u32, u32), end: (u32, u32)) -> Period {
    Period {
        id: id.to_string(),
        name: format!("第{}节", order_index),
        start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
        order_index,
        description: None,
    }
}

pub fn course_preference(teacher_id: &str, semester: &str, course_id: &str, value: i32) -> CoursePreference {
    CoursePreference {
        id: format!("CP-{}-{}", teacher_id, course_id),
        semester: semester.to_string(),
        teacher_id: teacher_id.to_string(),
        registration_id: format!("R-{}", teacher_id),
        course_id: Some(course_id.to_string()),
        preference_value: Some(value),
    }
}

pub fn time_preference(
    teacher_id: &str,
    semester: &str,
    day: Weekday,
    period_id: &str,
    value: i32,
) -> TimePreference {
    TimePreference {
        id: format!("TP-{}-{}-{}", teacher_id, day.abbreviation(), period_id),
        teacher_id: teacher_id.to_string(),
        semester: semester.to_string(),
        registration_id: format!("R-{}", teacher_id),
        day,
        period_id: period_id.to_string(),
        preference_value: Some(value),
    }
}

/// 写入一套最小可排课数据
///
/// - 教师 T1/T2 均已审核通过, 都对课程 C1 有偏好
/// - 课程 C1 下有教学班 S1 (1 节) / S2 (2 节)
/// - 教室 A101 (容量 60)
/// - 节次 P1..P4 (order_index 1..4)
/// - T1 偏好周一第 1 节 (3 分), T2 偏好周二第 2 节 (1 分)
pub fn seed_basic_semester(repos: &SchedulingRepositories, semester: &str) -> Result<(), Box<dyn Error>> {
    for id in ["T1", "T2"] {
        repos.teacher_repo.upsert(&teacher(id, semester))?;
        repos
            .registration_repo
            .upsert(&registration(id, semester, RegistrationStatus::Approved))?;
    }

    repos.course_repo.upsert(&course("C1", Some(1), Some(2)))?;
    repos.section_repo.upsert(&section("S1", "C1", 1, 40))?;
    repos.section_repo.upsert(&section("S2", "C1", 2, 30))?;

    repos.classroom_repo.upsert(&classroom("A101", semester, 60))?;

    repos.period_repo.insert(&period("P1", 1, (8, 0), (8, 45)))?;
    repos.period_repo.insert(&period("P2", 2, (9, 15), (10, 0)))?;
    repos.period_repo.insert(&period("P3", 3, (10, 30), (11, 15)))?;
    repos.period_repo.insert(&period("P4", 4, (14, 0), (14, 45)))?;

    repos.course_pref_repo.upsert(&course_preference("T1", semester, "C1", 5))?;
    repos.course_pref_repo.upsert(&course_preference("T2", semester, "C1", 2))?;

    repos
        .time_pref_repo
        .upsert(&time_preference("T1", semester, Weekday::Monday, "P1", 3))?;
    repos
        .time_pref_repo
        .upsert(&time_preference("T2", semester, Weekday::Tuesday, "P2", 1))?;

    Ok(())
}

// ==========================================
// Mock 求解网关
// ==========================================

/// Mock 求解网关
///
/// 返回预置响应（或预置错误）, 并记录调用次数与最近一次请求
pub struct MockSolverGateway {
    response: Mutex<Result<SolverResponse, String>>,
    calls: AtomicUsize,
    last_request: Mutex<Option<SolverRequest>>,
}

impl MockSolverGateway {
    /// 以 JSON 报文构造预置响应（与真实服务的报文格式一致）
    pub fn from_json(body: serde_json::Value) -> Self {
        let response: SolverResponse =
            serde_json::from_value(body).expect("mock response must be a valid SolverResponse");
        Self::with_result(Ok(response))
    }

    /// 模拟求解服务不可达
    pub fn unreachable(message: &str) -> Self {
        Self::with_result(Err(message.to_string()))
    }

    fn with_result(result: Result<SolverResponse, String>) -> Self {
        Self {
            response: Mutex::new(result),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// 替换预置响应
    pub fn set_json(&self, body: serde_json::Value) {
        let response: SolverResponse =
            serde_json::from_value(body).expect("mock response must be a valid SolverResponse");
        *self.response.lock().unwrap() = Ok(response);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<SolverRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl SolverGateway for MockSolverGateway {
    async fn submit(&self, request: &SolverRequest) -> Result<SolverResponse, SolverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        match &*self.response.lock().unwrap() {
            Ok(response) => Ok(response.clone()),
            Err(message) => Err(SolverError::Unreachable(message.clone())),
        }
    }
}

/// 求解成功的标准响应: S1 由 T1 周一第 1 节上课, S2 由 T2 周二第 2 节上课
pub fn success_response() -> serde_json::Value {
    serde_json::json!({
        "status": "success",
        "solution": {
            "objective_value": 42,
            "assignments": [
                {"teacher_id": "T1", "section_id": "S1", "classroom_id": "A101",
                 "day": "Mon", "period": 1, "course_id": "C1"},
                {"teacher_id": "T2", "section_id": "S2", "classroom_id": "A101",
                 "day": "Tue", "period": "2"}
            ],
            "penalties": {"workload": 0},
            "scores": {"preference": 8}
        }
    })
}
