// ==========================================
// 排课生成全流程集成测试
// ==========================================
// 覆盖: 前置校验 -> 请求组装 -> 求解网关 -> 结果入库 -> 查询/删除
// 求解服务由 MockSolverGateway 替代
// ==========================================

mod test_helpers;

use std::sync::Arc;

use test_helpers::{create_test_state, seed_basic_semester, success_response, MockSolverGateway};
use university_schedule::config::config_keys;
use university_schedule::{logging, ApiError, RegistrationStatus, SolverAlgorithm};

const SEMESTER: &str = "2024-2025-1";

#[tokio::test]
async fn test_generate_schedule_full_flow() {
    logging::init_test();
    println!("\n=== 测试：排课生成全流程 ===");

    let gateway = Arc::new(MockSolverGateway::from_json(success_response()));
    let (_temp_file, state) = create_test_state(gateway.clone()).unwrap();
    seed_basic_semester(&state.repos, SEMESTER).unwrap();

    println!("步骤1: 调用 generate_schedule");
    let result = state
        .schedule_api
        .generate_schedule(SEMESTER, "方案A", Some("heuristic"))
        .await
        .expect("排课生成应成功");

    assert_eq!(gateway.call_count(), 1);
    assert_eq!(result.objective_value, Some(42));
    assert_eq!(result.schedules.len(), 1);

    println!("步骤2: 校验提交给求解服务的请求");
    let request = gateway.last_request().unwrap();
    assert_eq!(request.algorithm, Some(SolverAlgorithm::Heuristic));
    assert_eq!(request.teachers.len(), 2);
    assert_eq!(request.courses.len(), 1);
    assert_eq!(request.courses[0].sections.len(), 2);
    assert_eq!(request.classrooms.days, vec!["Mon", "Tue", "Wed", "Thu", "Fri"]);
    assert_eq!(request.classrooms.periods, vec!["1", "2", "3", "4"]);
    assert_eq!(
        request.teachers[0].day_time_preferences["Mon"]["1"], 3,
        "T1 周一第1节偏好应按 order_index 组织"
    );

    println!("步骤3: 校验入库结果");
    let schedule = &result.schedules[0];
    assert_eq!(schedule.id, "方案A_2024-2025-1");
    assert_eq!(schedule.assignments.len(), 2);
    assert_eq!(schedule.assignments[1].period, "2");
    assert_eq!(
        schedule.assignments[1].course_id.as_deref(),
        Some("C1"),
        "缺省 course_id 应从教学班继承"
    );
    assert_eq!(schedule.statistics.num_assignments, 2);
    assert_eq!(schedule.statistics.num_teachers, 2);
    assert_eq!(schedule.statistics.num_sections, 2);
    assert_eq!(schedule.statistics.num_classrooms, 1);
    assert_eq!(schedule.statistics.num_courses, 1);
    assert_eq!(schedule.scores, Some(serde_json::json!({"preference": 8})));

    let stored = state.schedule_api.get_schedule(&schedule.id).unwrap();
    assert_eq!(&stored, schedule);

    println!("✓ 排课生成全流程通过");
}

#[tokio::test]
async fn test_regenerate_same_name_replaces_previous_result() {
    logging::init_test();
    println!("\n=== 测试：同名方案重复生成为整体替换 ===");

    let gateway = Arc::new(MockSolverGateway::from_json(success_response()));
    let (_temp_file, state) = create_test_state(gateway.clone()).unwrap();
    seed_basic_semester(&state.repos, SEMESTER).unwrap();

    state
        .schedule_api
        .generate_schedule(SEMESTER, "方案A", None)
        .await
        .unwrap();

    println!("步骤1: 第二次求解只返回一条排课");
    gateway.set_json(serde_json::json!({
        "status": "success",
        "solution": {
            "objective_value": 7,
            "assignments": [
                {"teacher_id": "T1", "section_id": "S1", "classroom_id": "A101",
                 "day": "Wed", "period": 3}
            ]
        }
    }));
    state
        .schedule_api
        .generate_schedule(SEMESTER, "方案A", None)
        .await
        .unwrap();

    let schedules = state
        .schedule_api
        .list_schedules_by_name(SEMESTER, "方案A")
        .unwrap();
    assert_eq!(schedules.len(), 1, "同名方案只保留最新一次结果");
    assert_eq!(schedules[0].assignments.len(), 1);
    assert_eq!(schedules[0].objective_value, Some(7));
    assert!(gateway.last_request().unwrap().algorithm.is_none());

    println!("步骤2: 另一方案名不受影响");
    state
        .schedule_api
        .generate_schedule(SEMESTER, "方案B", Some("exact"))
        .await
        .unwrap();
    assert_eq!(
        state.schedule_api.list_schedule_set_names(SEMESTER).unwrap(),
        vec!["方案A".to_string(), "方案B".to_string()]
    );

    println!("✓ 同名替换通过");
}

#[tokio::test]
async fn test_same_response_twice_stores_identical_schedule() {
    logging::init_test();
    println!("\n=== 测试：相同响应重复生成结果一致 ===");

    let gateway = Arc::new(MockSolverGateway::from_json(success_response()));
    let (_temp_file, state) = create_test_state(gateway.clone()).unwrap();
    seed_basic_semester(&state.repos, SEMESTER).unwrap();

    state
        .schedule_api
        .generate_schedule(SEMESTER, "方案A", None)
        .await
        .unwrap();
    let first = state
        .schedule_api
        .list_schedules_by_name(SEMESTER, "方案A")
        .unwrap();

    state
        .schedule_api
        .generate_schedule(SEMESTER, "方案A", None)
        .await
        .unwrap();
    let second = state
        .schedule_api
        .list_schedules_by_name(SEMESTER, "方案A")
        .unwrap();

    assert_eq!(gateway.call_count(), 2);
    assert_eq!(first.len(), 1);
    assert_eq!(first, second, "两次入库的排课内容应完全一致");

    println!("✓ 幂等重复生成通过");
}

#[tokio::test]
async fn test_non_object_record_and_float_objective_are_tolerated() {
    logging::init_test();
    println!("\n=== 测试：非对象排课记录被跳过, 浮点目标值被截断 ===");

    let gateway = Arc::new(MockSolverGateway::from_json(serde_json::json!({
        "status": "success",
        "solution": {
            "objective_value": 12.0,
            "assignments": [
                {"teacher_id": "T1", "section_id": "S1", "classroom_id": "A101",
                 "day": "Mon", "period": 1},
                null
            ]
        }
    })));
    let (_temp_file, state) = create_test_state(gateway).unwrap();
    seed_basic_semester(&state.repos, SEMESTER).unwrap();

    let result = state
        .schedule_api
        .generate_schedule(SEMESTER, "方案A", None)
        .await
        .unwrap();

    assert_eq!(result.objective_value, Some(12));
    assert_eq!(result.schedules[0].assignments.len(), 1);
    assert_eq!(result.schedules[0].statistics.num_assignments, 1);

    println!("✓ 宽松解析通过");
}

#[tokio::test]
async fn test_no_approved_registration_reports_single_defect() {
    logging::init_test();
    println!("\n=== 测试：无已审核注册时只报告一条缺陷且不调用求解服务 ===");

    let gateway = Arc::new(MockSolverGateway::from_json(success_response()));
    let (_temp_file, state) = create_test_state(gateway.clone()).unwrap();
    seed_basic_semester(&state.repos, SEMESTER).unwrap();
    for id in ["R-T1", "R-T2"] {
        state
            .repos
            .registration_repo
            .update_status(id, RegistrationStatus::Pending)
            .unwrap();
    }

    let err = state
        .schedule_api
        .generate_schedule(SEMESTER, "方案A", None)
        .await
        .unwrap_err();

    match err {
        ApiError::PreconditionFailed(defects) => {
            assert_eq!(defects, vec!["本学期没有已审核通过的教学注册".to_string()]);
        }
        other => panic!("期望 PreconditionFailed, 实际: {:?}", other),
    }
    assert_eq!(gateway.call_count(), 0);
    assert!(state.schedule_api.list_schedules(SEMESTER).unwrap().is_empty());

    println!("✓ 前置条件拦截通过");
}

#[tokio::test]
async fn test_missing_classroom_and_preferences_are_all_reported() {
    logging::init_test();
    println!("\n=== 测试：多项前置条件缺陷一次性返回 ===");

    let gateway = Arc::new(MockSolverGateway::from_json(success_response()));
    let (_temp_file, state) = create_test_state(gateway.clone()).unwrap();
    seed_basic_semester(&state.repos, "other-semester").unwrap();

    // 本学期只有一个已审核但无任何偏好的教师
    let repos = &state.repos;
    repos
        .teacher_repo
        .upsert(&test_helpers::teacher("T9", SEMESTER))
        .unwrap();
    repos
        .registration_repo
        .upsert(&test_helpers::registration("T9", SEMESTER, RegistrationStatus::Approved))
        .unwrap();

    let err = state
        .schedule_api
        .generate_schedule(SEMESTER, "方案A", None)
        .await
        .unwrap_err();

    let ApiError::PreconditionFailed(defects) = err else {
        panic!("期望 PreconditionFailed");
    };
    assert!(defects.contains(&"已审核通过的注册均未设置课程偏好".to_string()));
    assert!(defects.contains(&"已审核通过的注册均未设置时间偏好".to_string()));
    assert!(defects.contains(&"本学期没有教室".to_string()));
    assert_eq!(gateway.call_count(), 0);

    println!("✓ 多项缺陷汇总通过");
}

#[tokio::test]
async fn test_exact_mode_over_limit_is_rejected_before_solver() {
    logging::init_test();
    println!("\n=== 测试：精确模式超出规模上限 ===");

    let gateway = Arc::new(MockSolverGateway::from_json(success_response()));
    let (_temp_file, state) = create_test_state(gateway.clone()).unwrap();
    seed_basic_semester(&state.repos, SEMESTER).unwrap();
    state
        .config
        .set_global_config_value(config_keys::EXACT_MAX_SECTIONS, "1")
        .unwrap();

    let err = state
        .schedule_api
        .generate_schedule(SEMESTER, "方案A", Some("exact"))
        .await
        .unwrap_err();

    match err {
        ApiError::BusinessRuleViolation(msg) => {
            assert!(msg.contains("教学班2个"), "错误信息应包含实际规模: {}", msg);
        }
        other => panic!("期望 BusinessRuleViolation, 实际: {:?}", other),
    }
    assert_eq!(gateway.call_count(), 0);

    println!("步骤2: 启发式模式不受规模上限约束");
    state
        .schedule_api
        .generate_schedule(SEMESTER, "方案A", Some("heuristic"))
        .await
        .unwrap();
    assert_eq!(gateway.call_count(), 1);

    println!("✓ 规模上限校验通过");
}

#[tokio::test]
async fn test_solver_error_status_leaves_existing_schedule_untouched() {
    logging::init_test();
    println!("\n=== 测试：求解失败时不修改已有排课 ===");

    let gateway = Arc::new(MockSolverGateway::from_json(success_response()));
    let (_temp_file, state) = create_test_state(gateway.clone()).unwrap();
    seed_basic_semester(&state.repos, SEMESTER).unwrap();

    let first = state
        .schedule_api
        .generate_schedule(SEMESTER, "方案A", None)
        .await
        .unwrap();

    gateway.set_json(serde_json::json!({
        "status": "error",
        "message": "infeasible"
    }));
    let err = state
        .schedule_api
        .generate_schedule(SEMESTER, "方案A", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::UpstreamError(ref msg) if msg.contains("infeasible")));

    println!("步骤2: 缺少 assignments 同样视为失败");
    gateway.set_json(serde_json::json!({"status": "success", "solution": {}}));
    let err = state
        .schedule_api
        .generate_schedule(SEMESTER, "方案A", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::UpstreamError(_)));

    let stored = state
        .schedule_api
        .list_schedules_by_name(SEMESTER, "方案A")
        .unwrap();
    assert_eq!(stored, first.schedules);

    println!("✓ 求解失败不落库通过");
}

#[tokio::test]
async fn test_unreachable_solver_maps_to_upstream_error() {
    logging::init_test();

    let gateway = Arc::new(MockSolverGateway::unreachable("connection refused"));
    let (_temp_file, state) = create_test_state(gateway.clone()).unwrap();
    seed_basic_semester(&state.repos, SEMESTER).unwrap();

    let err = state
        .schedule_api
        .generate_schedule(SEMESTER, "方案A", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::UpstreamError(ref msg) if msg.contains("connection refused")));
    assert!(state.schedule_api.list_schedules(SEMESTER).unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_arguments_rejected_without_solver_call() {
    logging::init_test();
    println!("\n=== 测试：非法参数 ===");

    let gateway = Arc::new(MockSolverGateway::from_json(success_response()));
    let (_temp_file, state) = create_test_state(gateway.clone()).unwrap();
    seed_basic_semester(&state.repos, SEMESTER).unwrap();

    let err = state
        .schedule_api
        .generate_schedule(SEMESTER, "   ", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ConfigurationError(_)));

    let err = state
        .schedule_api
        .generate_schedule(SEMESTER, "方案A", Some("greedy"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let err = state
        .schedule_api
        .generate_schedule("", "方案A", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    assert_eq!(gateway.call_count(), 0);
    println!("✓ 非法参数拦截通过");
}

#[tokio::test]
async fn test_delete_schedule_set_and_single_schedule() {
    logging::init_test();
    println!("\n=== 测试：删除排课方案 ===");

    let gateway = Arc::new(MockSolverGateway::from_json(success_response()));
    let (_temp_file, state) = create_test_state(gateway).unwrap();
    seed_basic_semester(&state.repos, SEMESTER).unwrap();

    for name in ["方案A", "方案B"] {
        state
            .schedule_api
            .generate_schedule(SEMESTER, name, None)
            .await
            .unwrap();
    }

    let removed = state
        .schedule_api
        .delete_schedule_set(SEMESTER, "方案A")
        .unwrap();
    assert_eq!(removed, 1);
    assert_eq!(
        state.schedule_api.list_schedule_set_names(SEMESTER).unwrap(),
        vec!["方案B".to_string()]
    );

    state
        .schedule_api
        .delete_schedule("方案B_2024-2025-1")
        .unwrap();
    assert!(state.schedule_api.list_schedules(SEMESTER).unwrap().is_empty());

    let err = state.schedule_api.delete_schedule("方案B_2024-2025-1").unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    println!("✓ 删除排课通过");
}
