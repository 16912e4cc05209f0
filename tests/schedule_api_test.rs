// ==========================================
// 排产接口测试
// ==========================================
// 职责: 验证载荷校验、缺省值、错误分类与接口全链路
// ==========================================


use chrono::NaiveDate;
use test_helpers::*;
use workorder_aps::api::{ApiError, ScheduleApi, ScheduleRequestDto};
use workorder_aps::engine::{ScheduleDirection, ScheduleMode, ScheduleRequest};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn dto(job_id: &str) -> ScheduleRequestDto {
    ScheduleRequestDto {
        job_id: job_id.to_string(),
        company_id: COMPANY.to_string(),
        user_id: USER.to_string(),
        mode: None,
        direction: None,
    }
}

#[tokio::test]
async fn test_api_rejects_blank_ids_before_touching_storage() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_shared(&db_path);
    let api = ScheduleApi::new(make_orchestrator(conn));

    let err = api.schedule(&dto("  ")).await.unwrap_err();
    match err {
        ApiError::InvalidInput(msg) => assert!(msg.contains("jobId")),
        other => panic!("预期 InvalidInput,实际 {:?}", other),
    }
    assert!(ApiError::InvalidInput("x".to_string()).is_client_error());
}

#[tokio::test]
async fn test_api_rejects_unknown_mode() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_shared(&db_path);
    let api = ScheduleApi::new(make_orchestrator(conn));

    let mut bad = dto(JOB);
    bad.mode = Some("redo".to_string());
    let err = api.schedule(&bad).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[tokio::test]
async fn test_api_full_flow_returns_summary() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_shared(&db_path);
    {
        let guard = conn.lock().unwrap();
        insert_job(&guard, JOB, Some("2025-01-17"), None);
        insert_method(&guard, "M1", None);
        insert_process(&guard, "X", &["W1"]);
        insert_work_center(&guard, "W1", LOCATION, true);
        insert_operation(&guard, "A", "M1", 1.0, "AFTER_PREVIOUS", "X", 8.0, 0);
        insert_operation(&guard, "B", "M1", 2.0, "AFTER_PREVIOUS", "X", 8.0, 0);
    }

    let api = ScheduleApi::new(make_orchestrator(conn));
    let request = ScheduleRequest {
        job_id: JOB.to_string(),
        company_id: COMPANY.to_string(),
        user_id: USER.to_string(),
        mode: ScheduleMode::Initial,
        direction: ScheduleDirection::Backward,
    };

    let response = api
        .schedule_with_today(&request, d(2025, 1, 10))
        .await
        .unwrap();

    assert!(response.success);
    assert!(response.message.is_none());
    assert_eq!(response.operations_scheduled, 2);
    assert_eq!(response.conflicts_detected, 0);
    assert_eq!(response.work_centers_affected, vec!["W1".to_string()]);
    assert_eq!(response.assembly_depth, 1);
}

#[tokio::test]
async fn test_api_unknown_job_is_zero_count_success() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_shared(&db_path);
    let api = ScheduleApi::new(make_orchestrator(conn));

    let response = api.schedule(&dto("J_GHOST")).await.unwrap();
    assert!(response.success);
    assert_eq!(response.operations_scheduled, 0);
    assert!(response.work_centers_affected.is_empty());
}

#[test]
fn test_api_blocking_entry_without_runtime() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_shared(&db_path);
    {
        let guard = conn.lock().unwrap();
        insert_job(&guard, JOB, Some("2025-01-17"), None);
        insert_method(&guard, "M1", None);
        insert_process(&guard, "X", &["W1"]);
        insert_work_center(&guard, "W1", LOCATION, true);
        insert_operation(&guard, "A", "M1", 1.0, "AFTER_PREVIOUS", "X", 8.0, 0);
    }

    // 非异步宿主: 接口自建运行时
    let api = ScheduleApi::new(make_orchestrator(conn));
    let response = api.schedule_blocking(&dto(JOB)).unwrap();
    assert!(response.success);
    assert_eq!(response.operations_scheduled, 1);
}
