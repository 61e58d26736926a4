// ==========================================
// PredictionApi 集成测试
// ==========================================
// 测试目标: 预测生成 → 持久化 → 历史分页 → 权限 → 删除
// ==========================================


use mineblast_estimator::api::ApiError;
use mineblast_estimator::config::config_keys;
use mineblast_estimator::domain::{EstimationRequest, Requester, UserRole};
use mineblast_estimator::engine::{ConstantNoise, SequenceNoise};
use test_helpers::{build_apis, create_test_db, granite_clear_inputs, insert_test_config, insert_test_mine, open_test_connection};

fn user(id: &str) -> Requester {
    Requester::new(id, UserRole::User)
}

fn admin(id: &str) -> Requester {
    Requester::new(id, UserRole::Admin)
}

#[tokio::test]
async fn test_generate_prediction_persists_record() {
    mineblast_estimator::logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    insert_test_mine(&conn, "M001", "North Pit", true).unwrap();

    let apis = build_apis(&db_path, Box::new(ConstantNoise(0.5))).unwrap();
    let response = apis
        .prediction_api
        .generate_prediction(&user("U001"), "M001", &granite_clear_inputs())
        .await
        .expect("generate should succeed");

    println!("prediction_id = {}", response.prediction.prediction_id);

    let record = &response.prediction;
    assert_eq!(record.mine_id, "M001");
    assert_eq!(record.requested_by, "U001");
    assert_eq!(record.model_version, "v1.0.0-formula");
    assert!(record.processing_time_ms >= 0);
    assert_eq!(record.result.efficiency, 76.5);
    assert_eq!(record.result.safety, 74.25);
    assert_eq!(record.result.confidence, 91.5);
    assert_eq!(record.inputs.subdrill, 0.8);

    assert_eq!(response.mine.name, "North Pit");

    let stored = apis
        .prediction_api
        .get_prediction(&user("U001"), &record.prediction_id)
        .unwrap();
    assert_eq!(stored.result, record.result);
    assert_eq!(stored.inputs, record.inputs);
}

#[tokio::test]
async fn test_model_version_from_config() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    insert_test_mine(&conn, "M001", "North Pit", true).unwrap();
    insert_test_config(&conn, config_keys::MODEL_VERSION, "v1.1.0-calibrated").unwrap();

    let apis = build_apis(&db_path, Box::new(ConstantNoise(0.5))).unwrap();
    let response = apis
        .prediction_api
        .generate_prediction(&user("U001"), "M001", &granite_clear_inputs())
        .await
        .unwrap();

    assert_eq!(response.prediction.model_version, "v1.1.0-calibrated");
}

#[tokio::test]
async fn test_generate_rejects_unknown_or_inactive_mine() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    insert_test_mine(&conn, "M002", "Closed Pit", false).unwrap();

    let apis = build_apis(&db_path, Box::new(ConstantNoise(0.5))).unwrap();

    let err = apis
        .prediction_api
        .generate_prediction(&user("U001"), "M404", &granite_clear_inputs())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)), "got {:?}", err);

    let err = apis
        .prediction_api
        .generate_prediction(&user("U001"), "M002", &granite_clear_inputs())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)), "got {:?}", err);

    let err = apis
        .prediction_api
        .generate_prediction(&user("U001"), "   ", &granite_clear_inputs())
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("mineId"));
}

#[tokio::test]
async fn test_unknown_mine_reported_before_payload_fields() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let apis = build_apis(&db_path, Box::new(ConstantNoise(0.5))).unwrap();

    let mut inputs = granite_clear_inputs();
    inputs.humidity = None;
    inputs.rock_type = Some("Obsidian".to_string());

    let err = apis
        .prediction_api
        .generate_prediction(&user("U001"), "NO_SUCH_MINE", &inputs)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)), "got {:?}", err);
    assert_eq!(err.field(), None);
}

#[tokio::test]
async fn test_generate_reports_invalid_field() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    insert_test_mine(&conn, "M001", "North Pit", true).unwrap();

    let apis = build_apis(&db_path, Box::new(ConstantNoise(0.5))).unwrap();

    let mut inputs = granite_clear_inputs();
    inputs.rock_type = Some("Obsidian".to_string());
    let err = apis
        .prediction_api
        .generate_prediction(&user("U001"), "M001", &inputs)
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("rockType"));
    assert!(err.is_client_error());

    let mut inputs = granite_clear_inputs();
    inputs.humidity = Some(120.0);
    let err = apis
        .prediction_api
        .generate_prediction(&user("U001"), "M001", &inputs)
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("humidity"));

    // 校验失败不落库
    let history = apis
        .prediction_api
        .list_history(&user("U001"), None, None, None)
        .await
        .unwrap();
    assert_eq!(history.pagination.total, 0);
}

#[tokio::test]
async fn test_history_paging_and_filter() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    insert_test_mine(&conn, "M001", "North Pit", true).unwrap();
    insert_test_mine(&conn, "M002", "South Pit", true).unwrap();

    let apis = build_apis(&db_path, Box::new(SequenceNoise::new(vec![0.1, 0.4, 0.7, 0.9]))).unwrap();
    let requester = user("U001");

    let mut ids = Vec::new();
    for i in 0..5 {
        let mine_id = if i % 2 == 0 { "M001" } else { "M002" };
        let response = apis
            .prediction_api
            .generate_prediction(&requester, mine_id, &granite_clear_inputs())
            .await
            .unwrap();
        ids.push(response.prediction.prediction_id);
    }
    apis.prediction_api
        .generate_prediction(&user("U002"), "M001", &granite_clear_inputs())
        .await
        .unwrap();

    let page1 = apis
        .prediction_api
        .list_history(&requester, Some(1), Some(2), None)
        .await
        .unwrap();
    assert_eq!(page1.pagination.total, 5);
    assert_eq!(page1.pagination.pages, 3);
    assert_eq!(page1.predictions.len(), 2);
    // 新→旧
    assert_eq!(page1.predictions[0].prediction_id, ids[4]);
    assert_eq!(page1.predictions[1].prediction_id, ids[3]);

    let page3 = apis
        .prediction_api
        .list_history(&requester, Some(3), Some(2), None)
        .await
        .unwrap();
    assert_eq!(page3.predictions.len(), 1);
    assert_eq!(page3.predictions[0].prediction_id, ids[0]);

    let filtered = apis
        .prediction_api
        .list_history(&requester, None, None, Some("M002"))
        .await
        .unwrap();
    assert_eq!(filtered.pagination.total, 2);
    assert_eq!(filtered.pagination.limit, 10);
    assert!(filtered.predictions.iter().all(|p| p.mine_id == "M002"));
}

#[tokio::test]
async fn test_history_limit_bounds() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    insert_test_config(&conn, config_keys::HISTORY_MAX_PAGE_SIZE, "50").unwrap();

    let apis = build_apis(&db_path, Box::new(ConstantNoise(0.5))).unwrap();

    let page = apis
        .prediction_api
        .list_history(&user("U001"), None, Some(500), None)
        .await
        .unwrap();
    assert_eq!(page.pagination.limit, 50);
    assert_eq!(page.pagination.pages, 0);

    let err = apis
        .prediction_api
        .list_history(&user("U001"), Some(0), None, None)
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("page"));

    let err = apis
        .prediction_api
        .list_history(&user("U001"), None, Some(0), None)
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("limit"));
}

#[tokio::test]
async fn test_access_control_and_delete() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    insert_test_mine(&conn, "M001", "North Pit", true).unwrap();

    let apis = build_apis(&db_path, Box::new(ConstantNoise(0.5))).unwrap();
    let owner = user("U001");
    let id = apis
        .prediction_api
        .generate_prediction(&owner, "M001", &granite_clear_inputs())
        .await
        .unwrap()
        .prediction
        .prediction_id;

    // 他人不可读、不可删
    let err = apis.prediction_api.get_prediction(&user("U002"), &id).unwrap_err();
    assert!(matches!(err, ApiError::AccessDenied(_)));
    let err = apis.prediction_api.delete_prediction(&user("U002"), &id).unwrap_err();
    assert!(matches!(err, ApiError::AccessDenied(_)));

    // 管理员可读
    assert!(apis.prediction_api.get_prediction(&admin("A001"), &id).is_ok());

    // 本人删除
    apis.prediction_api.delete_prediction(&owner, &id).unwrap();
    let err = apis.prediction_api.get_prediction(&owner, &id).unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    let err = apis.prediction_api.delete_prediction(&admin("A001"), &id).unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn test_estimate_only_does_not_persist() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let apis = build_apis(&db_path, Box::new(ConstantNoise(0.0))).unwrap();

    let request: EstimationRequest = serde_json::from_str(
        r#"{"rockType":"Granite","weatherCondition":"Clear","burden":4.5,"spacing":5.5,"explosiveAmount":25,"rockStrength":150}"#,
    )
    .unwrap();

    let result = apis.prediction_api.estimate_only(&request).unwrap();
    assert_eq!(result.efficiency, 68.85);
    assert_eq!(result.confidence, 85.0);

    let count: i64 = apis
        .conn
        .lock()
        .unwrap()
        .query_row("SELECT COUNT(*) FROM prediction", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);

    let missing = EstimationRequest::default();
    let err = apis.prediction_api.estimate_only(&missing).unwrap_err();
    assert_eq!(err.field(), Some("rockType"));
}

#[tokio::test]
async fn test_enum_names_are_case_sensitive() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    insert_test_mine(&conn, "M001", "North Pit", true).unwrap();

    let apis = build_apis(&db_path, Box::new(ConstantNoise(0.5))).unwrap();

    let request: EstimationRequest = serde_json::from_str(
        r#"{"rockType":"granite","weatherCondition":"rainy","burden":4.5,"spacing":5.5,"explosiveAmount":25,"rockStrength":150}"#,
    )
    .unwrap();
    let err = apis.prediction_api.estimate_only(&request).unwrap_err();
    assert_eq!(err.field(), Some("rockType"));

    let mut inputs = granite_clear_inputs();
    inputs.weather_condition = Some("rainy".to_string());
    let err = apis
        .prediction_api
        .generate_prediction(&user("U001"), "M001", &inputs)
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("weatherCondition"));
}
