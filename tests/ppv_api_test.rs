// ==========================================
// PpvApi 集成测试
// ==========================================
// 测试目标: 场地规律解析（矿山专属 → 默认）与 PPV 计算
// ==========================================


use mineblast_estimator::api::ApiError;
use mineblast_estimator::config::config_keys;
use mineblast_estimator::engine::ConstantNoise;
use test_helpers::{build_apis, create_test_db, insert_test_config, open_test_connection};

#[tokio::test]
async fn test_default_site_law() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let apis = build_apis(&db_path, Box::new(ConstantNoise(0.5))).unwrap();

    let prediction = apis.ppv_api.predict("M001", 100.0, 25.0).await.unwrap();

    assert_eq!(prediction.scaled_distance, 20.0);
    assert!((prediction.ppv - 9.448238880758337).abs() < 1e-9, "ppv={}", prediction.ppv);
    assert_eq!(prediction.mine_id, "M001");
    assert_eq!(prediction.model_used, "ppv_default");

    let keys: Vec<_> = prediction
        .calculation_steps
        .iter()
        .map(|s| s.key.as_str())
        .collect();
    assert_eq!(
        keys,
        vec![
            "step_1_scaled_distance",
            "step_2_log_transform",
            "step_3_site_law",
            "step_4_final_result"
        ]
    );
    assert_eq!(prediction.calculation_steps[0].detail, "SD = 100 / sqrt(25) = 20.0000");
}

#[tokio::test]
async fn test_mine_specific_site_law() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    insert_test_config(&conn, "ppv_site_law/M007", r#"{"intercept":6.5,"slope":-1.4}"#).unwrap();

    let apis = build_apis(&db_path, Box::new(ConstantNoise(0.5))).unwrap();

    let prediction = apis.ppv_api.predict("M007", 100.0, 25.0).await.unwrap();
    assert!((prediction.ppv - 10.033954756418245).abs() < 1e-9);
    assert_eq!(prediction.model_used, "ppv_site_law/M007");

    // 其他矿山仍走默认规律
    let other = apis.ppv_api.predict("M008", 100.0, 25.0).await.unwrap();
    assert_eq!(other.model_used, "ppv_default");
}

#[tokio::test]
async fn test_default_coefficients_override() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    insert_test_config(&conn, config_keys::PPV_DEFAULT_INTERCEPT, "6.5").unwrap();
    insert_test_config(&conn, config_keys::PPV_DEFAULT_SLOPE, "-1.4").unwrap();

    let apis = build_apis(&db_path, Box::new(ConstantNoise(0.5))).unwrap();
    let prediction = apis.ppv_api.predict("M001", 100.0, 25.0).await.unwrap();
    assert!((prediction.ppv - 10.033954756418245).abs() < 1e-9);
}

#[tokio::test]
async fn test_invalid_inputs_name_field() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let apis = build_apis(&db_path, Box::new(ConstantNoise(0.5))).unwrap();

    let err = apis.ppv_api.predict("M001", 0.0, 25.0).await.unwrap_err();
    assert_eq!(err.field(), Some("distance"));

    let err = apis.ppv_api.predict("M001", 100.0, -5.0).await.unwrap_err();
    assert_eq!(err.field(), Some("chargeWeight"));

    let err = apis.ppv_api.predict("", 100.0, 25.0).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidField { .. }));
}
