use super::PredictionRepository;
use crate::domain::estimation::EstimationResult;
use crate::domain::mine::Mine;
use crate::domain::prediction::{PredictionRecord, ValidatedInputs};
use crate::domain::types::{RockType, WeatherCondition};
use crate::repository::error::RepositoryError;
use crate::repository::mine_repo::MineRepository;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

fn setup_test_db() -> Arc<Mutex<Connection>> {
    let conn = Connection::open_in_memory().unwrap();
    crate::db::configure_sqlite_connection(&conn).unwrap();
    crate::db::init_schema(&conn).unwrap();
    let conn = Arc::new(Mutex::new(conn));

    let mines = MineRepository::from_connection(conn.clone());
    for id in ["M001", "M002"] {
        mines
            .insert(&Mine::new(id, format!("Pit {}", id), "Kalgoorlie", base_time()))
            .unwrap();
    }

    conn
}

fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

fn make_record(id: &str, mine_id: &str, user: &str, minutes: i64) -> PredictionRecord {
    PredictionRecord {
        prediction_id: id.to_string(),
        mine_id: mine_id.to_string(),
        inputs: ValidatedInputs {
            rock_type: RockType::Granite,
            rock_density: 2700.0,
            rock_strength: 150.0,
            water_content: 3.0,
            hole_depth: 10.0,
            hole_diameter: 102.0,
            explosive_amount: 25.0,
            burden: 4.5,
            spacing: 5.5,
            subdrill: 0.8,
            weather_condition: WeatherCondition::Clear,
            temperature: 20.0,
            humidity: 40.0,
        },
        result: EstimationResult {
            efficiency: 76.5,
            safety: 74.25,
            fragmentation_quality: 72.0,
            vibration_level: 33.33,
            airblast_level: 110.0,
            confidence: 91.5,
            recommendations: vec!["Current parameters appear optimal".to_string()],
        },
        requested_by: user.to_string(),
        model_version: "v1.0.0-formula".to_string(),
        processing_time_ms: 3,
        created_at: base_time() + Duration::minutes(minutes),
    }
}

#[test]
fn test_insert_and_find_by_id() {
    let repo = PredictionRepository::from_connection(setup_test_db());
    let record = make_record("p1", "M001", "U001", 0);

    repo.insert(&record).unwrap();

    let found = repo.find_by_id("p1").unwrap().unwrap();
    assert_eq!(found, record);
    assert!(repo.find_by_id("missing").unwrap().is_none());
}

#[test]
fn test_history_newest_first_with_paging() {
    let repo = PredictionRepository::from_connection(setup_test_db());
    for i in 0..5 {
        repo.insert(&make_record(&format!("p{}", i), "M001", "U001", i))
            .unwrap();
    }
    repo.insert(&make_record("other", "M001", "U002", 10)).unwrap();

    let page1 = repo.list_by_requester("U001", None, 2, 0).unwrap();
    let ids: Vec<_> = page1.iter().map(|r| r.prediction_id.as_str()).collect();
    assert_eq!(ids, vec!["p4", "p3"]);

    let page3 = repo.list_by_requester("U001", None, 2, 4).unwrap();
    assert_eq!(page3.len(), 1);
    assert_eq!(page3[0].prediction_id, "p0");

    assert_eq!(repo.count_by_requester("U001", None).unwrap(), 5);
    assert_eq!(repo.count_by_requester("U002", None).unwrap(), 1);
}

#[test]
fn test_history_mine_filter() {
    let repo = PredictionRepository::from_connection(setup_test_db());
    repo.insert(&make_record("a", "M001", "U001", 0)).unwrap();
    repo.insert(&make_record("b", "M002", "U001", 1)).unwrap();
    repo.insert(&make_record("c", "M002", "U001", 2)).unwrap();

    let m2 = repo.list_by_requester("U001", Some("M002"), 10, 0).unwrap();
    assert_eq!(m2.len(), 2);
    assert!(m2.iter().all(|r| r.mine_id == "M002"));
    assert_eq!(repo.count_by_requester("U001", Some("M001")).unwrap(), 1);
}

#[test]
fn test_same_timestamp_keeps_insert_order() {
    let repo = PredictionRepository::from_connection(setup_test_db());
    repo.insert(&make_record("first", "M001", "U001", 0)).unwrap();
    repo.insert(&make_record("second", "M001", "U001", 0)).unwrap();

    let rows = repo.list_by_requester("U001", None, 10, 0).unwrap();
    assert_eq!(rows[0].prediction_id, "second");
    assert_eq!(rows[1].prediction_id, "first");
}

#[test]
fn test_delete() {
    let repo = PredictionRepository::from_connection(setup_test_db());
    repo.insert(&make_record("p1", "M001", "U001", 0)).unwrap();

    assert!(repo.delete_by_id("p1").unwrap());
    assert!(!repo.delete_by_id("p1").unwrap());
    assert!(repo.find_by_id("p1").unwrap().is_none());
}

#[test]
fn test_unknown_mine_rejected_by_foreign_key() {
    let repo = PredictionRepository::from_connection(setup_test_db());
    let err = repo
        .insert(&make_record("p1", "M404", "U001", 0))
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ForeignKeyViolation(_)));
}

#[test]
fn test_corrupt_json_surfaces_error() {
    let conn = setup_test_db();
    let repo = PredictionRepository::from_connection(conn.clone());
    repo.insert(&make_record("p1", "M001", "U001", 0)).unwrap();

    conn.lock()
        .unwrap()
        .execute(
            "UPDATE prediction SET result_json = '{broken' WHERE prediction_id = 'p1'",
            [],
        )
        .unwrap();

    let err = repo.find_by_id("p1").unwrap_err();
    assert!(matches!(err, RepositoryError::Serialization(_)));
}
