use super::BlastDataRepository;
use crate::domain::blast_data::{
    AdditionalInfo, BlastDataFilter, BlastDataRecord, BlastParameters, BlastResults, BlastStatus,
    FragmentationQuality,
};
use crate::domain::mine::Mine;
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

fn make_record(id: &str, mine_id: &str, blast_id: &str, days: i64) -> BlastDataRecord {
    BlastDataRecord {
        blast_data_id: id.to_string(),
        mine_id: mine_id.to_string(),
        blast_id: blast_id.to_string(),
        parameters: BlastParameters {
            depth: 12.0,
            burden: 3.5,
            spacing: 4.0,
            stemming: 2.5,
            total_charge_length: 9.5,
            explosive_per_hole: 45.0,
            max_charge_per_delay: 90.0,
            total_explosive_amount: 1800.0,
            total_rock_blasted: 9000.0,
            power_factor: 5.0,
            distance: 350.0,
            standard_deviation: 2.1,
            frequency: 25.0,
        },
        additional_info: AdditionalInfo {
            rock_type: Some("Coal".to_string()),
            ..Default::default()
        },
        results: BlastResults::default(),
        entered_by: "D001".to_string(),
        blast_date: base_time() + Duration::days(days),
        is_verified: false,
        status: BlastStatus::Draft,
        created_at: base_time(),
        updated_at: base_time(),
    }
}

#[test]
fn test_insert_and_find_round_trip() {
    let repo = BlastDataRepository::from_connection(setup_test_db());
    let mut record = make_record("BD1", "M001", "B-001", 0);
    record.results.fragmentation_quality = Some(FragmentationQuality::Excellent);
    record.additional_info.blast_time = Some(base_time() + Duration::hours(3));
    repo.insert(&record).unwrap();

    let found = repo.find_by_id("BD1").unwrap().unwrap();
    assert_eq!(found, record);

    assert!(repo.find_by_blast_id("M001", "B-001").unwrap().is_some());
    assert!(repo.find_by_blast_id("M002", "B-001").unwrap().is_none());
    assert!(repo.find_by_id("BD404").unwrap().is_none());
}

#[test]
fn test_blast_id_unique_per_mine() {
    let repo = BlastDataRepository::from_connection(setup_test_db());
    repo.insert(&make_record("BD1", "M001", "B-001", 0)).unwrap();

    let err = repo.insert(&make_record("BD2", "M001", "B-001", 1)).unwrap_err();
    assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));

    // 不同矿山可以重复
    repo.insert(&make_record("BD3", "M002", "B-001", 1)).unwrap();
}

#[test]
fn test_unknown_mine_rejected() {
    let repo = BlastDataRepository::from_connection(setup_test_db());
    let err = repo.insert(&make_record("BD1", "M404", "B-001", 0)).unwrap_err();
    assert!(matches!(err, RepositoryError::ForeignKeyViolation(_)));
}

#[test]
fn test_list_by_mine_filters_and_order() {
    let repo = BlastDataRepository::from_connection(setup_test_db());
    repo.insert(&make_record("BD1", "M001", "NP-2026-001", 0)).unwrap();
    repo.insert(&make_record("BD2", "M001", "NP-2026-002", 5)).unwrap();
    repo.insert(&make_record("BD3", "M001", "EXT-001", 10)).unwrap();
    repo.insert(&make_record("BD4", "M002", "NP-2026-001", 2)).unwrap();

    let all = BlastDataFilter::default();
    assert_eq!(repo.count_by_mine("M001", &all).unwrap(), 3);

    let page = repo.list_by_mine("M001", &all, 2, 0).unwrap();
    let ids: Vec<_> = page.iter().map(|r| r.blast_data_id.as_str()).collect();
    assert_eq!(ids, vec!["BD3", "BD2"]);

    let by_id = BlastDataFilter {
        blast_id: Some("np-2026".to_string()),
        ..Default::default()
    };
    assert_eq!(repo.count_by_mine("M001", &by_id).unwrap(), 2);

    // 日期闭区间
    let window = BlastDataFilter {
        start_date: Some(base_time() + Duration::days(5)),
        end_date: Some(base_time() + Duration::days(10)),
        ..Default::default()
    };
    let found = repo.list_by_mine("M001", &window, 10, 0).unwrap();
    let ids: Vec<_> = found.iter().map(|r| r.blast_data_id.as_str()).collect();
    assert_eq!(ids, vec!["BD3", "BD2"]);
}

#[test]
fn test_update_and_delete() {
    let repo = BlastDataRepository::from_connection(setup_test_db());
    let mut record = make_record("BD1", "M001", "B-001", 0);
    repo.insert(&record).unwrap();

    record.blast_id = "B-001A".to_string();
    record.is_verified = true;
    record.status = BlastStatus::Verified;
    record.results.efficiency = Some(82.5);
    record.updated_at = base_time() + Duration::hours(1);
    assert!(repo.update(&record).unwrap());

    let found = repo.find_by_id("BD1").unwrap().unwrap();
    assert_eq!(found.blast_id, "B-001A");
    assert!(found.is_verified);
    assert_eq!(found.status, BlastStatus::Verified);
    assert_eq!(found.results.efficiency, Some(82.5));
    assert_eq!(found.created_at, base_time());

    assert!(repo.delete_by_id("BD1").unwrap());
    assert!(!repo.delete_by_id("BD1").unwrap());
    assert!(!repo.update(&record).unwrap());
}
