mod common;

use common::{Fixture, ORDER};
use lims_core::{ImportError, RecordRepository};
use lims_model::ImportState;
use tempfile::TempDir;

#[test]
fn save_and_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let repo = RecordRepository::new(dir.path().join("store")).unwrap();
    let record = Fixture::new().stage(ORDER);

    let path = repo.save(&record).unwrap();
    assert!(path.ends_with("import-0001.json"));
    assert!(repo.exists("import-0001"));

    let loaded = repo.load("import-0001").unwrap();
    assert_eq!(loaded, record);
}

#[test]
fn missing_record_is_reported() {
    let dir = TempDir::new().unwrap();
    let repo = RecordRepository::new(dir.path()).unwrap();
    let err = repo.load("import-0042").unwrap_err();
    assert!(matches!(err, ImportError::RecordNotFound { .. }));
}

#[test]
fn list_by_states_filters_and_orders() {
    let dir = TempDir::new().unwrap();
    let repo = RecordRepository::new(dir.path()).unwrap();
    let fixture = Fixture::new();

    for (id, state) in [
        ("import-0003", ImportState::Imported),
        ("import-0001", ImportState::Valid),
        ("import-0002", ImportState::Invalid),
    ] {
        let mut record = fixture.record(id, ORDER);
        record.state = state;
        repo.save(&record).unwrap();
    }

    let committed = repo
        .list_by_states(&[ImportState::Valid, ImportState::Imported])
        .unwrap();
    let ids: Vec<_> = committed.iter().map(|record| record.id.as_str()).collect();
    assert_eq!(ids, ["import-0001", "import-0003"]);
    assert_eq!(repo.list().unwrap().len(), 3);
    assert_eq!(repo.next_id().unwrap(), "import-0004");
}

#[test]
fn next_id_starts_at_one() {
    let dir = TempDir::new().unwrap();
    let repo = RecordRepository::new(dir.path()).unwrap();
    assert_eq!(repo.next_id().unwrap(), "import-0001");

    let record = Fixture::new().record("import-0001", ORDER);
    repo.save(&record).unwrap();
    assert!(repo.exists("import-0001"));
    assert_eq!(repo.next_id().unwrap(), "import-0002");
}

#[test]
fn corrupt_record_is_a_json_error() {
    let dir = TempDir::new().unwrap();
    let repo = RecordRepository::new(dir.path()).unwrap();
    std::fs::write(dir.path().join("import-0001.json"), "{ not json").unwrap();
    let err = repo.load("import-0001").unwrap_err();
    assert!(matches!(err, ImportError::Json { .. }));
}
