//! Tests for the JSON file unit repository

use std::fs;
use std::sync::Arc;

use rstest::rstest;
use tempfile::TempDir;

use unitsel::application::services::SelectorSession;
use unitsel::domain::{OrderingPolicy, UnitId};
use unitsel::infrastructure::traits::{FetchError, JsonFileRepository, UnitRepository};
use unitsel::util::testing::{init_test_setup, sample_units, units_document};

#[test]
fn given_units_document_when_fetching_then_all_units_are_returned() {
    // Arrange
    init_test_setup();
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("units.json");
    fs::write(&path, units_document(&sample_units())).unwrap();
    let repo = JsonFileRepository::new(&path);

    // Act
    let snapshot = repo.fetch_all().unwrap();

    // Assert
    assert_eq!(snapshot.units.len(), 10);
    assert_eq!(repo.path(), path.as_path());
}

#[test]
fn given_sparse_records_when_fetching_then_missing_fields_default() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("units.json");
    fs::write(
        &path,
        r#"{"units": [
            {"id": 1, "name": "Sekretariat Utama", "level": "Eselon I", "parentId": null},
            {"id": 2, "name": "Biro Umum", "parentId": 1},
            {"id": 3, "name": "Pusat Data", "parentId": 0}
        ]}"#,
    )
    .unwrap();

    let snapshot = JsonFileRepository::new(&path).fetch_all().unwrap();

    assert_eq!(snapshot.units[1].level, "");
    assert_eq!(snapshot.units[1].parent(), Some(UnitId(1)));
    assert_eq!(snapshot.units[2].parent(), None);
}

#[rstest]
#[case("not json")]
#[case(r#"{"units": [{"id": "one", "name": "x"}]}"#)]
fn given_malformed_document_when_fetching_then_parse_error(#[case] content: &str) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("units.json");
    fs::write(&path, content).unwrap();

    let result = JsonFileRepository::new(&path).fetch_all();

    assert!(matches!(result, Err(FetchError::Parse { .. })));
}

#[test]
fn given_missing_file_when_loading_session_then_io_error_is_reported() {
    init_test_setup();
    let temp = TempDir::new().unwrap();
    let repo = Arc::new(JsonFileRepository::new(temp.path().join("absent.json")));
    let mut session = SelectorSession::new(repo, OrderingPolicy::default());

    let result = session.load();

    assert!(result.is_err());
    assert!(session.error().unwrap().contains("absent.json"));
}
