//! Tests for the selector session lifecycle and the Picker workflow

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use unitsel::application::services::{LoadState, SelectorSession};
use unitsel::application::ApplicationError;
use unitsel::cli::pick_selection;
use unitsel::cli::CliError;
use unitsel::domain::{iter_forest, OrderingPolicy, Selection, Unit, UnitId, UnitSnapshot};
use unitsel::infrastructure::traits::{
    resolve_picked, FetchError, PickItem, Picker, StaticRepository, UnitRepository,
};
use unitsel::infrastructure::InfraError;
use unitsel::util::testing::{init_test_setup, sample_units};

/// Repository that fails a fixed number of times before serving its snapshot
struct FlakyRepository {
    failures_left: AtomicUsize,
    snapshot: UnitSnapshot,
}

impl FlakyRepository {
    fn new(failures: usize, units: Vec<Unit>) -> Self {
        Self {
            failures_left: AtomicUsize::new(failures),
            snapshot: UnitSnapshot::from(units),
        }
    }
}

impl UnitRepository for FlakyRepository {
    fn fetch_all(&self) -> Result<UnitSnapshot, FetchError> {
        let left = self.failures_left.load(Ordering::SeqCst);
        if left > 0 {
            self.failures_left.store(left - 1, Ordering::SeqCst);
            return Err(FetchError::Unavailable {
                message: "upstream timeout".to_string(),
            });
        }
        Ok(self.snapshot.clone())
    }
}

/// Mock picker that "types" the given labels back, as skim would print them
struct MockPicker {
    labels: Vec<&'static str>,
    seen: Mutex<Vec<PickItem>>,
}

impl MockPicker {
    fn new(labels: Vec<&'static str>) -> Self {
        Self {
            labels,
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl Picker for MockPicker {
    fn pick_many(&self, items: &[PickItem], _prompt: &str) -> Result<Vec<PickItem>, String> {
        *self.seen.lock().unwrap() = items.to_vec();
        Ok(resolve_picked(items, self.labels.iter().copied()))
    }
}

struct FailingPicker;

impl Picker for FailingPicker {
    fn pick_many(&self, _items: &[PickItem], _prompt: &str) -> Result<Vec<PickItem>, String> {
        Err("terminal unavailable".to_string())
    }
}

fn loaded_session() -> SelectorSession {
    init_test_setup();
    let repo = Arc::new(StaticRepository::new(sample_units()));
    let mut session = SelectorSession::new(repo, OrderingPolicy::default());
    session.load().expect("static load");
    session
}

// ============================================================
// Load lifecycle
// ============================================================

#[test]
fn given_failing_repository_when_loading_then_session_is_failed_and_tree_unavailable() {
    // Arrange
    init_test_setup();
    let repo = Arc::new(FlakyRepository::new(1, sample_units()));
    let mut session = SelectorSession::new(repo, OrderingPolicy::default());

    // Act
    let result = session.load();

    // Assert
    assert!(matches!(
        result,
        Err(ApplicationError::Load(FetchError::Unavailable { .. }))
    ));
    assert!(matches!(session.state(), LoadState::Failed(_)));
    assert!(session.error().unwrap().contains("upstream timeout"));
    assert!(matches!(session.tree(), Err(ApplicationError::NotLoaded)));
    assert!(session.arena().is_empty());
}

#[test]
fn given_failed_session_when_retrying_then_snapshot_is_served() {
    init_test_setup();
    let repo = Arc::new(FlakyRepository::new(1, sample_units()));
    let mut session = SelectorSession::new(repo, OrderingPolicy::default());
    assert!(session.load().is_err());

    session.retry().expect("second attempt succeeds");

    assert!(session.is_ready());
    assert_eq!(session.error(), None);
    assert_eq!(session.tree().unwrap().len(), 5);
}

#[test]
fn given_ready_session_when_snapshot_is_replaced_then_stale_expansion_is_inert() {
    // Arrange
    let mut session = loaded_session();
    session.toggle_expansion(UnitId(1));
    session.toggle_expansion(UnitId(4));

    // Act
    session.replace_snapshot(UnitSnapshot::from(vec![
        Unit::new(4, "Deputi Bidang Mutasi", "I", None),
        Unit::new(40, "Direktorat Mutasi", "II", Some(4)),
    ]));

    // Assert
    let forest = session.tree().unwrap();
    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].children.len(), 1);
    assert!(session.expansion().is_expanded(UnitId(1)));
}

// ============================================================
// Search and expansion
// ============================================================

#[test]
fn given_stored_expansion_when_query_is_cleared_then_stored_expansion_is_restored() {
    // Arrange
    let mut session = loaded_session();
    session.toggle_expansion(UnitId(4));

    // Act: search forces the Sekretariat path open
    session.set_query("gaji");
    let searched: Vec<i64> = iter_forest(&session.tree().unwrap())
        .map(|n| n.id().0)
        .collect();
    session.clear_query();
    let restored = session.tree().unwrap();

    // Assert
    assert_eq!(searched, vec![1, 10, 100, 1000]);
    assert_eq!(restored.len(), 5);
    let sekretariat = restored.iter().find(|n| n.id() == UnitId(1)).unwrap();
    let deputi = restored.iter().find(|n| n.id() == UnitId(4)).unwrap();
    assert!(sekretariat.children.is_empty(), "search did not persist expansion");
    assert_eq!(deputi.children.len(), 1);
}

#[test]
fn given_query_without_match_when_building_then_forest_is_empty() {
    let mut session = loaded_session();
    session.set_query("zzz");
    assert!(session.tree().unwrap().is_empty());
}

#[test]
fn given_expand_all_when_collapsing_then_only_roots_remain() {
    let mut session = loaded_session();

    session.expand_all();
    let expanded = iter_forest(&session.tree().unwrap()).count();
    session.collapse_all();
    let collapsed = iter_forest(&session.tree().unwrap()).count();

    assert_eq!(expanded, 10);
    assert_eq!(collapsed, 5);
}

// ============================================================
// Selection callback
// ============================================================

#[test]
fn given_callback_when_toggling_selection_then_each_change_is_reported() {
    // Arrange
    let mut session = loaded_session();
    let reports: Arc<Mutex<Vec<Selection>>> = Arc::default();
    let sink = Arc::clone(&reports);
    session.on_selection_change(move |s| sink.lock().unwrap().push(s.clone()));

    // Act
    let s = session.toggle_selection(&Selection::new(), UnitId(10));
    let s = session.toggle_selection(&s, UnitId(10));

    // Assert
    let reports = reports.lock().unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].len(), 3);
    assert!(reports[1].is_empty());
    assert!(s.is_empty());
}

// ============================================================
// Picker workflow
// ============================================================

#[test]
fn given_picked_subtree_root_when_picking_then_subtree_is_selected() {
    // Arrange
    let mut session = loaded_session();
    let picker = MockPicker::new(vec!["Sekretariat Utama / Biro Umum [10]"]);

    // Act
    let selection = pick_selection(&mut session, &picker, None).unwrap();

    // Assert
    assert_eq!(
        selection,
        Selection::from([UnitId(10), UnitId(100), UnitId(1000)])
    );
    let offered = picker.seen.lock().unwrap();
    assert_eq!(offered.len(), 10);
    assert_eq!(offered[0].display, "Sekretariat Utama [1]");
    assert!(offered
        .iter()
        .any(|i| i.display == "Sekretariat Utama / Biro Umum / Bagian Keuangan [100]"));
}

#[test]
fn given_query_when_picking_then_candidates_are_limited_to_visible_units() {
    let mut session = loaded_session();
    let picker = MockPicker::new(vec![]);

    let selection = pick_selection(&mut session, &picker, Some("mutasi")).unwrap();

    assert!(selection.is_empty());
    let offered: Vec<UnitId> = picker.seen.lock().unwrap().iter().map(|i| i.id).collect();
    assert_eq!(offered, vec![UnitId(4), UnitId(40)]);
}

#[test]
fn given_picker_error_when_picking_then_picker_error_is_returned() {
    let mut session = loaded_session();

    let result = pick_selection(&mut session, &FailingPicker, None);

    assert!(matches!(
        result,
        Err(CliError::Infra(InfraError::Picker { .. }))
    ));
}

#[test]
fn given_same_named_roots_when_picking_second_then_its_own_subtree_is_selected() {
    // Arrange
    init_test_setup();
    let repo = Arc::new(StaticRepository::new(vec![
        Unit::new(1, "Biro Umum", "I", None),
        Unit::new(2, "Biro Umum", "I", None),
        Unit::new(3, "Bagian A", "II", Some(2)),
    ]));
    let mut session = SelectorSession::new(repo, OrderingPolicy::default());
    session.load().unwrap();
    let picker = MockPicker::new(vec!["Biro Umum [2]"]);

    // Act
    let selection = pick_selection(&mut session, &picker, None).unwrap();

    // Assert
    assert_eq!(selection, Selection::from([UnitId(2), UnitId(3)]));
    let offered = picker.seen.lock().unwrap();
    let labels: Vec<&str> = offered.iter().map(|i| i.display.as_str()).collect();
    assert_eq!(
        labels,
        vec!["Biro Umum [1]", "Biro Umum [2]", "Biro Umum / Bagian A [3]"]
    );
}

#[test]
fn given_stored_expansion_and_query_when_picking_then_session_view_is_unchanged() {
    // Arrange
    let mut session = loaded_session();
    session.toggle_expansion(UnitId(10));
    session.set_query("biro");
    let picker = MockPicker::new(vec!["Deputi Bidang Mutasi / Direktorat Mutasi [40]"]);

    // Act
    let selection = pick_selection(&mut session, &picker, Some("mutasi")).unwrap();

    // Assert
    assert_eq!(selection, Selection::from([UnitId(40)]));
    assert_eq!(session.query(), "biro");
    let expanded: Vec<UnitId> = session.expansion().iter().collect();
    assert_eq!(expanded, vec![UnitId(10)]);
}

#[test]
fn given_unloaded_session_when_picking_then_not_loaded() {
    init_test_setup();
    let mut session = SelectorSession::new(
        Arc::new(StaticRepository::default()),
        OrderingPolicy::default(),
    );

    let result = pick_selection(&mut session, &MockPicker::new(vec![]), None);

    assert!(matches!(
        result,
        Err(CliError::Infra(InfraError::Application(ApplicationError::NotLoaded)))
    ));
}
