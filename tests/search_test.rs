//! Tests for ancestor-preserving search and its interaction with the tree

use std::collections::HashSet;

use rstest::{fixture, rstest};

use unitsel::domain::{
    ancestors, filter, iter_forest, ExpansionState, OrderingPolicy, TreeBuilder, TreeNode,
    UnitArena, UnitId,
};
use unitsel::util::testing::{init_test_setup, sample_units};

#[fixture]
fn arena() -> UnitArena {
    init_test_setup();
    UnitArena::new(sample_units())
}

fn set(ids: &[i64]) -> HashSet<UnitId> {
    ids.iter().copied().map(UnitId).collect()
}

#[rstest]
fn given_deep_match_when_filtering_then_all_ancestors_are_visible(arena: UnitArena) {
    // Act
    let result = filter(&arena, "gaji");

    // Assert
    assert_eq!(result.matches, set(&[1000]));
    assert_eq!(result.visible, set(&[1000, 100, 10, 1]));
    assert!(result.force_expand);
    assert!(result.is_active());
}

#[rstest]
#[case("GAJI")]
#[case("  gaji  ")]
#[case("Gaji")]
fn given_query_variants_when_filtering_then_match_is_case_and_space_insensitive(
    arena: UnitArena,
    #[case] query: &str,
) {
    let result = filter(&arena, query);
    assert_eq!(result.matches, set(&[1000]));
}

#[rstest]
#[case("")]
#[case("   ")]
fn given_blank_query_when_filtering_then_everything_is_visible_without_forcing(
    arena: UnitArena,
    #[case] query: &str,
) {
    let result = filter(&arena, query);

    assert_eq!(result.visible.len(), arena.len());
    assert!(result.matches.is_empty());
    assert!(!result.force_expand);
    assert!(result.visible_filter().is_none());
}

#[rstest]
fn given_query_without_match_when_filtering_then_visible_is_empty(arena: UnitArena) {
    let result = filter(&arena, "tidak ada");

    assert!(result.visible.is_empty());
    assert!(!result.force_expand);
    assert!(result.is_active());
}

#[rstest]
fn given_substring_in_many_names_when_filtering_then_visible_is_union_of_closures(
    arena: UnitArena,
) {
    let result = filter(&arena, "biro");

    assert_eq!(result.matches, set(&[10, 11]));
    assert_eq!(result.visible, set(&[1, 10, 11]));
}

#[rstest]
fn given_match_when_building_then_path_is_force_expanded_and_siblings_hidden(arena: UnitArena) {
    // Arrange
    let policy = OrderingPolicy::default();
    let expansion = ExpansionState::new();
    let result = filter(&arena, "gaji");

    // Act
    let forest = TreeBuilder::new(&policy).build(
        &arena,
        result.visible_filter(),
        expansion.should_expand(&arena, &result),
    );

    // Assert
    let shown: Vec<i64> = iter_forest(&forest).map(|n| n.id().0).collect();
    assert_eq!(shown, vec![1, 10, 100, 1000]);
    let shown: HashSet<UnitId> = iter_forest(&forest).map(TreeNode::id).collect();
    assert!(!shown.contains(&UnitId(11)), "non-matching sibling is hidden");
}

#[rstest]
fn given_nested_unit_when_collecting_ancestors_then_self_is_excluded(arena: UnitArena) {
    assert_eq!(ancestors(&arena, UnitId(1000)), set(&[100, 10, 1]));
    assert!(ancestors(&arena, UnitId(1)).is_empty());
    assert!(ancestors(&arena, UnitId(424242)).is_empty());
}
