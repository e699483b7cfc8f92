//! Search filter: case-insensitive substring matching that keeps ancestor context.

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::domain::arena::UnitArena;
use crate::domain::entities::UnitId;

/// Outcome of filtering a snapshot by a query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchResult {
    /// Units to display: matches plus all their ancestors
    pub visible: HashSet<UnitId>,
    /// Units whose name matched directly
    pub matches: HashSet<UnitId>,
    /// Treat every visible node with children as expanded
    pub force_expand: bool,
    active: bool,
}

impl SearchResult {
    /// Whether a non-blank query was applied.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Ids participating in the tree, `None` meaning "all units".
    pub fn visible_filter(&self) -> Option<&HashSet<UnitId>> {
        self.active.then_some(&self.visible)
    }
}

/// Trim and case-fold a raw query.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Filter `arena` by `query`.
///
/// A blank query shows everything without forcing expansion. A query with no
/// match yields an empty visible set rather than falling back to the full tree.
#[instrument(level = "debug", skip(arena))]
pub fn filter(arena: &UnitArena, query: &str) -> SearchResult {
    let needle = normalize_query(query);
    if needle.is_empty() {
        return SearchResult {
            visible: arena.ids().collect(),
            matches: HashSet::new(),
            force_expand: false,
            active: false,
        };
    }

    let matches: HashSet<UnitId> = arena
        .iter()
        .filter(|u| u.name.to_lowercase().contains(&needle))
        .map(|u| u.id)
        .collect();

    let mut visible = matches.clone();
    for &id in &matches {
        ancestors_into(arena, id, &mut visible);
    }
    debug!(
        "filter: {} match(es), {} visible",
        matches.len(),
        visible.len()
    );

    SearchResult {
        force_expand: !matches.is_empty(),
        visible,
        matches,
        active: true,
    }
}

/// Ancestor closure of `id`, excluding `id` itself.
///
/// Walks resolvable parent links to the root and stops on a revisited id, so
/// a parent cycle terminates.
pub fn ancestors(arena: &UnitArena, id: UnitId) -> HashSet<UnitId> {
    let mut out = HashSet::new();
    ancestors_into(arena, id, &mut out);
    out.remove(&id);
    out
}

fn ancestors_into(arena: &UnitArena, id: UnitId, out: &mut HashSet<UnitId>) {
    if let Some(parent) = arena.parent_of(id) {
        if out.insert(parent) {
            ancestors_into(arena, parent, out);
        }
    }
}
