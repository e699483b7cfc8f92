//! Selection manager: stateless cascading select/deselect over subtrees.
//!
//! Selections are owned by the caller; every operation takes the current set
//! and returns a new one. Cascades run over the full snapshot, independent of
//! search visibility or expansion. There is no partial/indeterminate state.

use std::collections::{BTreeSet, HashSet};

use tracing::instrument;

use crate::domain::arena::UnitArena;
use crate::domain::entities::UnitId;

/// Externally owned, order-irrelevant set of selected ids.
pub type Selection = BTreeSet<UnitId>;

/// Descendant closure of `id`, excluding `id` itself.
pub fn descendants(arena: &UnitArena, id: UnitId) -> HashSet<UnitId> {
    let mut out = HashSet::new();
    descendants_into(arena, id, &mut out);
    out.remove(&id);
    out
}

fn descendants_into(arena: &UnitArena, id: UnitId, out: &mut HashSet<UnitId>) {
    for child in arena.children_of(id) {
        if out.insert(child.id) {
            descendants_into(arena, child.id, out);
        }
    }
}

/// `{id}` plus all descendants.
pub fn closure(arena: &UnitArena, id: UnitId) -> HashSet<UnitId> {
    let mut out = descendants(arena, id);
    out.insert(id);
    out
}

/// Add `id` and its whole subtree to `current`.
#[instrument(level = "debug", skip(current, arena))]
pub fn select(current: &Selection, id: UnitId, arena: &UnitArena) -> Selection {
    let mut next = current.clone();
    next.extend(closure(arena, id));
    next
}

/// Remove `id` and its whole subtree from `current`.
#[instrument(level = "debug", skip(current, arena))]
pub fn deselect(current: &Selection, id: UnitId, arena: &UnitArena) -> Selection {
    let subtree = closure(arena, id);
    current
        .iter()
        .filter(|selected| !subtree.contains(*selected))
        .copied()
        .collect()
}

/// Deselect when `id` is selected, select otherwise.
pub fn toggle(current: &Selection, id: UnitId, arena: &UnitArena) -> Selection {
    if current.contains(&id) {
        deselect(current, id, arena)
    } else {
        select(current, id, arena)
    }
}

pub fn select_all(arena: &UnitArena) -> Selection {
    arena.ids().collect()
}

pub fn clear_all() -> Selection {
    Selection::new()
}
