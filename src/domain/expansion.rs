//! Expansion state: which subtrees are open.

use std::collections::HashSet;

use crate::domain::arena::UnitArena;
use crate::domain::entities::UnitId;
use crate::domain::search::SearchResult;

/// Set of expanded unit ids.
///
/// An active search overrides this set through `should_expand` without
/// writing to it, so manual choices survive a search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: HashSet<UnitId>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, id: UnitId) {
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
    }

    /// Expand exactly the units that have at least one child.
    pub fn expand_all(&mut self, arena: &UnitArena) {
        self.expanded = arena.ids_with_children();
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn is_expanded(&self, id: UnitId) -> bool {
        self.expanded.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.expanded.iter().copied()
    }

    /// Predicate handed to the tree builder.
    ///
    /// With a forcing search every visible node that has children is open;
    /// otherwise stored membership decides.
    pub fn should_expand<'s>(
        &'s self,
        arena: &'s UnitArena,
        search: &'s SearchResult,
    ) -> impl Fn(UnitId) -> bool + 's {
        move |id| {
            if search.force_expand {
                search.visible.contains(&id) && arena.has_children(id)
            } else {
                self.is_expanded(id)
            }
        }
    }
}

impl FromIterator<UnitId> for ExpansionState {
    fn from_iter<I: IntoIterator<Item = UnitId>>(iter: I) -> Self {
        Self {
            expanded: iter.into_iter().collect(),
        }
    }
}
