use std::collections::{HashMap, HashSet};

use generational_arena::{Arena, Index};
use tracing::{instrument, warn};

use crate::domain::entities::{Unit, UnitId, UnitSnapshot};

/// Arena-backed index over one unit snapshot.
///
/// Units live in a generational arena; an id map provides O(1) lookup and a
/// parent -> children adjacency index is built once so subtree walks never
/// rescan the flat list. The snapshot is immutable once built.
#[derive(Debug)]
pub struct UnitArena {
    /// Arena storage for all units
    arena: Arena<Unit>,
    /// Units in the order the repository delivered them
    order: Vec<Index>,
    by_id: HashMap<UnitId, Index>,
    /// Children keyed by resolvable parent id
    children: HashMap<UnitId, Vec<Index>>,
    /// Units without a resolvable parent (null, `0`, or dangling reference)
    roots: Vec<Index>,
}

impl Default for UnitArena {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl From<UnitSnapshot> for UnitArena {
    fn from(snapshot: UnitSnapshot) -> Self {
        Self::new(snapshot.units)
    }
}

impl UnitArena {
    #[instrument(level = "debug", skip_all)]
    pub fn new(units: impl IntoIterator<Item = Unit>) -> Self {
        let mut arena = Arena::new();
        let mut order = Vec::new();
        let mut by_id = HashMap::new();

        for unit in units {
            if by_id.contains_key(&unit.id) {
                warn!("duplicate unit id {}, keeping first occurrence", unit.id);
                continue;
            }
            let id = unit.id;
            let idx = arena.insert(unit);
            by_id.insert(id, idx);
            order.push(idx);
        }

        let mut children: HashMap<UnitId, Vec<Index>> = HashMap::new();
        let mut roots = Vec::new();
        for &idx in &order {
            match arena[idx].parent().filter(|p| by_id.contains_key(p)) {
                Some(parent) => children.entry(parent).or_default().push(idx),
                None => roots.push(idx),
            }
        }

        let tree = Self {
            arena,
            order,
            by_id,
            children,
            roots,
        };

        let unreachable = tree.unreachable();
        if !unreachable.is_empty() {
            warn!(
                "{} unit(s) sit on a parent cycle and are unreachable from any root: {:?}",
                unreachable.len(),
                unreachable
            );
        }
        tree
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.by_id.get(&id).and_then(|&idx| self.arena.get(idx))
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// All units in delivery order.
    pub fn iter(&self) -> impl Iterator<Item = &Unit> + '_ {
        self.order.iter().map(move |&idx| &self.arena[idx])
    }

    pub fn ids(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.iter().map(|u| u.id)
    }

    /// Root units, unordered (delivery order).
    pub fn roots(&self) -> impl Iterator<Item = &Unit> + '_ {
        self.roots.iter().map(move |&idx| &self.arena[idx])
    }

    /// Direct children of `id`, unordered (delivery order).
    pub fn children_of(&self, id: UnitId) -> impl Iterator<Item = &Unit> + '_ {
        self.children
            .get(&id)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.arena[idx])
    }

    /// Whether `id` has at least one child in the full snapshot.
    pub fn has_children(&self, id: UnitId) -> bool {
        self.children.get(&id).is_some_and(|c| !c.is_empty())
    }

    /// Ids of every unit with at least one child.
    pub fn ids_with_children(&self) -> HashSet<UnitId> {
        self.children
            .iter()
            .filter(|(_, c)| !c.is_empty())
            .map(|(id, _)| *id)
            .collect()
    }

    /// Resolved parent of `id`: `None` for roots, orphans and unknown ids.
    pub fn parent_of(&self, id: UnitId) -> Option<UnitId> {
        self.get(id)?.parent().filter(|p| self.contains(*p))
    }

    /// Whether `id` is a root of the forest (including orphans).
    pub fn is_root(&self, id: UnitId) -> bool {
        self.contains(id) && self.parent_of(id).is_none()
    }

    /// Chain of units from the root down to `id`, inclusive.
    ///
    /// Empty for unknown ids; stops early if the chain revisits a unit.
    pub fn lineage(&self, id: UnitId) -> Vec<&Unit> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.get(id);
        while let Some(unit) = current {
            if !seen.insert(unit.id) {
                break;
            }
            chain.push(unit);
            current = self.parent_of(unit.id).and_then(|p| self.get(p));
        }
        chain.reverse();
        chain
    }

    /// Units not reachable from any root, i.e. members of a parent cycle
    /// and their descendants. Returned in delivery order.
    pub fn unreachable(&self) -> Vec<UnitId> {
        let mut seen: HashSet<UnitId> = HashSet::with_capacity(self.len());
        let mut stack: Vec<UnitId> = self.roots().map(|u| u.id).collect();
        while let Some(id) = stack.pop() {
            if seen.insert(id) {
                stack.extend(self.children_of(id).map(|u| u.id));
            }
        }
        self.ids().filter(|id| !seen.contains(id)).collect()
    }
}
