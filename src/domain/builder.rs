//! Tree builder: materializes the visible forest from a unit snapshot.

use std::collections::HashSet;

use termtree::Tree;
use tracing::{debug, instrument};

use crate::domain::arena::UnitArena;
use crate::domain::entities::{Unit, UnitId};
use crate::domain::ordering::OrderingPolicy;

/// Ephemeral view node: a unit and its materialized, ordered children.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TreeNode<'a> {
    pub unit: &'a Unit,
    /// Whether the unit has children in the full snapshot, independent of
    /// visibility or expansion
    pub has_children: bool,
    /// Empty unless the node was expanded
    pub children: Vec<TreeNode<'a>>,
}

impl<'a> TreeNode<'a> {
    pub fn id(&self) -> UnitId {
        self.unit.id
    }

    /// Pre-order depth-first traversal of this node and its materialized subtree.
    pub fn iter(&self) -> TreeIter<'_, 'a> {
        TreeIter { stack: vec![self] }
    }

    /// Number of levels materialized below and including this node.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(TreeNode::depth).max().unwrap_or(0)
    }

    pub fn to_tree_string(&self) -> Tree<String> {
        let label = if self.has_children && self.children.is_empty() {
            format!("{} [{}] +", self.unit.name, self.unit.id)
        } else {
            format!("{} [{}]", self.unit.name, self.unit.id)
        };
        Tree::new(label).with_leaves(self.children.iter().map(TreeNode::to_tree_string))
    }
}

pub struct TreeIter<'n, 'a> {
    stack: Vec<&'n TreeNode<'a>>,
}

impl<'n, 'a> Iterator for TreeIter<'n, 'a> {
    type Item = &'n TreeNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Pre-order traversal over a whole forest.
pub fn iter_forest<'n, 'a>(forest: &'n [TreeNode<'a>]) -> impl Iterator<Item = &'n TreeNode<'a>> {
    forest.iter().flat_map(TreeNode::iter)
}

/// Maximum materialized depth of a forest; `0` when empty.
pub fn forest_depth(forest: &[TreeNode<'_>]) -> usize {
    forest.iter().map(TreeNode::depth).max().unwrap_or(0)
}

/// Builds ordered forests from a snapshot.
pub struct TreeBuilder<'p> {
    policy: &'p OrderingPolicy,
}

impl<'p> TreeBuilder<'p> {
    pub fn new(policy: &'p OrderingPolicy) -> Self {
        Self { policy }
    }

    /// Build the forest of participating units.
    ///
    /// `visible = None` lets every unit participate. Children of a node are
    /// only materialized when `should_expand(id)` holds. Orphans whose parent
    /// id does not resolve become roots.
    #[instrument(level = "debug", skip_all, fields(units = arena.len()))]
    pub fn build<'a, F>(
        &self,
        arena: &'a UnitArena,
        visible: Option<&HashSet<UnitId>>,
        should_expand: F,
    ) -> Vec<TreeNode<'a>>
    where
        F: Fn(UnitId) -> bool,
    {
        let participates = |id: UnitId| visible.map_or(true, |v| v.contains(&id));

        let mut roots: Vec<&Unit> = arena.roots().filter(|u| participates(u.id)).collect();
        self.policy.sort_roots(&mut roots);
        debug!("build: {} root(s) participate", roots.len());

        roots
            .into_iter()
            .map(|unit| self.node(arena, unit, &participates, &should_expand))
            .collect()
    }

    fn node<'a>(
        &self,
        arena: &'a UnitArena,
        unit: &'a Unit,
        participates: &dyn Fn(UnitId) -> bool,
        should_expand: &dyn Fn(UnitId) -> bool,
    ) -> TreeNode<'a> {
        let has_children = arena.has_children(unit.id);
        let children = if has_children && should_expand(unit.id) {
            let mut kids: Vec<&Unit> = arena
                .children_of(unit.id)
                .filter(|u| participates(u.id))
                .collect();
            self.policy.sort_siblings(&mut kids);
            kids.into_iter()
                .map(|kid| self.node(arena, kid, participates, should_expand))
                .collect()
        } else {
            Vec::new()
        };

        TreeNode {
            unit,
            has_children,
            children,
        }
    }
}
