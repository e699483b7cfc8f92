//! Selector session
//!
//! Ties the domain pieces into the consumer-facing selector: one snapshot,
//! the current query, stored expansion, and the selection-change callback.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    search, selection, ExpansionState, OrderingPolicy, SearchResult, Selection, TreeBuilder,
    TreeNode, UnitArena, UnitId, UnitSnapshot,
};
use crate::infrastructure::traits::UnitRepository;

/// Lifecycle of the unit snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing fetched yet
    Idle,
    Ready,
    /// Last fetch failed; terminal until `retry`
    Failed(String),
}

/// Receives the new selection after every selection operation.
pub type SelectionCallback = Box<dyn FnMut(&Selection) + Send>;

/// Consumer-facing selector over one unit repository.
///
/// The selection itself stays with the caller: each selection operation takes
/// the current set, returns the new one and reports it to the callback.
pub struct SelectorSession {
    repository: Arc<dyn UnitRepository>,
    policy: OrderingPolicy,
    arena: UnitArena,
    state: LoadState,
    expansion: ExpansionState,
    query: String,
    /// Display hint only, never affects tree contents
    max_height: u32,
    on_selection_change: Option<SelectionCallback>,
}

impl fmt::Debug for SelectorSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectorSession")
            .field("units", &self.arena.len())
            .field("state", &self.state)
            .field("query", &self.query)
            .field("expanded", &self.expansion.len())
            .field("max_height", &self.max_height)
            .finish()
    }
}

impl SelectorSession {
    pub const DEFAULT_MAX_HEIGHT: u32 = 400;

    /// Create a new session; call `load` before building trees.
    pub fn new(repository: Arc<dyn UnitRepository>, policy: OrderingPolicy) -> Self {
        Self {
            repository,
            policy,
            arena: UnitArena::default(),
            state: LoadState::Idle,
            expansion: ExpansionState::new(),
            query: String::new(),
            max_height: Self::DEFAULT_MAX_HEIGHT,
            on_selection_change: None,
        }
    }

    pub fn with_max_height(mut self, max_height: u32) -> Self {
        self.max_height = max_height;
        self
    }

    pub fn on_selection_change(&mut self, callback: impl FnMut(&Selection) + Send + 'static) {
        self.on_selection_change = Some(Box::new(callback));
    }

    // ============================================================
    // Snapshot lifecycle
    // ============================================================

    /// Fetch the full unit list once.
    ///
    /// On failure the session enters `LoadState::Failed`; it neither retries
    /// nor keeps serving a previous snapshot.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&mut self) -> ApplicationResult<()> {
        match self.repository.fetch_all() {
            Ok(snapshot) => {
                self.replace_snapshot(snapshot);
                Ok(())
            }
            Err(e) => {
                warn!("load failed: {}", e);
                self.arena = UnitArena::default();
                self.state = LoadState::Failed(e.to_string());
                Err(ApplicationError::Load(e))
            }
        }
    }

    /// Explicit retry after a failed load.
    pub fn retry(&mut self) -> ApplicationResult<()> {
        debug!("retry: previous state {:?}", self.state);
        self.load()
    }

    /// Replace the snapshot wholesale.
    ///
    /// Stored expansion ids are kept as they are; ids missing from the new
    /// snapshot simply never match a node.
    pub fn replace_snapshot(&mut self, snapshot: UnitSnapshot) {
        self.arena = UnitArena::from(snapshot);
        self.state = LoadState::Ready;
        info!("loaded {} unit(s)", self.arena.len());
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == LoadState::Ready
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn arena(&self) -> &UnitArena {
        &self.arena
    }

    pub fn policy(&self) -> &OrderingPolicy {
        &self.policy
    }

    pub fn max_height(&self) -> u32 {
        self.max_height
    }

    // ============================================================
    // View: search + expansion -> forest
    // ============================================================

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
    }

    pub fn search(&self) -> SearchResult {
        search::filter(&self.arena, &self.query)
    }

    /// Visible forest for the current query and expansion.
    pub fn tree(&self) -> ApplicationResult<Vec<TreeNode<'_>>> {
        if !self.is_ready() {
            return Err(ApplicationError::NotLoaded);
        }
        let result = self.search();
        let forest = TreeBuilder::new(&self.policy).build(
            &self.arena,
            result.visible_filter(),
            self.expansion.should_expand(&self.arena, &result),
        );
        debug!(
            "tree: query={:?} roots={} force_expand={}",
            self.query,
            forest.len(),
            result.force_expand
        );
        Ok(forest)
    }

    pub fn has_children(&self, id: UnitId) -> bool {
        self.arena.has_children(id)
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn toggle_expansion(&mut self, id: UnitId) {
        self.expansion.toggle(id);
    }

    pub fn expand_all(&mut self) {
        self.expansion.expand_all(&self.arena);
    }

    pub fn collapse_all(&mut self) {
        self.expansion.collapse_all();
    }

    // ============================================================
    // Selection: stateless, reported through the callback
    // ============================================================

    pub fn select(&mut self, current: &Selection, id: UnitId) -> Selection {
        let next = selection::select(current, id, &self.arena);
        self.notify(next)
    }

    pub fn deselect(&mut self, current: &Selection, id: UnitId) -> Selection {
        let next = selection::deselect(current, id, &self.arena);
        self.notify(next)
    }

    pub fn toggle_selection(&mut self, current: &Selection, id: UnitId) -> Selection {
        let next = selection::toggle(current, id, &self.arena);
        self.notify(next)
    }

    pub fn select_all(&mut self) -> Selection {
        let next = selection::select_all(&self.arena);
        self.notify(next)
    }

    pub fn clear_all(&mut self) -> Selection {
        self.notify(selection::clear_all())
    }

    fn notify(&mut self, next: Selection) -> Selection {
        debug!("selection changed: {} id(s)", next.len());
        if let Some(callback) = self.on_selection_change.as_mut() {
            callback(&next);
        }
        next
    }
}
