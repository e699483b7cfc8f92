//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod expansion;
pub mod ordering;
pub mod search;
pub mod selection;

pub use arena::UnitArena;
pub use builder::{forest_depth, iter_forest, TreeBuilder, TreeNode};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use expansion::ExpansionState;
pub use ordering::{default_chart, OrderingPolicy, RankRule, RankRuleSpec, DEFAULT_RANK};
pub use search::{ancestors, filter, SearchResult};
pub use selection::{descendants, Selection};
