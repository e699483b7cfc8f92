//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (UnitRepository, Picker)
//! but are themselves concrete structs, not traits.

mod selector;

pub use selector::{LoadState, SelectionCallback, SelectorSession};
