//! Infrastructure layer: I/O implementations
//!
//! This layer implements the unit source and picker boundary traits.

pub mod error;
pub mod traits;

pub use error::{InfraError, InfraResult};
pub use traits::{
    resolve_picked, FetchError, JsonFileRepository, PickItem, Picker, SkimPicker, StaticRepository,
    UnitRepository,
};
