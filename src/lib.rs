//! unitsel: organizational-unit hierarchy selector.
//!
//! Layers, innermost first:
//! - `domain`: snapshot index, ordering, tree building, search, selection (no I/O)
//! - `application`: the selector session tying them together
//! - `infrastructure`: unit repositories and the interactive picker
//! - `cli`: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
