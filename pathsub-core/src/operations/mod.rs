//! High-level operations that correspond to CLI modes
//!
//! These modules contain the core logic for each pathsub mode, separated from
//! CLI concerns like argument parsing and output formatting.

pub mod plan;
pub mod rename;

pub use plan::plan_operation;
pub use rename::rename_operation;
