#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Transactional batch renaming: every path in a batch is moved to its
//! substituted name, or the filesystem is put back the way it was.

pub mod agent;
pub mod commit;
pub mod config;
pub mod error;
pub mod history;
pub mod operation;
pub mod operations;
pub mod output;
pub mod pattern;
pub mod plan;
pub mod preview;

pub use agent::{Agent, Executive};
pub use commit::{
    commit, commit_with, ensure_dir_for, generate_temp_name, perform_moves, CommitOptions,
    CommitReport, CommitResult, DeferredMove, TEMP_MARKER,
};
pub use config::Config;
pub use error::{CommitError, NonCriticalError, RollbackError};
pub use history::HistoryAgent;
pub use operation::Operation;
pub use operations::{plan_operation, rename_operation};
pub use output::{OutputFormat, OutputFormatter, PlanResult, RenameResult};
pub use pattern::{make_pattern, MapperOptions, PathMapper};
pub use plan::{make_plan, Conflict, Plan, PlannedMove};
pub use preview::{plan_json, render_report, should_use_color};
