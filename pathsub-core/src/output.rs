use crate::commit::CommitResult;
use crate::plan::{Plan, PlannedMove};
use crate::preview;
use serde::Serialize;
use serde_json::json;
use std::fmt::Write;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Summary,
    Json,
}

/// Result of a plan operation
#[derive(Debug, Serialize)]
pub struct PlanResult {
    pub search: String,
    pub replace: String,
    pub plan: Plan,
    #[serde(skip)]
    pub use_color: bool,
}

impl PlanResult {
    pub fn has_conflicts(&self) -> bool {
        self.plan.has_conflicts()
    }

    /// 0 when the plan is conflict free, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        i32::from(self.has_conflicts())
    }
}

/// Result of a rename operation
#[derive(Debug, Serialize)]
pub struct RenameResult {
    pub search: String,
    pub replace: String,
    pub result: CommitResult,
    pub moves: Vec<PlannedMove>,
    pub trial: bool,
}

impl RenameResult {
    pub fn exit_code(&self) -> i32 {
        self.result.exit_code()
    }
}

/// Trait for formatting output in different formats
pub trait OutputFormatter {
    fn format(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => self.format_json(),
            OutputFormat::Summary => self.format_summary(),
        }
    }

    fn format_json(&self) -> String;
    fn format_summary(&self) -> String;
}

impl OutputFormatter for PlanResult {
    fn format_json(&self) -> String {
        let mut value = preview::plan_json(&self.plan);
        value["success"] = json!(!self.has_conflicts());
        value["operation"] = json!("plan");
        value["search"] = json!(self.search);
        value["replace"] = json!(self.replace);
        serde_json::to_string(&value).unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let mut output = String::new();
        writeln!(output, "Showing plan. No changes will be made.").unwrap();
        writeln!(output).unwrap();
        output.push_str(&preview::render_report(&self.plan, self.use_color));
        output
    }
}

impl OutputFormatter for RenameResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": self.result.is_success(),
            "operation": "rename",
            "search": self.search,
            "replace": self.replace,
            "result": self.result,
            "exit_code": self.exit_code(),
            "trial": self.trial,
            "moves": self.moves,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let mut output = String::new();

        let count = self.moves.len();
        let noun = if count == 1 { "path" } else { "paths" };

        match (self.result, self.trial) {
            (CommitResult::Success, false) => {
                writeln!(output, "Renamed {} {}", count, noun).unwrap();
            },
            (CommitResult::Success, true) => {
                writeln!(output, "Trial complete: {} {} would be renamed", count, noun).unwrap();
            },
            (CommitResult::FailedWithSuccessfulRollback, _) => {
                writeln!(output, "Rename failed. All changes were rolled back.").unwrap();
            },
            (CommitResult::FailedWithNoncriticalRollback, _) => {
                writeln!(
                    output,
                    "Rename failed. Changes were rolled back, but some created directories remain."
                )
                .unwrap();
            },
            (CommitResult::FailedWithFailedRollback, _) => {
                writeln!(
                    output,
                    "Rename failed and could not be fully rolled back. See the commands above."
                )
                .unwrap();
            },
        }

        output
    }
}
