use clap::ValueEnum;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Summary,
    Json,
}

impl From<OutputFormat> for pathsub_core::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Summary => Self::Summary,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// Names and wording that differ between the tools built on this crate.
#[derive(Debug, Clone, Copy)]
pub struct ToolStrings {
    pub name: &'static str,
    /// Verb used in help text, e.g. "move"
    pub plan_verb: &'static str,
    pub about: &'static str,
}

pub const SUBMV: ToolStrings = ToolStrings {
    name: "submv",
    plan_verb: "move",
    about: "Rename or move files by performing find-replace operations on their paths",
};
