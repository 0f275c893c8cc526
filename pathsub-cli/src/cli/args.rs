use clap::{CommandFactory, Parser};
use std::path::PathBuf;

use super::types::{OutputFormat, ToolStrings};

/// Rename or move files by performing find-replace operations on their paths
#[derive(Parser, Debug)]
#[command(name = "submv")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// The regular expression, or string if -l/--literal is given, to match
    #[arg(value_name = "SEARCH")]
    pub search: String,

    /// The replacement. Capture groups can be used as $1 or ${name}, unless
    /// -l/--literal is given, in which case it is inserted as is
    #[arg(value_name = "REPLACE")]
    pub replace: String,

    /// The files to rename or move
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Restrict the find/replace to the file's name, the part of the path
    /// after the last separator
    #[arg(short, long)]
    pub basename: bool,

    /// Match SEARCH as plain text rather than as a regular expression
    #[arg(short, long)]
    pub literal: bool,

    /// Case-insensitive matching
    #[arg(short, long)]
    pub ignore_case: bool,

    /// Show the intended changes without making them
    #[arg(short, long)]
    pub plan: bool,

    /// Make the changes, then immediately roll them back. A more accurate
    /// preview than -p/--plan
    #[arg(short, long, conflicts_with = "plan")]
    pub trial: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary)]
    pub output: OutputFormat,

    /// Suppress all log output, including errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show every filesystem operation as it is performed, including
    /// intermediate ones and rollbacks
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,
}

impl Cli {
    /// The clap command, named and worded for `strings`.
    pub fn command_for(strings: &ToolStrings) -> clap::Command {
        let plan_help = format!(
            "Show the intended changes without making them. Only paths given on the \
             command line are checked against each other, so the actual {} may still \
             conflict with existing files",
            strings.plan_verb
        );

        Self::command()
            .name(strings.name)
            .bin_name(strings.name)
            .about(strings.about)
            .mut_arg("plan", |arg| arg.help(plan_help))
    }
}
