use anyhow::Result;
use pathsub_core::{plan_operation, MapperOptions, OutputFormatter};
use std::path::PathBuf;

use crate::OutputFormat;

/// Print the plan and return the exit code: 0 when conflict free, 1 otherwise.
pub fn handle_plan(
    options: &MapperOptions,
    paths: &[PathBuf],
    output: OutputFormat,
    use_color: Option<bool>,
) -> Result<i32> {
    let use_color = if output == OutputFormat::Json {
        Some(false)
    } else {
        use_color
    };

    let result = plan_operation(options, paths, use_color)?;

    print!("{}", result.format(output.into()));
    if output == OutputFormat::Json {
        println!();
    }

    Ok(result.exit_code())
}
