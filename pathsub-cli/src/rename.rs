use anyhow::Result;
use pathsub_core::{rename_operation, CommitOptions, MapperOptions, OutputFormatter};
use std::path::PathBuf;

use crate::OutputFormat;

/// Commit the batch and return the commit result's exit code.
pub fn handle_rename(
    options: &MapperOptions,
    paths: &[PathBuf],
    trial: bool,
    output: OutputFormat,
) -> Result<i32> {
    let result = rename_operation(options, paths, CommitOptions { trial })?;

    match output {
        OutputFormat::Json => println!("{}", result.format_json()),
        OutputFormat::Summary => {
            let summary = result.format_summary();
            if result.result.is_success() {
                tracing::info!("{}", summary.trim_end());
            } else {
                tracing::error!("{}", summary.trim_end());
            }
        },
    }

    Ok(result.exit_code())
}
