use crate::agent::{Agent, Executive};
use crate::commit::{commit_with, CommitOptions};
use crate::output::RenameResult;
use crate::pattern::{MapperOptions, PathMapper};
use std::path::PathBuf;

/// Rename operation - performs the substitution as a single transaction
pub fn rename_operation(
    options: &MapperOptions,
    paths: &[PathBuf],
    commit_options: CommitOptions,
) -> anyhow::Result<RenameResult> {
    rename_operation_with(Executive::new(), options, paths, commit_options)
}

/// Same as [`rename_operation`], running every filesystem call through `agent`.
pub fn rename_operation_with<A: Agent>(
    agent: A,
    options: &MapperOptions,
    paths: &[PathBuf],
    commit_options: CommitOptions,
) -> anyhow::Result<RenameResult> {
    let mapper = PathMapper::new(options)?;
    let report = commit_with(agent, |path| mapper.map_path(path), paths, commit_options);

    Ok(RenameResult {
        search: options.search.clone(),
        replace: options.replace.clone(),
        result: report.result,
        moves: report.moves,
        trial: report.trial,
    })
}
