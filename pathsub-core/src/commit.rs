use crate::agent::{Agent, Executive};
use crate::error::CommitError;
use crate::history::HistoryAgent;
use crate::operation::{quote, Operation};
use crate::plan::PlannedMove;
use serde::Serialize;
use std::collections::HashSet;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

/// Inserted between a file's stem and extension to build a temporary name.
pub const TEMP_MARKER: &str = "__submv";

/// How many fresh temporary names to try before giving up on a deferral.
const TEMP_NAME_ATTEMPTS: usize = 8;

/// Terminal state of one commit. The discriminants double as exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum CommitResult {
    Success = 0,
    FailedWithSuccessfulRollback = 1,
    FailedWithNoncriticalRollback = 2,
    FailedWithFailedRollback = 3,
}

impl CommitResult {
    pub fn exit_code(self) -> i32 {
        i32::from(self as u8)
    }

    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CommitOptions {
    /// Perform every move, then roll the whole batch back regardless.
    pub trial: bool,
}

/// A move that found its target occupied and is waiting, under a temporary
/// name, for the target to be vacated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredMove {
    pub src_path: PathBuf,
    pub temp_path: PathBuf,
    pub target_path: PathBuf,
}

/// What a commit did, for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct CommitReport {
    pub result: CommitResult,
    /// Moves that completed during the forward pass. After a rollback
    /// none of them are in effect any more.
    pub moves: Vec<PlannedMove>,
    pub trial: bool,
}

/// Build a temporary name next to `path`: same directory, same extension,
/// with [`TEMP_MARKER`] and a short random token after the stem.
///
/// `foo.txt` becomes `foo__submv1a2b3c4d.txt`; a hidden file such as
/// `.foo` keeps its whole name as the stem.
pub fn generate_temp_name(path: &Path) -> PathBuf {
    let token = uuid::Uuid::new_v4().simple().to_string();
    let token = &token[..8];

    let Some(stem) = path.file_stem() else {
        let mut name = path.as_os_str().to_os_string();
        name.push(TEMP_MARKER);
        name.push(token);
        return PathBuf::from(name);
    };

    let mut name = OsString::from(stem);
    name.push(TEMP_MARKER);
    name.push(token);
    if let Some(extension) = path.extension() {
        name.push(".");
        name.push(extension);
    }

    path.with_file_name(name)
}

/// Create every missing ancestor directory of `target`, outermost first, so
/// each creation is recorded (and undone) individually.
pub fn ensure_dir_for<A: Agent + ?Sized>(target: &Path, agent: &mut A) -> io::Result<()> {
    let mut missing = Vec::new();
    let mut ancestor = target.parent();

    while let Some(dir) = ancestor {
        if dir.as_os_str().is_empty() || dir.exists() {
            break;
        }
        missing.push(dir);
        ancestor = dir.parent();
    }

    for dir in missing.into_iter().rev() {
        agent.create_dir(dir)?;
    }

    Ok(())
}

fn move_to_temp<A: Agent + ?Sized>(agent: &mut A, src: &Path) -> io::Result<PathBuf> {
    let mut attempts = 1;
    loop {
        let temp = generate_temp_name(src);
        match agent.move_path(src, &temp) {
            Ok(()) => return Ok(temp),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists && attempts < TEMP_NAME_ATTEMPTS => {
                attempts += 1;
            },
            Err(err) => return Err(err),
        }
    }
}

/// Move every path to `map_path(path)` through `agent` (normally a
/// [`HistoryAgent`], so the caller can roll back on error).
///
/// A move whose target is occupied is parked under a temporary name and
/// finished after all direct moves, which is what lets swaps and longer
/// rename cycles go through. Any other failure stops the batch at once.
pub fn perform_moves<F, I, P, A>(
    map_path: F,
    paths: I,
    agent: &mut A,
) -> Result<Vec<PlannedMove>, CommitError>
where
    F: Fn(&Path) -> PathBuf,
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
    A: Agent + ?Sized,
{
    let mut completed = Vec::new();
    let mut deferred = Vec::new();
    let mut seen = HashSet::new();

    for path in paths {
        let src = path.as_ref();
        if !seen.insert(src.as_os_str().to_os_string()) {
            continue;
        }

        let target = map_path(src);
        if target.as_os_str() == src.as_os_str() {
            tracing::debug!("{}: no change", quote(src));
            continue;
        }

        ensure_dir_for(&target, agent).map_err(|err| CommitError::new(src, &target, err))?;

        match agent.move_path(src, &target) {
            Ok(()) => {
                tracing::info!("{}", Operation::move_path(src, &target));
                completed.push(PlannedMove {
                    src: src.to_path_buf(),
                    dest: target,
                });
            },
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                let temp_path =
                    move_to_temp(agent, src).map_err(|err| CommitError::new(src, &target, err))?;
                tracing::debug!(
                    "{} is occupied, deferring {} via {}",
                    quote(&target),
                    quote(src),
                    quote(&temp_path)
                );
                deferred.push(DeferredMove {
                    src_path: src.to_path_buf(),
                    temp_path,
                    target_path: target,
                });
            },
            Err(err) => return Err(CommitError::new(src, target, err)),
        }
    }

    for pending in deferred {
        agent
            .move_path(&pending.temp_path, &pending.target_path)
            .map_err(|err| CommitError::new(&pending.src_path, &pending.target_path, err))?;
        tracing::info!(
            "{}",
            Operation::move_path(&pending.src_path, &pending.target_path)
        );
        completed.push(PlannedMove {
            src: pending.src_path,
            dest: pending.target_path,
        });
    }

    Ok(completed)
}

/// Commit a batch against the real filesystem.
pub fn commit<F, I, P>(map_path: F, paths: I, options: CommitOptions) -> CommitResult
where
    F: Fn(&Path) -> PathBuf,
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    commit_with(Executive::new(), map_path, paths, options).result
}

/// Commit a batch through `agent`: all renames succeed, or everything that
/// was done is rolled back.
pub fn commit_with<A, F, I, P>(agent: A, map_path: F, paths: I, options: CommitOptions) -> CommitReport
where
    A: Agent,
    F: Fn(&Path) -> PathBuf,
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut history = HistoryAgent::new(agent);

    let (moves, result) = match perform_moves(map_path, paths, &mut history) {
        Ok(moves) if !options.trial => (moves, CommitResult::Success),
        Ok(moves) => {
            tracing::info!("\nTrial mode. Rolling back...");
            (moves, finish_rollback(&mut history, CommitResult::Success))
        },
        Err(err) => {
            tracing::error!("{}", err);
            tracing::error!("\nErrors occurred. Rolling back...");
            (
                Vec::new(),
                finish_rollback(&mut history, CommitResult::FailedWithSuccessfulRollback),
            )
        },
    };

    CommitReport {
        result,
        moves,
        trial: options.trial,
    }
}

fn finish_rollback<A: Agent>(history: &mut HistoryAgent<A>, if_clean: CommitResult) -> CommitResult {
    match history.rollback() {
        Ok(errors) if errors.is_empty() => {
            tracing::info!("Rollback complete");
            if_clean
        },
        Ok(errors) => {
            tracing::warn!("Rollback complete, but some created directories could not be removed:");
            for error in &errors {
                tracing::warn!("  {}: {}", quote(&error.path), error.error);
            }
            CommitResult::FailedWithNoncriticalRollback
        },
        Err(err) => {
            tracing::error!("Error while rolling back - incomplete commands follow.");
            tracing::error!("# The first command listed failed with: {}", err.source);
            tracing::error!("{}", err.recovery_script().trim_end());
            tracing::error!("# End incomplete commands");
            CommitResult::FailedWithFailedRollback
        },
    }
}
