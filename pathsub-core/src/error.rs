use crate::operation::{quote, Operation};
use std::fmt::Write;
use std::io;
use std::path::PathBuf;

/// A single move in the batch failed; the whole commit has to be rolled back.
#[derive(Debug, thiserror::Error)]
#[error("Failed to move {} to {}: {source}", quote(.src), quote(.target))]
pub struct CommitError {
    pub src: PathBuf,
    pub target: PathBuf,
    #[source]
    pub source: io::Error,
}

impl CommitError {
    pub fn new(src: impl Into<PathBuf>, target: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            src: src.into(),
            target: target.into(),
            source,
        }
    }
}

/// Rollback stopped on an operation it could not undo.
///
/// `remaining_operations` is what a human has to run by hand to finish
/// restoring the original state, next-to-undo first. The failed operation
/// itself is the first entry.
#[derive(Debug, thiserror::Error)]
#[error("Rollback failed at `{failed}`: {source}")]
pub struct RollbackError {
    pub failed: Operation,
    #[source]
    pub source: io::Error,
    pub remaining_operations: Vec<Operation>,
}

impl RollbackError {
    /// Render the manual-recovery script, one command per line.
    pub fn recovery_script(&self) -> String {
        let mut script = String::new();
        for operation in &self.remaining_operations {
            let _ = writeln!(script, "{}", operation);
        }
        script
    }
}

/// A directory created during the batch that could not be removed again.
///
/// Never raised, only reported: the filesystem keeps an extra directory
/// but nothing is lost.
#[derive(Debug)]
pub struct NonCriticalError {
    pub path: PathBuf,
    pub error: io::Error,
}
