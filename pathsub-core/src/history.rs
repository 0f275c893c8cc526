use crate::agent::Agent;
use crate::error::{NonCriticalError, RollbackError};
use crate::operation::Operation;
use std::io;
use std::path::Path;

/// Agent decorator that records how to undo everything it does.
///
/// Each successful forward call pushes its inverse onto an undo log, and
/// [`HistoryAgent::rollback`] replays that log from the tail. The log is
/// strictly LIFO: later operations may depend on state set up by earlier
/// ones (a file moved into a freshly created directory has to leave before
/// the directory can go).
#[derive(Debug)]
pub struct HistoryAgent<A: Agent> {
    delegate: A,
    undo: Vec<Operation>,
}

impl<A: Agent> HistoryAgent<A> {
    pub fn new(delegate: A) -> Self {
        Self {
            delegate,
            undo: Vec::new(),
        }
    }

    /// Pending undo operations, oldest first.
    pub fn undo_log(&self) -> &[Operation] {
        &self.undo
    }

    pub fn into_inner(self) -> A {
        self.delegate
    }

    fn execute_logged(&mut self, operation: Operation) -> io::Result<()> {
        let undo = operation.invert();
        operation.apply(&mut self.delegate)?;
        self.undo.push(undo);
        Ok(())
    }

    /// Undo every recorded operation, most recent first.
    ///
    /// Failing to remove a directory is tolerated and reported in the
    /// returned list. Any other failure stops the rollback: the failed
    /// operation goes back on the log and the error lists everything still
    /// pending, so calling `rollback` again retries from the same point.
    pub fn rollback(&mut self) -> Result<Vec<NonCriticalError>, RollbackError> {
        let mut non_critical = Vec::new();

        while let Some(operation) = self.undo.pop() {
            tracing::debug!("undo: {}", operation);

            match operation.apply(&mut self.delegate) {
                Ok(()) => {},
                Err(error) => {
                    if let Operation::RemoveDir { path } = operation {
                        tracing::debug!("Could not remove {}: {}", path.display(), error);
                        non_critical.push(NonCriticalError { path, error });
                        continue;
                    }

                    self.undo.push(operation.clone());
                    return Err(RollbackError {
                        failed: operation,
                        source: error,
                        remaining_operations: self.undo.iter().rev().cloned().collect(),
                    });
                },
            }
        }

        Ok(non_critical)
    }
}

impl<A: Agent> Agent for HistoryAgent<A> {
    fn move_path(&mut self, src: &Path, dest: &Path) -> io::Result<()> {
        self.execute_logged(Operation::move_path(src, dest))
    }

    fn create_dir(&mut self, path: &Path) -> io::Result<()> {
        self.execute_logged(Operation::create_dir(path))
    }

    fn remove_dir(&mut self, path: &Path) -> io::Result<()> {
        self.execute_logged(Operation::remove_dir(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Executive;
    use std::fs;
    use tempfile::TempDir;

    const CONTENT_1: &str = "Test fixture 1 TTLOmpmgPPeblKWrXhvmn0Bz1wPf67ZUFTk";
    const CONTENT_2: &str = "Test fixture 2 kYtSpdv1OMSyF4MRvww3dPBURBRhDNxfCb";

    #[test]
    fn test_full_rollback() {
        let temp_dir = TempDir::new().unwrap();
        let start = temp_dir.path().join("start");
        let container = temp_dir.path().join("container");
        let end = container.join("end");
        fs::write(&start, CONTENT_1).unwrap();

        let mut history = HistoryAgent::new(Executive);
        history.create_dir(&container).unwrap();
        history.move_path(&start, &end).unwrap();

        assert!(!start.exists());
        assert_eq!(fs::read_to_string(&end).unwrap(), CONTENT_1);
        assert_eq!(history.undo_log().len(), 2);

        let errors = history.rollback().unwrap();

        assert!(errors.is_empty());
        assert!(history.undo_log().is_empty());
        assert_eq!(fs::read_to_string(&start).unwrap(), CONTENT_1);
        assert!(!container.exists());
    }

    #[test]
    fn test_failed_forward_call_is_not_logged() {
        let temp_dir = TempDir::new().unwrap();
        let start = temp_dir.path().join("start");
        let container = temp_dir.path().join("container");
        let intermediate = container.join("intermediate");
        let end = container.join("end");
        fs::write(&start, CONTENT_1).unwrap();
        fs::create_dir(&container).unwrap();
        fs::write(&end, CONTENT_2).unwrap();

        let mut history = HistoryAgent::new(Executive);
        history.move_path(&start, &intermediate).unwrap();
        let err = history.move_path(&intermediate, &end).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(history.undo_log().len(), 1);

        history.rollback().unwrap();

        assert_eq!(fs::read_to_string(&start).unwrap(), CONTENT_1);
        assert_eq!(fs::read_to_string(&end).unwrap(), CONTENT_2);
        assert!(!intermediate.exists());
    }

    #[test]
    fn test_file_swap_rolls_back() {
        let temp_dir = TempDir::new().unwrap();
        let file1 = temp_dir.path().join("foo");
        let file2 = temp_dir.path().join("bar");
        let intermediate = temp_dir.path().join("intermediate");
        fs::write(&file1, CONTENT_1).unwrap();
        fs::write(&file2, CONTENT_2).unwrap();

        let mut history = HistoryAgent::new(Executive);
        history.move_path(&file1, &intermediate).unwrap();
        history.move_path(&file2, &file1).unwrap();
        history.move_path(&intermediate, &file2).unwrap();

        assert_eq!(fs::read_to_string(&file1).unwrap(), CONTENT_2);
        assert_eq!(fs::read_to_string(&file2).unwrap(), CONTENT_1);

        history.rollback().unwrap();

        assert_eq!(fs::read_to_string(&file1).unwrap(), CONTENT_1);
        assert_eq!(fs::read_to_string(&file2).unwrap(), CONTENT_2);
    }

    #[test]
    fn test_rmdir_failure_is_non_critical() {
        let temp_dir = TempDir::new().unwrap();
        let start = temp_dir.path().join("start");
        let container = temp_dir.path().join("container");
        let end = container.join("end");
        fs::write(&start, CONTENT_1).unwrap();

        let mut history = HistoryAgent::new(Executive);
        history.create_dir(&container).unwrap();
        history.move_path(&start, &end).unwrap();

        // A file the history agent doesn't know about keeps `container` alive
        fs::write(container.join("blocker"), CONTENT_2).unwrap();

        let errors = history.rollback().unwrap();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, container);
        assert!(history.undo_log().is_empty());
        assert!(!end.exists());
        assert_eq!(fs::read_to_string(&start).unwrap(), CONTENT_1);
    }

    #[test]
    fn test_critical_failure_reports_remaining_operations() {
        let temp_dir = TempDir::new().unwrap();
        let start = temp_dir.path().join("start");
        let intermediate = temp_dir.path().join("intermediate");
        let end = temp_dir.path().join("end");
        fs::write(&start, CONTENT_1).unwrap();

        let mut history = HistoryAgent::new(Executive);
        history.move_path(&start, &intermediate).unwrap();
        history.move_path(&intermediate, &end).unwrap();

        // Block the first undo step
        fs::write(&intermediate, CONTENT_2).unwrap();

        let err = history.rollback().unwrap_err();
        assert_eq!(err.failed, Operation::move_path(&end, &intermediate));
        assert_eq!(err.source.kind(), io::ErrorKind::AlreadyExists);

        // The log survives, so a second attempt reports the same thing
        let err = history.rollback().unwrap_err();
        assert_eq!(
            err.remaining_operations,
            vec![
                Operation::move_path(&end, &intermediate),
                Operation::move_path(&intermediate, &start),
            ]
        );
        assert_eq!(err.recovery_script().lines().count(), 2);
    }

    #[test]
    fn test_rollback_on_empty_log() {
        let mut history = HistoryAgent::new(Executive);
        assert!(history.rollback().unwrap().is_empty());
    }
}
