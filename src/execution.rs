use crate::logging::{log_event, LogCategory, LogLevel};
use anyhow::Result;
use std::env;
use std::path::PathBuf;
use std::process::Command;

/// Outcome of dispatching one generated command.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    /// Empty command, nothing executed
    Skipped,
    /// In-process directory change succeeded
    ChangedDirectory(PathBuf),
    /// Directory-change target does not exist; the shell was never invoked
    DirectoryNotFound(String),
    /// Command handed to the shell; carries the shell's exit code
    Completed(i32),
}

#[allow(dead_code)]
impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        match self {
            ExecutionOutcome::Skipped => true,
            ExecutionOutcome::ChangedDirectory(_) => true,
            ExecutionOutcome::DirectoryNotFound(_) => false,
            ExecutionOutcome::Completed(code) => *code == 0,
        }
    }
}

/// Dispatch a generated command string.
///
/// `cd` gets an in-process special case: a child shell cannot change this
/// process's working directory, so a persistent directory change has to be
/// applied with `env::set_current_dir`. Everything else goes to the shell as
/// a single invocation, unparsed and unvalidated.
pub fn dispatch(command: &str) -> Result<ExecutionOutcome> {
    let command = command.trim();

    if command.is_empty() {
        return Ok(ExecutionOutcome::Skipped);
    }

    if let Some(target) = command.strip_prefix("cd ") {
        return Ok(change_directory(target.trim()));
    }

    let status = run_in_shell(command)?;
    log_event(
        LogLevel::Info,
        LogCategory::Execution,
        &format!("Shell invocation finished with status {}", status),
    );
    Ok(ExecutionOutcome::Completed(status))
}

fn change_directory(target: &str) -> ExecutionOutcome {
    match env::set_current_dir(target) {
        Ok(_) => {
            let new_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from(target));
            log_event(
                LogLevel::Info,
                LogCategory::Execution,
                "Working directory changed in-process",
            );
            ExecutionOutcome::ChangedDirectory(new_dir)
        }
        Err(_) => {
            log_event(
                LogLevel::Warning,
                LogCategory::Execution,
                "Directory-change target not found",
            );
            ExecutionOutcome::DirectoryNotFound(target.to_string())
        }
    }
}

fn run_in_shell(command: &str) -> Result<i32> {
    let status = if cfg!(target_os = "windows") {
        Command::new("cmd").args(["/C", command]).status()?
    } else {
        Command::new("sh").args(["-c", command]).status()?
    };

    Ok(status.code().unwrap_or(-1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_empty_command_is_skipped() {
        assert_eq!(dispatch("").unwrap(), ExecutionOutcome::Skipped);
        assert_eq!(dispatch("   \t ").unwrap(), ExecutionOutcome::Skipped);
    }

    #[test]
    fn test_missing_directory_reports_not_found() {
        let outcome = dispatch("cd /does/not/exist").unwrap();
        assert_eq!(
            outcome,
            ExecutionOutcome::DirectoryNotFound("/does/not/exist".to_string())
        );
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_directory_change_applies_in_process() {
        let original = env::current_dir().unwrap();
        let dir = tempdir().unwrap();
        let target = dir.path().canonicalize().unwrap();

        let outcome = dispatch(&format!("cd {}", target.display())).unwrap();

        match outcome {
            ExecutionOutcome::ChangedDirectory(new_dir) => {
                assert_eq!(new_dir.canonicalize().unwrap(), target);
            }
            other => panic!("Expected ChangedDirectory, got {:?}", other),
        }

        env::set_current_dir(original).unwrap();
    }

    #[test]
    fn test_shell_invocation_reports_exit_status() {
        let outcome = dispatch("true").unwrap();
        assert_eq!(outcome, ExecutionOutcome::Completed(0));
        assert!(outcome.is_success());

        let outcome = dispatch("exit 3").unwrap();
        assert_eq!(outcome, ExecutionOutcome::Completed(3));
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_skipped_counts_as_non_failure() {
        assert!(ExecutionOutcome::Skipped.is_success());
    }
}
