//! Bounded external command execution.
//!
//! Every external tool the host drives (`osascript`, `xdotool`, `wpctl`)
//! goes through [`ProcessRunner::run`], which enforces the configured
//! timeout.  A child that overruns is killed, not orphaned.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::application::selector::BackendError;

/// Runs external programs with a per-invocation timeout.
#[derive(Debug, Clone, Copy)]
pub struct ProcessRunner {
    timeout: Duration,
}

impl ProcessRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs `program` with `args` and waits for it to exit successfully.
    ///
    /// # Errors
    ///
    /// - [`BackendError::Spawn`] if the program could not be started.
    /// - [`BackendError::TimedOut`] if it ran longer than the timeout.
    /// - [`BackendError::ExitStatus`] if it exited unsuccessfully.
    pub async fn run<S: AsRef<str>>(&self, program: &str, args: &[S]) -> Result<(), BackendError> {
        debug!(program, argc = args.len(), "running external command");

        let child = Command::new(program)
            .args(args.iter().map(AsRef::as_ref))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| BackendError::Spawn {
                program: program.to_string(),
                source,
            })?;

        // Dropping the `wait_with_output` future on timeout drops the child,
        // and `kill_on_drop` kills it.
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| BackendError::TimedOut {
                program: program.to_string(),
                timeout: self.timeout,
            })?
            .map_err(|source| BackendError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(BackendError::ExitStatus {
                program: program.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_successful_command() {
        let runner = ProcessRunner::new(Duration::from_secs(5));
        assert_ok!(runner.run("true", &[] as &[&str]).await);
    }

    #[tokio::test]
    async fn test_failing_command_reports_exit_status() {
        let runner = ProcessRunner::new(Duration::from_secs(5));
        let result = runner.run("sh", &["-c", "echo nope >&2; exit 3"]).await;
        match result {
            Err(BackendError::ExitStatus { program, stderr, .. }) => {
                assert_eq!(program, "sh");
                assert_eq!(stderr, "nope");
            }
            other => panic!("expected ExitStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_a_spawn_error() {
        let runner = ProcessRunner::new(Duration::from_secs(5));
        let result = runner.run("definitely-not-a-real-program-xyz", &[] as &[&str]).await;
        assert!(matches!(result, Err(BackendError::Spawn { .. })));
    }

    #[tokio::test]
    async fn test_overrunning_command_times_out() {
        // Arrange
        let runner = ProcessRunner::new(Duration::from_millis(100));

        // Act
        let result = runner.run("sleep", &["5"]).await;

        // Assert
        let err = assert_err!(result);
        assert!(matches!(err, BackendError::TimedOut { .. }));
    }
}
