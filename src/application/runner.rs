//! Execution of runnable samples in isolated child processes.
//!
//! Every run spawns a fresh process with a null stdin and piped stdout/stderr.
//! On unix the child leads its own process group, and the whole group is
//! killed once the run ends on any path, so processes the sample started
//! itself do not outlive it either. Elsewhere only the direct child is killed.

use std::{
    io::ErrorKind,
    path::PathBuf,
    process::Stdio,
    time::{Duration, Instant},
};

use serde::Serialize;
use thiserror::Error;
use tokio::process::Command;
use tracing::{info, warn};

use crate::domain::items::RunTarget;

/// Stderr is truncated to this many bytes in error reports.
const STDERR_EXCERPT_LIMIT: usize = 2048;
pub const DEFAULT_RUN_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExecutionError {
    #[error("failed to start `{program}`: {message}")]
    Spawn { program: String, message: String },
    #[error("exited with status {}: {stderr}", status_label(.exit_code))]
    NonZeroExit {
        exit_code: Option<i32>,
        stderr: String,
    },
    #[error("timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },
}

fn status_label(exit_code: &Option<i32>) -> String {
    exit_code.map_or_else(|| "signal".to_string(), |code| code.to_string())
}

/// Runs samples with a bounded wait.
#[derive(Debug, Clone)]
pub struct ExampleRunner {
    program: PathBuf,
    timeout: Duration,
    concurrency: usize,
}

impl ExampleRunner {
    /// `program` is the executable that understands `demo <name>`; usually the
    /// current binary.
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
            concurrency: DEFAULT_RUN_CONCURRENCY,
        }
    }

    /// Upper bound on samples executing at the same time; at least one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Execute `target` and return everything it printed to stdout.
    pub async fn run(&self, target: &RunTarget) -> Result<String, ExecutionError> {
        let started_at = Instant::now();
        let (program, args) = self.command_line(target);

        let mut command = Command::new(&program);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        command.process_group(0);

        let outcome = match command.spawn() {
            Ok(child) => {
                let _group = ProcessGroupGuard::new(child.id());
                tokio::time::timeout(self.timeout, child.wait_with_output()).await
            }
            Err(err) => Ok(Err(err)),
        };
        let elapsed_ms = started_at.elapsed().as_millis() as u64;

        let output = match outcome {
            Err(_) => {
                let timeout_ms = self.timeout.as_millis() as u64;
                warn!(
                    target = "lessonbook::runner",
                    op = "runner::run",
                    result = "timeout",
                    run_target = %target,
                    elapsed_ms,
                    timeout_ms,
                    "Example exceeded its time limit"
                );
                return Err(ExecutionError::Timeout { timeout_ms });
            }
            Ok(Err(err)) => {
                warn!(
                    target = "lessonbook::runner",
                    op = "runner::run",
                    result = "error",
                    run_target = %target,
                    elapsed_ms,
                    error_code = "spawn",
                    error = %err,
                    "Failed to spawn example"
                );
                let message = if err.kind() == ErrorKind::NotFound {
                    "program not found".to_string()
                } else {
                    err.to_string()
                };
                return Err(ExecutionError::Spawn {
                    program: program.display().to_string(),
                    message,
                });
            }
            Ok(Ok(output)) => output,
        };

        if !output.status.success() {
            let exit_code = output.status.code();
            let stderr = excerpt(&String::from_utf8_lossy(&output.stderr));
            warn!(
                target = "lessonbook::runner",
                op = "runner::run",
                result = "error",
                run_target = %target,
                elapsed_ms,
                exit_code = exit_code.map(i64::from).unwrap_or(-1),
                error_code = "exit_status",
                stderr = %stderr,
                "Example exited unsuccessfully"
            );
            return Err(ExecutionError::NonZeroExit { exit_code, stderr });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        info!(
            target = "lessonbook::runner",
            op = "runner::run",
            result = "ok",
            run_target = %target,
            elapsed_ms,
            stdout_bytes = stdout.len(),
            "Example ran"
        );
        Ok(stdout)
    }

    fn command_line(&self, target: &RunTarget) -> (PathBuf, Vec<String>) {
        match target {
            RunTarget::Demo(name) => (self.program.clone(), vec!["demo".to_string(), name.clone()]),
            RunTarget::Command(argv) => {
                let program = argv.first().cloned().unwrap_or_default();
                (PathBuf::from(program), argv.iter().skip(1).cloned().collect())
            }
        }
    }
}

/// Kills the process group led by a spawned child when dropped.
#[cfg(unix)]
struct ProcessGroupGuard(Option<nix::unistd::Pid>);

#[cfg(unix)]
impl ProcessGroupGuard {
    fn new(child_id: Option<u32>) -> Self {
        Self(
            child_id
                .and_then(|id| i32::try_from(id).ok())
                .map(nix::unistd::Pid::from_raw),
        )
    }
}

#[cfg(unix)]
impl Drop for ProcessGroupGuard {
    fn drop(&mut self) {
        if let Some(group) = self.0 {
            // ESRCH: every member has already exited.
            let _ = nix::sys::signal::killpg(group, nix::sys::signal::Signal::SIGKILL);
        }
    }
}

#[cfg(not(unix))]
struct ProcessGroupGuard;

#[cfg(not(unix))]
impl ProcessGroupGuard {
    fn new(_child_id: Option<u32>) -> Self {
        Self
    }
}

fn excerpt(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.len() <= STDERR_EXCERPT_LIMIT {
        return trimmed.to_string();
    }
    let mut end = STDERR_EXCERPT_LIMIT;
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &trimmed[..end])
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn shell(script: &str) -> RunTarget {
        RunTarget::Command(vec!["sh".into(), "-c".into(), script.into()])
    }

    fn runner(timeout_ms: u64) -> ExampleRunner {
        ExampleRunner::new("/nonexistent/lessonbook", Duration::from_millis(timeout_ms))
    }

    #[tokio::test]
    async fn captures_stdout() {
        let output = runner(5_000)
            .run(&shell("echo medium; echo true"))
            .await
            .expect("command succeeds");
        assert_eq!(output, "medium\ntrue\n");
    }

    #[tokio::test]
    async fn surfaces_exit_code_and_stderr() {
        let err = runner(5_000)
            .run(&shell("echo boom >&2; exit 42"))
            .await
            .expect_err("command fails");
        assert_eq!(
            err,
            ExecutionError::NonZeroExit {
                exit_code: Some(42),
                stderr: "boom".to_string()
            }
        );
    }

    #[tokio::test]
    async fn times_out_hung_examples() {
        let started = Instant::now();
        let err = runner(200)
            .run(&shell("sleep 10"))
            .await
            .expect_err("command times out");
        assert_eq!(err, ExecutionError::Timeout { timeout_ms: 200 });
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn timeout_also_stops_processes_started_by_the_sample() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let marker = dir.path().join("marker");
        let script = format!(
            "sh -c 'sleep 1.5; touch \"{}\"'; true",
            marker.display()
        );

        let err = runner(300)
            .run(&shell(&script))
            .await
            .expect_err("command times out");
        assert_eq!(err, ExecutionError::Timeout { timeout_ms: 300 });

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert!(!marker.exists(), "nested process kept running after the timeout");
    }

    #[tokio::test]
    async fn background_processes_do_not_outlive_a_successful_run() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let marker = dir.path().join("marker");
        let script = format!(
            "(sleep 1; touch \"{}\") >/dev/null 2>&1 & echo started",
            marker.display()
        );

        let output = runner(5_000)
            .run(&shell(&script))
            .await
            .expect("command succeeds");
        assert_eq!(output, "started\n");

        tokio::time::sleep(Duration::from_millis(2_000)).await;
        assert!(!marker.exists(), "background process kept running after the run");
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let err = runner(5_000)
            .run(&RunTarget::Demo("builder".into()))
            .await
            .expect_err("program missing");
        assert!(matches!(err, ExecutionError::Spawn { .. }), "{err:?}");
    }

    #[test]
    fn long_stderr_is_truncated() {
        let long = "é".repeat(STDERR_EXCERPT_LIMIT);
        let cut = excerpt(&long);
        assert!(cut.len() <= STDERR_EXCERPT_LIMIT + '…'.len_utf8());
        assert!(cut.ends_with('…'));
    }
}
