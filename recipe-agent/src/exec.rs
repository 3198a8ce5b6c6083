// ABOUTME: runs one step command through the platform shell and waits for it to exit.
// ABOUTME: stdio is inherited so package managers can prompt the operator directly.

use std::path::Path;
use std::process::ExitStatus;

use tokio::process::Command;

use crate::error::AgentError;

#[cfg(not(windows))]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

/// Zero on success; a non-zero status becomes `CommandFailed`.
pub async fn run(command: &str, cwd: &Path) -> Result<(), AgentError> {
    let mut cmd = shell_command(command);
    cmd.current_dir(cwd);

    let status = cmd.status().await.map_err(|source| AgentError::Spawn {
        command: command.to_string(),
        source,
    })?;

    if status.success() {
        return Ok(());
    }

    Err(AgentError::CommandFailed {
        command: command.to_string(),
        code: exit_code(&status),
    })
}

pub fn exit_code(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn zero_exit_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        run("true", dir.path()).await.unwrap();
    }

    #[tokio::test]
    async fn non_zero_exit_carries_status() {
        let dir = tempfile::tempdir().unwrap();
        let err = run("exit 3", dir.path()).await.unwrap_err();
        match err {
            AgentError::CommandFailed { command, code } => {
                assert_eq!(command, "exit 3");
                assert_eq!(code, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn runs_inside_requested_directory() {
        let dir = tempfile::tempdir().unwrap();
        run("pwd > where.txt", dir.path()).await.unwrap();

        let recorded = std::fs::read_to_string(dir.path().join("where.txt")).unwrap();
        let expected = std::fs::canonicalize(dir.path()).unwrap();
        assert_eq!(std::fs::canonicalize(recorded.trim()).unwrap(), expected);
    }

    #[tokio::test]
    async fn missing_directory_is_a_spawn_fault() {
        let dir = tempfile::tempdir().unwrap();
        let err = run("true", &dir.path().join("gone")).await.unwrap_err();
        assert!(matches!(err, AgentError::Spawn { .. }));
    }

    #[tokio::test]
    async fn signal_termination_maps_above_128() {
        let dir = tempfile::tempdir().unwrap();
        let err = run("kill -TERM $$", dir.path()).await.unwrap_err();
        assert_eq!(err.exit_code(), 128 + 15);
    }
}
