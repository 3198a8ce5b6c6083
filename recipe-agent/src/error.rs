// ABOUTME: defines the error kinds that abort a recipe run.
// ABOUTME: maps each kind to the process exit status reported by the agent.

use std::path::PathBuf;

use recipe_common::{OsId, RecipeFileError};

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("missing recipe name")]
    Usage,

    #[error("unknown recipe: {0}")]
    RecipeNotFound(String),

    #[error("recipe {recipe} isn't marked for os {os}")]
    OsMismatch { recipe: String, os: OsId },

    #[error("cwd outside sandbox: {path} (sandbox is {root})")]
    PathViolation { path: PathBuf, root: PathBuf },

    #[error("command not allowed ({reason}): {program}")]
    CommandRejected { program: String, reason: &'static str },

    #[error("`{command}` exited with status {code}")]
    CommandFailed { command: String, code: i32 },

    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    ConfigLoad(#[from] RecipeFileError),

    #[error("recipe {recipe} in the recipe file is invalid: {reason}")]
    InvalidRecipe { recipe: String, reason: String },

    #[error("confirmation prompt failed: {0}")]
    Prompt(String),

    #[error("cannot read launch directory: {0}")]
    LaunchDirectory(#[source] std::io::Error),
}

impl AgentError {
    /// A failed step hands its own status back to the caller; everything
    /// else is a generic failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            AgentError::CommandFailed { code, .. } => *code,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failure_propagates_child_status() {
        let err = AgentError::CommandFailed {
            command: "npm ci".to_string(),
            code: 42,
        };
        assert_eq!(err.exit_code(), 42);
    }

    #[test]
    fn other_errors_exit_one() {
        assert_eq!(AgentError::Usage.exit_code(), 1);
        assert_eq!(AgentError::RecipeNotFound("x".to_string()).exit_code(), 1);
        let rejected = AgentError::CommandRejected {
            program: "rm".to_string(),
            reason: "not on allow-list",
        };
        assert_eq!(rejected.exit_code(), 1);
        assert_eq!(rejected.to_string(), "command not allowed (not on allow-list): rm");
    }
}
