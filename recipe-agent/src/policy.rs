// ABOUTME: enforces the program allow-list and the working-directory sandbox before each step runs.
// ABOUTME: both limits are plain values handed to the executor so tests can swap them out.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::error::AgentError;

pub const DEFAULT_ALLOWED_PROGRAMS: &[&str] = &[
    // package managers
    "brew", "apt", "winget", "sudo",
    // common tools
    "git", "bash", "php", "composer", "node", "npm", "sqlite3", "ls", "pwd",
    // docker recipes
    "docker",
];

#[derive(Debug, Clone)]
pub struct AllowList {
    programs: BTreeSet<String>,
}

impl AllowList {
    pub fn new<I, S>(programs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            programs: programs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, program: &str) -> bool {
        self.programs.contains(program)
    }

    /// Only the executable name is checked; arguments pass through untouched.
    pub fn check(&self, command: &str) -> Result<String, AgentError> {
        self.admit(command_program(command)?)
    }

    fn admit(&self, program: String) -> Result<String, AgentError> {
        if !self.contains(&program) {
            return Err(AgentError::CommandRejected {
                program,
                reason: "not on allow-list",
            });
        }
        Ok(program)
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_PROGRAMS.iter().copied())
    }
}

pub fn command_program(command: &str) -> Result<String, AgentError> {
    let tokens = shlex::split(command).ok_or_else(|| AgentError::CommandRejected {
        program: command.to_string(),
        reason: "unbalanced quoting",
    })?;

    tokens
        .into_iter()
        .next()
        .ok_or_else(|| AgentError::CommandRejected {
            program: command.to_string(),
            reason: "empty command",
        })
}

#[derive(Debug, Clone)]
pub struct Sandbox {
    root: PathBuf,
}

impl Sandbox {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Relative candidates are taken from the sandbox root. Both sides are
    /// canonicalized, so symlinks cannot smuggle a step outside.
    pub fn resolve(&self, cwd: &str) -> Result<PathBuf, AgentError> {
        let candidate = self.root.join(cwd);
        let violation = || AgentError::PathViolation {
            path: candidate.clone(),
            root: self.root.clone(),
        };

        let base = std::fs::canonicalize(&self.root).map_err(|_| violation())?;
        let target = std::fs::canonicalize(&candidate).map_err(|_| violation())?;

        if target == base || target.starts_with(&base) {
            Ok(target)
        } else {
            Err(violation())
        }
    }
}

#[derive(Debug, Clone)]
pub struct Policy {
    pub allow_list: AllowList,
    pub sandbox: Sandbox,
}

impl Policy {
    pub fn new(allow_list: AllowList, sandbox: Sandbox) -> Self {
        Self {
            allow_list,
            sandbox,
        }
    }

    /// Returns the directory the step must run in.
    pub fn check_step(&self, command: &str, cwd: &str) -> Result<PathBuf, AgentError> {
        let program = command_program(command)?;
        let dir = self.sandbox.resolve(cwd)?;
        self.allow_list.admit(program)?;
        Ok(dir)
    }
}
