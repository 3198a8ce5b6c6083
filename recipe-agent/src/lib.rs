// ABOUTME: exposes the recipe agent's building blocks to its binary and tests.
// ABOUTME: step policy, shell execution, recipe runner, and the entry flow.

pub mod error;
pub mod exec;
pub mod flow;
pub mod journal;
pub mod policy;
pub mod runner;
pub mod ui;

pub use error::AgentError;
