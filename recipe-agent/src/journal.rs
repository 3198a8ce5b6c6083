// ABOUTME: appends one json line per recipe run to an operator-chosen journal file.
// ABOUTME: records what ran, where it ran, and how the run ended.

use std::path::Path;

use anyhow::Context;
use recipe_common::OsId;
use serde::Serialize;

use crate::error::AgentError;
use crate::runner::{RunReport, StepReport};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Completed,
    Failed,
}

#[derive(Debug, Serialize)]
#[serde(deny_unknown_fields)]
pub struct JournalRecord<'a> {
    pub ts_unix_ms: u64,
    pub recipe: &'a str,
    pub os: OsId,
    pub outcome: RunOutcome,
    pub exit_code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub steps: &'a [StepReport],
}

impl<'a> JournalRecord<'a> {
    pub fn from_result(
        ts_unix_ms: u64,
        recipe: &'a str,
        os: OsId,
        result: &'a Result<RunReport, AgentError>,
    ) -> Self {
        match result {
            Ok(report) => Self {
                ts_unix_ms,
                recipe,
                os,
                outcome: RunOutcome::Completed,
                exit_code: 0,
                error: None,
                steps: &report.steps,
            },
            Err(err) => Self {
                ts_unix_ms,
                recipe,
                os,
                outcome: RunOutcome::Failed,
                exit_code: err.exit_code(),
                error: Some(err.to_string()),
                steps: &[],
            },
        }
    }
}

pub async fn append_record(journal_path: &Path, record: &JournalRecord<'_>) -> anyhow::Result<()> {
    let mut line = serde_json::to_vec(record)?;
    line.push(b'\n');

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(journal_path)
        .await
        .with_context(|| format!("open journal at {}", journal_path.display()))?;

    use tokio::io::AsyncWriteExt;
    file.write_all(&line).await?;
    file.flush().await?;
    Ok(())
}

pub fn now_unix_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
