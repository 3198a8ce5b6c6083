// ABOUTME: drives one invocation: resolve the recipe name, confirm with the operator, run it.
// ABOUTME: unknown recipes and declined prompts end the invocation without running anything.

use std::io::Write;
use std::path::PathBuf;

use recipe_common::{load_recipe_book, OsId};

use crate::error::AgentError;
use crate::journal::{self, JournalRecord};
use crate::runner::{Executor, RunReport};
use crate::ui;

pub trait Confirmer {
    fn confirm(&mut self, prompt: &str) -> Result<bool, AgentError>;
}

/// Asks on the controlling terminal.
pub struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
    fn confirm(&mut self, prompt: &str) -> Result<bool, AgentError> {
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| AgentError::Prompt(e.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct Invocation {
    pub recipe: Option<String>,
    pub auto_confirm: bool,
    pub recipes_path: PathBuf,
    pub journal_path: Option<PathBuf>,
}

#[derive(Debug)]
pub enum Outcome {
    Completed(RunReport),
    Declined,
    UnknownRecipe(String),
}

pub async fn run(
    invocation: &Invocation,
    executor: &Executor,
    os: OsId,
    confirmer: &mut dyn Confirmer,
    out: &mut dyn Write,
) -> Result<Outcome, AgentError> {
    let name = match invocation.recipe.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_lowercase(),
        _ => return Err(AgentError::Usage),
    };

    let book = load_recipe_book(&invocation.recipes_path)?;
    tracing::debug!(recipes = book.len(), path = %invocation.recipes_path.display(), "loaded recipes");
    for (rejected, reason) in book.rejected() {
        tracing::warn!(recipe = rejected, %reason, "ignoring undecodable recipe");
    }

    if let Some(reason) = book.rejection(&name) {
        return Err(AgentError::InvalidRecipe {
            recipe: name,
            reason: reason.to_string(),
        });
    }

    if !book.contains(&name) {
        ui::unknown_recipe(out, &name, &invocation.recipes_path);
        return Ok(Outcome::UnknownRecipe(name));
    }

    ui::plan(out, &name, os);
    if !invocation.auto_confirm && !confirmer.confirm("Proceed?")? {
        tracing::info!(recipe = %name, "declined by operator");
        return Ok(Outcome::Declined);
    }

    let result = executor.run_recipe(&name, &book, os, out).await;

    if let Some(journal_path) = &invocation.journal_path {
        let record = JournalRecord::from_result(journal::now_unix_ms(), &name, os, &result);
        if let Err(err) = journal::append_record(journal_path, &record).await {
            tracing::warn!(error = %err, "journal write failed");
        }
    }

    result.map(Outcome::Completed)
}
