// ABOUTME: executes a named recipe step by step against the detected os.
// ABOUTME: stops at the first failing step; notes are only shown after every step succeeded.

use std::io::Write;
use std::path::PathBuf;

use recipe_common::{OsId, Recipe, RecipeBook};
use serde::Serialize;

use crate::error::AgentError;
use crate::exec;
use crate::policy::Policy;
use crate::ui;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Skipped,
    Succeeded,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StepReport {
    pub index: usize,
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
    pub status: StepStatus,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RunReport {
    pub recipe: String,
    pub os: OsId,
    pub steps: Vec<StepReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl RunReport {
    pub fn executed(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|s| s.status == StepStatus::Succeeded)
    }
}

#[derive(Debug, Clone)]
pub struct Executor {
    policy: Policy,
}

impl Executor {
    pub fn new(policy: Policy) -> Self {
        Self { policy }
    }

    pub async fn run_recipe(
        &self,
        name: &str,
        book: &RecipeBook,
        target_os: OsId,
        out: &mut dyn Write,
    ) -> Result<RunReport, AgentError> {
        let recipe = book
            .get(name)
            .ok_or_else(|| AgentError::RecipeNotFound(name.to_string()))?;

        if !recipe.targets(target_os) {
            return Err(AgentError::OsMismatch {
                recipe: name.to_string(),
                os: target_os,
            });
        }

        ui::recipe_started(out, name, target_os);
        let steps = self.run_steps(name, recipe, target_os, out).await?;

        let notes = recipe.notes().map(str::to_string);
        if let Some(notes) = &notes {
            ui::notes(out, notes);
        }

        tracing::info!(recipe = name, os = %target_os, "recipe finished");
        Ok(RunReport {
            recipe: name.to_string(),
            os: target_os,
            steps,
            notes,
        })
    }

    async fn run_steps(
        &self,
        name: &str,
        recipe: &Recipe,
        target_os: OsId,
        out: &mut dyn Write,
    ) -> Result<Vec<StepReport>, AgentError> {
        let mut reports = Vec::with_capacity(recipe.steps.len());

        for (index, step) in recipe.steps.iter().enumerate() {
            if !step.applies_to(target_os) {
                tracing::debug!(recipe = name, index, when = ?step.when, "skipping step");
                reports.push(StepReport {
                    index,
                    command: step.run.clone(),
                    cwd: None,
                    status: StepStatus::Skipped,
                });
                continue;
            }

            let cwd = self.policy.check_step(&step.run, step.cwd())?;
            ui::step(out, &step.run, &cwd);
            tracing::debug!(recipe = name, index, cwd = %cwd.display(), "running step");

            if let Err(err) = exec::run(&step.run, &cwd).await {
                tracing::warn!(recipe = name, index, error = %err, "step failed");
                return Err(err);
            }

            reports.push(StepReport {
                index,
                command: step.run.clone(),
                cwd: Some(cwd),
                status: StepStatus::Succeeded,
            });
        }

        Ok(reports)
    }
}
