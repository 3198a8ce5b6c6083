// ABOUTME: renders operator-facing console lines for plans, steps, notes, and failures.
// ABOUTME: every line goes to a caller-supplied writer; write failures are ignored.

use std::io::Write;
use std::path::Path;

use console::style;
use recipe_common::OsId;

use crate::error::AgentError;

pub const USAGE: &str = "Usage: recipe-agent <recipe-name> [--yes]";

pub fn usage(out: &mut dyn Write) {
    let _ = writeln!(out, "{USAGE}");
}

pub fn plan(out: &mut dyn Write, recipe: &str, os: OsId) {
    let _ = writeln!(out, "{} {recipe} on {os}", style("About to run recipe:").bold());
}

pub fn recipe_started(out: &mut dyn Write, recipe: &str, os: OsId) {
    let _ = writeln!(
        out,
        "{} {recipe}  {}",
        style("Running recipe:").cyan(),
        style(format!("for {os}")).dim()
    );
}

pub fn step(out: &mut dyn Write, command: &str, cwd: &Path) {
    let _ = writeln!(
        out,
        "{}  (cwd={})",
        style(format!("$ {command}")).bold(),
        cwd.display()
    );
}

pub fn notes(out: &mut dyn Write, notes: &str) {
    let _ = writeln!(out, "\n{}\n{notes}", style("Post-install notes:").green());
}

pub fn unknown_recipe(out: &mut dyn Write, recipe: &str, recipes_path: &Path) {
    let _ = writeln!(
        out,
        "No recipe named '{recipe}'. Add it to {}.",
        recipes_path.display()
    );
}

pub fn error(out: &mut dyn Write, err: &AgentError) {
    let label = match err {
        AgentError::CommandFailed { .. } => "Command failed:",
        _ => "Error:",
    };
    let _ = writeln!(out, "{} {err}", style(label).red());
}
