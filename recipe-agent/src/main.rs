// ABOUTME: runs a named setup recipe from recipes.yaml after operator confirmation.
// ABOUTME: confines every step to the launch directory and an allow-listed set of programs.

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;
use recipe_agent::flow::{self, Invocation, TerminalConfirmer};
use recipe_agent::policy::{AllowList, Policy, Sandbox};
use recipe_agent::runner::Executor;
use recipe_agent::{ui, AgentError};
use recipe_common::{os, DEFAULT_RECIPES_PATH};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "recipe-agent")]
struct Args {
    recipe: Option<String>,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long)]
    yes: bool,

    #[arg(long, default_value = DEFAULT_RECIPES_PATH)]
    recipes: PathBuf,

    /// Append a json line per run to this file.
    #[arg(long)]
    journal: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,

    /// Anything after the recipe name; only a stray `--yes` is honoured.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    rest: Vec<String>,
}

impl Args {
    fn auto_confirm(&self) -> bool {
        self.yes || self.rest.iter().any(|a| a == "--yes" || a == "-y")
    }
}

/// Help output is a success; every other argument error is a usage failure.
fn parse_error_status(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "warn,recipe_agent=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let status = parse_error_status(&err);
            let _ = err.print();
            std::process::exit(status);
        }
    };
    init_tracing(args.verbose);

    if let Err(err) = run(args).await {
        match &err {
            AgentError::Usage => ui::usage(&mut std::io::stdout()),
            other => ui::error(&mut std::io::stderr(), other),
        }
        std::process::exit(err.exit_code());
    }
}

async fn run(args: Args) -> Result<(), AgentError> {
    let sandbox_root = std::env::current_dir().map_err(AgentError::LaunchDirectory)?;
    let executor = Executor::new(Policy::new(AllowList::default(), Sandbox::new(sandbox_root)));

    let invocation = Invocation {
        auto_confirm: args.auto_confirm(),
        recipe: args.recipe,
        recipes_path: args.recipes,
        journal_path: args.journal,
    };

    let os = os::detect();
    tracing::debug!(%os, "detected os");

    flow::run(
        &invocation,
        &executor,
        os,
        &mut TerminalConfirmer,
        &mut std::io::stdout(),
    )
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("recipe-agent").chain(argv.iter().copied()))
    }

    #[test]
    fn unknown_flags_after_the_name_are_ignored() {
        let args = parse(&["hello", "--yes", "--force"]).unwrap();
        assert_eq!(args.recipe.as_deref(), Some("hello"));
        assert!(args.auto_confirm());
    }

    #[test]
    fn yes_is_honoured_after_extra_positionals() {
        let args = parse(&["hello", "extra", "--yes"]).unwrap();
        assert_eq!(args.recipe.as_deref(), Some("hello"));
        assert!(args.auto_confirm());

        let args = parse(&["hello", "extra", "-y"]).unwrap();
        assert!(args.auto_confirm());
    }

    #[test]
    fn no_yes_means_prompt() {
        let args = parse(&["hello", "extra"]).unwrap();
        assert!(!args.auto_confirm());
    }

    #[test]
    fn missing_name_parses_and_is_left_to_the_flow() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.recipe, None);
        assert_eq!(args.recipes, PathBuf::from(DEFAULT_RECIPES_PATH));
    }

    #[test]
    fn argument_errors_exit_one() {
        let err = parse(&["--journal"]).unwrap_err();
        assert_ne!(err.kind(), ErrorKind::DisplayHelp);
        assert_eq!(parse_error_status(&err), 1);
    }

    #[test]
    fn help_exits_zero() {
        let err = parse(&["--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert_eq!(parse_error_status(&err), 0);
    }
}
