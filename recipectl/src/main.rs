// ABOUTME: provides a read-only cli for listing, showing, and linting setup recipes.
// ABOUTME: never executes recipe steps; see recipe-agent for that.

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use console::style;
use recipe_common::{load_recipe_book, os, DEFAULT_RECIPES_PATH};

use recipectl::{render_list, render_recipe, validate_verdict};

#[derive(Debug, Parser)]
#[command(name = "recipectl")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    List {
        #[arg(long, default_value = DEFAULT_RECIPES_PATH)]
        recipes: PathBuf,
    },
    Show {
        name: String,

        #[arg(long, default_value = DEFAULT_RECIPES_PATH)]
        recipes: PathBuf,
    },
    Validate {
        #[arg(long)]
        file: Option<PathBuf>,

        #[arg(long)]
        yaml: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command {
        Command::List { recipes } => {
            let book = load_recipe_book(&recipes)?;
            if book.is_empty() {
                println!("no recipes in {}", recipes.display());
            }
            print!("{}", render_list(&book));
        }
        Command::Show { name, recipes } => {
            let book = load_recipe_book(&recipes)?;
            let name = name.to_lowercase();
            if let Some(reason) = book.rejection(&name) {
                println!("{} recipe '{name}' is invalid: {reason}", style("!").red());
                std::process::exit(1);
            }
            match render_recipe(&name, &book, os::detect()) {
                Some(out) => print!("{out}"),
                None => println!(
                    "{} no recipe named '{name}' in {}",
                    style("!").yellow(),
                    recipes.display()
                ),
            }
        }
        Command::Validate { file, yaml } => {
            let input = read_input(file.as_ref(), yaml.as_deref())?;
            let verdict = validate_verdict(&input);
            println!("{}", serde_json::to_string_pretty(&verdict)?);
            if !verdict.ok {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn read_input(file: Option<&PathBuf>, yaml: Option<&str>) -> anyhow::Result<String> {
    if let Some(yaml) = yaml {
        return Ok(yaml.to_string());
    }

    let path = file.cloned().unwrap_or_else(|| PathBuf::from(DEFAULT_RECIPES_PATH));
    if path.as_os_str() == "-" {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        return Ok(input);
    }

    std::fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))
}
