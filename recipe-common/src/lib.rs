// ABOUTME: defines the recipe file types shared by recipe-agent and recipectl.
// ABOUTME: provides os detection, yaml loading, and structural lint helpers over a recipe book.

pub mod os;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_RECIPES_PATH: &str = "recipes.yaml";

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "snake_case")]
pub enum OsId {
    Linux,
    Mac,
    Windows,
    Wsl,
}

impl OsId {
    pub const ALL: [OsId; 4] = [OsId::Linux, OsId::Mac, OsId::Windows, OsId::Wsl];

    pub fn as_str(&self) -> &'static str {
        match self {
            OsId::Linux => "linux",
            OsId::Mac => "mac",
            OsId::Windows => "windows",
            OsId::Wsl => "wsl",
        }
    }
}

impl fmt::Display for OsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One shell command inside a recipe.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Step {
    pub run: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<OsId>,
}

impl Step {
    pub fn cwd(&self) -> &str {
        self.cwd.as_deref().unwrap_or(".")
    }

    /// A step without a `when` filter applies everywhere.
    pub fn applies_to(&self, os: OsId) -> bool {
        self.when.map_or(true, |when| when == os)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Recipe {
    #[serde(default)]
    pub os: Vec<OsId>,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_install_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Recipe {
    pub fn targets(&self, os: OsId) -> bool {
        self.os.contains(&os)
    }

    pub fn notes(&self) -> Option<&str> {
        self.post_install_notes.as_deref().filter(|n| !n.is_empty())
    }
}

/// Recipes keyed by name, as read from the recipe file. Entries that fail
/// to decode are kept aside with their error so the rest stay usable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeBook {
    recipes: BTreeMap<String, Recipe>,
    rejected: BTreeMap<String, String>,
}

/// Shape of the whole file, for schema output.
pub type RecipeFile = BTreeMap<String, Recipe>;

impl RecipeBook {
    pub fn get(&self, name: &str) -> Option<&Recipe> {
        self.recipes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.recipes.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Recipe)> {
        self.recipes.iter().map(|(name, recipe)| (name.as_str(), recipe))
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn rejection(&self, name: &str) -> Option<&str> {
        self.rejected.get(name).map(String::as_str)
    }

    pub fn rejected(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rejected.iter().map(|(name, err)| (name.as_str(), err.as_str()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecipeFileError {
    #[error("read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// An empty (or null) document is an empty book. Only a top level that is
/// not a mapping fails the whole file; each entry is decoded on its own.
pub fn parse_recipe_book(input: &str) -> Result<RecipeBook, serde_yaml::Error> {
    let mut book = RecipeBook::default();
    if input.trim().is_empty() {
        return Ok(book);
    }

    let raw: Option<BTreeMap<String, serde_yaml::Value>> = serde_yaml::from_str(input)?;
    for (name, value) in raw.unwrap_or_default() {
        match serde_yaml::from_value::<Recipe>(value) {
            Ok(recipe) => {
                book.recipes.insert(name, recipe);
            }
            Err(err) => {
                book.rejected.insert(name, err.to_string());
            }
        }
    }
    Ok(book)
}

pub fn load_recipe_book(path: &Path) -> Result<RecipeBook, RecipeFileError> {
    let input = std::fs::read_to_string(path).map_err(|source| RecipeFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_recipe_book(&input).map_err(|source| RecipeFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub recipe: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "recipe '{}': {}", self.recipe, self.message)
    }
}

fn invalid(recipe: &str, message: String) -> ValidationError {
    ValidationError {
        recipe: recipe.to_string(),
        message,
    }
}

/// Structural lint. The executor does not require these rules; it only
/// needs the file to parse.
pub fn validate_recipe_book(book: &RecipeBook) -> Result<(), ValidationError> {
    if let Some((name, err)) = book.rejected().next() {
        return Err(invalid(name, format!("cannot be decoded: {err}")));
    }

    for (name, recipe) in book.iter() {
        if name.trim().is_empty() {
            return Err(invalid(name, "recipe name must be non-empty".to_string()));
        }

        if recipe.os.is_empty() {
            return Err(invalid(name, "os must list at least one target".to_string()));
        }

        for (idx, step) in recipe.steps.iter().enumerate() {
            let n = idx + 1;
            if step.run.trim().is_empty() {
                return Err(invalid(name, format!("step {n}: run must be non-empty")));
            }
            if let Some(when) = step.when {
                if !recipe.targets(when) {
                    return Err(invalid(
                        name,
                        format!("step {n}: when={when} is not one of the recipe's os targets"),
                    ));
                }
            }
        }
    }
    Ok(())
}
