// ABOUTME: provides recipectl helpers for inspecting and linting a recipe file without running it.
// ABOUTME: keeps output deterministic so it can be diffed and consumed by scripts.

use std::fmt::Write;

use recipe_common::{parse_recipe_book, validate_recipe_book, OsId, RecipeBook};

#[derive(Debug, Clone, Copy, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    ParseFailed,
    ValidationFailed,
}

#[derive(Debug, Clone, serde::Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RequestError {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, serde::Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ValidateVerdict {
    pub ok: bool,
    pub recipes: usize,
    pub error: Option<RequestError>,
}

pub fn validate_verdict(input: &str) -> ValidateVerdict {
    match parse_recipe_book(input) {
        Ok(book) if book.rejected().next().is_some() => {
            let message = book
                .rejected()
                .map(|(name, reason)| format!("{name}: {reason}"))
                .collect::<Vec<_>>()
                .join("; ");
            ValidateVerdict {
                ok: false,
                recipes: book.len(),
                error: Some(RequestError {
                    code: ErrorCode::ParseFailed,
                    message,
                }),
            }
        }
        Ok(book) => match validate_recipe_book(&book) {
            Ok(()) => ValidateVerdict {
                ok: true,
                recipes: book.len(),
                error: None,
            },
            Err(err) => ValidateVerdict {
                ok: false,
                recipes: book.len(),
                error: Some(RequestError {
                    code: ErrorCode::ValidationFailed,
                    message: err.to_string(),
                }),
            },
        },
        Err(err) => ValidateVerdict {
            ok: false,
            recipes: 0,
            error: Some(RequestError {
                code: ErrorCode::ParseFailed,
                message: err.to_string(),
            }),
        },
    }
}

fn join_os(os: &[OsId]) -> String {
    os.iter().map(OsId::as_str).collect::<Vec<_>>().join(",")
}

/// One line per recipe: name, targets, description. Entries that failed to
/// decode follow, marked invalid.
pub fn render_list(book: &RecipeBook) -> String {
    let width = book
        .iter()
        .map(|(name, _)| name.len())
        .chain(book.rejected().map(|(name, _)| name.len()))
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for (name, recipe) in book.iter() {
        let desc = recipe.description.as_deref().unwrap_or("");
        let line = format!("{name:<width$}  [{}]  {desc}", join_os(&recipe.os));
        let _ = writeln!(out, "{}", line.trim_end());
    }
    for (name, _) in book.rejected() {
        let _ = writeln!(out, "{name:<width$}  (invalid, see recipectl validate)");
    }
    out
}

/// Steps whose `when` filter excludes `host` are marked as skipped.
pub fn render_recipe(name: &str, book: &RecipeBook, host: OsId) -> Option<String> {
    let recipe = book.get(name)?;
    let mut out = String::new();

    let _ = writeln!(out, "{name}");
    if let Some(desc) = &recipe.description {
        let _ = writeln!(out, "  {desc}");
    }
    let applies = if recipe.targets(host) { "yes" } else { "no" };
    let _ = writeln!(out, "  os: {}  (applies to {host}: {applies})", join_os(&recipe.os));

    for (idx, step) in recipe.steps.iter().enumerate() {
        let n = idx + 1;
        let marker = if step.applies_to(host) { " " } else { "-" };
        let _ = write!(out, "  {marker} {n}. {}", step.run);
        if step.cwd() != "." {
            let _ = write!(out, "  (cwd={})", step.cwd());
        }
        if let Some(when) = step.when {
            let _ = write!(out, "  [when {when}]");
        }
        out.push('\n');
    }

    if let Some(notes) = recipe.notes() {
        let _ = writeln!(out, "  notes:");
        for line in notes.lines() {
            let _ = writeln!(out, "    {line}");
        }
    }

    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECIPES: &str = r#"
node:
  os: [linux, mac]
  description: node toolchain
  steps:
    - run: brew install node
      when: mac
    - run: sudo apt install -y nodejs npm
      when: linux
    - run: npm ci
      cwd: web
  post_install_notes: npm run dev
docker:
  os: [linux]
  steps:
    - run: docker compose up -d
"#;

    #[test]
    fn verdict_ok_counts_recipes() {
        let v = validate_verdict(RECIPES);
        assert!(v.ok);
        assert_eq!(v.recipes, 2);
        assert_eq!(v.error, None);
    }

    #[test]
    fn verdict_reports_parse_failed_for_unknown_fields() {
        let v = validate_verdict("demo:\n  os: [linux]\n  unexpected: x\n");
        assert!(!v.ok);
        assert_eq!(v.error.as_ref().unwrap().code, ErrorCode::ParseFailed);
    }

    #[test]
    fn verdict_reports_validation_failed_for_empty_os() {
        let v = validate_verdict("demo:\n  os: []\n  steps:\n    - run: ls\n");
        assert!(!v.ok);
        assert_eq!(
            v.error.as_ref().unwrap().code,
            ErrorCode::ValidationFailed
        );
    }

    #[test]
    fn list_is_sorted_by_name() {
        let book = parse_recipe_book(RECIPES).unwrap();
        let out = render_list(&book);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("docker"));
        assert!(lines[0].contains("[linux]"));
        assert!(lines[1].starts_with("node"));
        assert!(lines[1].ends_with("node toolchain"));
    }

    #[test]
    fn show_marks_steps_filtered_out_for_host() {
        let book = parse_recipe_book(RECIPES).unwrap();
        let out = render_recipe("node", &book, OsId::Linux).unwrap();

        assert!(out.contains("applies to linux: yes"));
        assert!(out.contains("  - 1. brew install node  [when mac]"));
        assert!(out.contains("    2. sudo apt install -y nodejs npm  [when linux]"));
        assert!(out.contains("    3. npm ci  (cwd=web)"));
        assert!(out.contains("    npm run dev"));
    }

    #[test]
    fn list_marks_undecodable_recipes() {
        let mut yaml = RECIPES.to_string();
        yaml.push_str("bsd:\n  os: [freebsd]\n");
        let book = parse_recipe_book(&yaml).unwrap();

        let out = render_list(&book);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("bsd"));
        assert!(lines[2].contains("invalid"));

        let v = validate_verdict(&yaml);
        assert!(!v.ok);
        assert_eq!(v.recipes, 2);
        assert_eq!(v.error.as_ref().unwrap().code, ErrorCode::ParseFailed);
        assert!(v.error.as_ref().unwrap().message.starts_with("bsd: "));
    }

    #[test]
    fn show_unknown_recipe_is_none() {
        let book = parse_recipe_book(RECIPES).unwrap();
        assert!(render_recipe("ruby", &book, OsId::Mac).is_none());
    }
}
