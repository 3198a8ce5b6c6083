// ABOUTME: emits a json schema for the recipe file format to stdout.
// ABOUTME: intended for editor integration and external validators of recipes.yaml.

fn main() {
    let schema = schemars::schema_for!(recipe_common::RecipeFile);
    let json = serde_json::to_string_pretty(&schema).expect("serialize schema");
    println!("{json}");
}
