//! Prompt templates and the response schema for scenario generation.
//!
//! Every prompt is a versioned, testable artifact. Placeholders use
//! `{key}` and are filled by [`render_template`].

use mart_core::types::{Category, Difficulty};
use serde_json::{Value, json};

/// Bumped whenever the wording of [`SCENARIO_PROMPT`] changes.
pub const SCENARIO_PROMPT_VERSION: &str = "1.0";

/// Scenario generation prompt.
pub const SCENARIO_PROMPT: &str = r"Generate a Korean shopping memory game scenario.
Category: {category} (This MUST be the theme of the items).
Difficulty: {difficulty}.
Items: {item_count} items related to {category} to remember in order.
Decoys: {decoy_count} similar items related to {category}.
JSON structure: { theme: string, items: [{id, name, description, icon}], decoys: [{id, name, description, icon}] }.
Every id must be unique across items and decoys.
Descriptions should be under 5 characters.
Icons must be relevant emojis.";

/// Short round-trip used to check that a key works.
pub const CONNECTION_TEST_PROMPT: &str = r#"안녕! 연결 테스트 중이야. 짧게 "OK"라고 답해줘."#;

/// Simple template interpolation for prompts.
///
/// Replaces `{key}` with the corresponding value. Braces that do not name
/// a supplied key are left alone.
#[must_use]
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{key}}}"), value);
    }
    result
}

/// Render the scenario prompt for a round.
#[must_use]
pub fn scenario_prompt(difficulty: Difficulty, category: Category) -> String {
    let item_count = difficulty.item_count().to_string();
    let decoy_count = difficulty.decoy_count().to_string();
    render_template(
        SCENARIO_PROMPT,
        &[
            ("category", category.label()),
            ("difficulty", difficulty.label()),
            ("item_count", &item_count),
            ("decoy_count", &decoy_count),
        ],
    )
}

fn item_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "id": { "type": "STRING" },
            "name": { "type": "STRING" },
            "description": { "type": "STRING" },
            "icon": { "type": "STRING" }
        },
        "required": ["id", "name", "description", "icon"]
    })
}

/// JSON schema the scenario response must follow.
#[must_use]
pub fn scenario_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "theme": { "type": "STRING" },
            "items": { "type": "ARRAY", "items": item_schema() },
            "decoys": { "type": "ARRAY", "items": item_schema() }
        },
        "required": ["theme", "items", "decoys"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_replaces_all_occurrences() {
        let out = render_template("{a} and {a} but {b}", &[("a", "x"), ("b", "y")]);
        assert_eq!(out, "x and x but y");
    }

    #[test]
    fn scenario_prompt_is_fully_rendered() {
        let p = scenario_prompt(Difficulty::Hard, Category::Cleaning);
        assert!(p.contains("Category: 청소 & 빨래"));
        assert!(p.contains("Difficulty: 어려움."));
        assert!(p.contains("Items: 7 items"));
        assert!(p.contains("Decoys: 5 similar"));
        for placeholder in ["{category}", "{difficulty}", "{item_count}", "{decoy_count}"] {
            assert!(!p.contains(placeholder), "left {placeholder} in prompt");
        }
        // the literal JSON hint survives rendering
        assert!(p.contains("{ theme: string"));
    }

    #[test]
    fn schema_requires_every_field() {
        let schema = scenario_schema();
        assert_eq!(schema["required"], json!(["theme", "items", "decoys"]));
        assert_eq!(
            schema["properties"]["decoys"]["items"]["required"],
            json!(["id", "name", "description", "icon"])
        );
    }
}
