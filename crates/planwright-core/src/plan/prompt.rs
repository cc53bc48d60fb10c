//! Prompt construction for plan generation.

/// Output contract shown to the model. The keys here are the ones the
/// sanitizer reads back (`task`, `deadline`, `depends_on`).
const OUTPUT_FORMAT: &str = r#"[
  { "task": "Example task", "deadline": "YYYY-MM-DD or Day 1", "depends_on": [] }
]"#;

/// Build the single user prompt sent to the completion service.
///
/// The goal is embedded verbatim between double quotes; no escaping is
/// applied.
pub fn build_prompt(goal: &str) -> String {
    format!(
        "Break down this goal into actionable tasks with suggested deadlines\n\
         and dependencies. Respond strictly in valid JSON format like this:\n\
         \n\
         {OUTPUT_FORMAT}\n\
         \n\
         Goal: \"{goal}\"\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_goal_verbatim() {
        let prompt = build_prompt(r#"Learn "Rust" in 30 days"#);
        assert!(prompt.contains(r#"Goal: "Learn "Rust" in 30 days""#));
    }

    #[test]
    fn prompt_describes_expected_keys() {
        let prompt = build_prompt("anything");
        assert!(prompt.contains("\"task\""));
        assert!(prompt.contains("\"deadline\""));
        assert!(prompt.contains("\"depends_on\""));
        assert!(prompt.contains("valid JSON"));
    }

    #[test]
    fn prompt_example_is_valid_json() {
        let value: serde_json::Value = serde_json::from_str(OUTPUT_FORMAT).unwrap();
        assert!(value.is_array());
    }
}
