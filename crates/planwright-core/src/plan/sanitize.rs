//! Normalization of parsed model output into [`TaskItem`]s.
//!
//! Total over any JSON input: a malformed field degrades to its default,
//! never to an error.

use serde_json::Value;

use planwright_db::models::TaskItem;

/// Turn the elements of the model's array into fully-populated task items.
///
/// Output order equals input order; ids are `task-1`, `task-2`, ...
pub fn sanitize_items(elements: &[Value]) -> Vec<TaskItem> {
    elements
        .iter()
        .enumerate()
        .map(|(i, element)| sanitize_item(i + 1, element))
        .collect()
}

fn sanitize_item(position: usize, element: &Value) -> TaskItem {
    TaskItem {
        id: format!("task-{position}"),
        description: truthy_text(element.get("task"))
            .unwrap_or_else(|| format!("Task {position}")),
        deadline: truthy_text(element.get("deadline")).unwrap_or_default(),
        depends_on: dependency_ids(element.get("depends_on")),
    }
}

/// Render a field as text if it is truthy (not missing, `null`, `false`,
/// `0`, or `""`).
fn truthy_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// Keep the field only when it is an array. Every entry survives in order:
/// strings verbatim, anything else as compact JSON text.
fn dependency_ids(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(entries)) = value else {
        return Vec::new();
    };
    entries
        .iter()
        .map(|entry| match entry {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect()
}
