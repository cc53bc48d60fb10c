use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One decomposed unit of work inside a plan.
///
/// Every field is always present: the sanitizer fills defaults before an
/// item is ever returned or stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskItem {
    /// `task-<n>`, 1-based position within the plan.
    pub id: String,
    pub description: String,
    /// Free-form: an ISO date or a relative label such as `Day 1`.
    pub deadline: String,
    /// Ids of other items in the same plan. Never validated.
    pub depends_on: Vec<String>,
}

/// A persisted plan row. Plans are immutable once inserted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: Uuid,
    pub goal: String,
    /// Stored in the `items` JSONB column, exposed as `plan` on the wire.
    #[sqlx(json)]
    #[serde(rename = "plan")]
    pub items: Vec<TaskItem>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_item_uses_camel_case_keys() {
        let item = TaskItem {
            id: "task-1".to_string(),
            description: "Write draft".to_string(),
            deadline: "Day 1".to_string(),
            depends_on: vec![],
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "task-1",
                "description": "Write draft",
                "deadline": "Day 1",
                "dependsOn": []
            })
        );
    }

    #[test]
    fn plan_serializes_items_as_plan() {
        let plan = Plan {
            id: Uuid::nil(),
            goal: "ship it".to_string(),
            items: vec![],
            created_at: DateTime::from_timestamp(0, 0).unwrap(),
        };
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["goal"], "ship it");
        assert_eq!(json["plan"], serde_json::json!([]));
        assert!(json.get("createdAt").is_some());
        assert!(json.get("items").is_none());
    }
}
