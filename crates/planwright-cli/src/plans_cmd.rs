//! `planwright plans` command: list stored plans, newest first.

use anyhow::Result;

use planwright_core::plan::PlanService;
use planwright_db::models::Plan;

/// Run the plans command, printing JSON when `json` is set.
pub async fn run_plans(service: &PlanService, json: bool) -> Result<()> {
    let plans = service.list_plans().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plans)?);
    } else {
        print!("{}", render_plans(&plans));
    }
    Ok(())
}

fn render_plans(plans: &[Plan]) -> String {
    if plans.is_empty() {
        return "No plans found.\n".to_string();
    }

    let mut out = String::new();
    for plan in plans {
        out.push_str(&format!(
            "{}  {}\n",
            plan.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
            plan.goal
        ));
        for item in &plan.items {
            let deadline = if item.deadline.is_empty() {
                String::new()
            } else {
                format!(" (due {})", item.deadline)
            };
            let deps = if item.depends_on.is_empty() {
                String::new()
            } else {
                format!(" <- {}", item.depends_on.join(", "))
            };
            out.push_str(&format!(
                "  [{}] {}{deadline}{deps}\n",
                item.id, item.description
            ));
        }
        out.push('\n');
    }
    out
}
