//! `planwright generate` and `planwright ping`: one-shot calls to the
//! completion service from the terminal.

use anyhow::{Result, bail};

use planwright_core::completion::CompletionClient;
use planwright_core::plan::{GenerateError, PlanService};

/// Greeting used by `ping` to check the API key and connectivity.
const PING_PROMPT: &str = "Hello!";

/// Run one generation and print `{goal, plan}` as pretty JSON.
pub async fn run_generate(service: &PlanService, goal: &str) -> Result<()> {
    let generated = match service.generate(goal).await {
        Ok(generated) => generated,
        Err(GenerateError::UpstreamFormat { raw }) => {
            bail!("completion service did not return a JSON task array. Raw reply:\n{raw}")
        }
        Err(e) => return Err(e.into()),
    };

    if !service.has_store() {
        eprintln!("(plan not saved: no database configured)");
    }
    println!("{}", serde_json::to_string_pretty(&generated)?);
    Ok(())
}

/// Send a fixed greeting and print the reply.
pub async fn run_ping(client: &dyn CompletionClient) -> Result<()> {
    let reply = client.complete(PING_PROMPT).await?;
    match reply {
        Some(text) => println!("Response: {text}"),
        None => println!("Response: <no content>"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use planwright_test_utils::fakes::ScriptedCompletion;

    #[tokio::test]
    async fn ping_sends_greeting() {
        let client = ScriptedCompletion::replying("Hi there!");
        run_ping(&client).await.unwrap();
        assert_eq!(client.prompts(), vec!["Hello!".to_string()]);
    }

    #[tokio::test]
    async fn ping_propagates_failure() {
        let client = ScriptedCompletion::failing(401, "bad key");
        let err = run_ping(&client).await.unwrap_err();
        assert!(err.to_string().contains("401"), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn generate_reports_raw_reply_on_format_error() {
        let service = PlanService::new(Arc::new(ScriptedCompletion::replying("not json")), None);
        let err = run_generate(&service, "goal").await.unwrap_err();
        assert!(err.to_string().contains("not json"), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn generate_rejects_empty_goal() {
        let service = PlanService::new(Arc::new(ScriptedCompletion::replying("[]")), None);
        let err = run_generate(&service, "").await.unwrap_err();
        assert!(err.to_string().contains("goal is required"), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn generate_succeeds() {
        let service = PlanService::new(
            Arc::new(ScriptedCompletion::replying(r#"[{"task":"a"}]"#)),
            None,
        );
        run_generate(&service, "goal").await.unwrap();
    }
}
