//! Generative planning agent client.
//!
//! The agent is an external service addressed by name and version. A version
//! is registered once per process with an idempotent "ensure" call; every
//! planning request is then a single prompt-in, text-out invocation.

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};

use crate::config::AgentConfig;
use crate::error::{AgentError, AgentResult};

/// A registered agent version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentVersion {
    pub agent_name: String,
    pub version: String,
    pub model: String,
    /// `true` when this process created the version, `false` when it existed
    pub created: bool,
}

/// The generative step of the planning pipeline.
#[async_trait]
pub trait PlanningAgent: Send + Sync {
    /// Make sure the configured agent version exists. Safe to repeat.
    async fn ensure_version(&self) -> AgentResult<AgentVersion>;

    /// Send one prompt and return the agent's raw text answer.
    async fn invoke(&self, prompt: &str) -> AgentResult<String>;
}

#[derive(Serialize)]
struct CreateVersionRequest<'a> {
    version: &'a str,
    model: &'a str,
    instructions: &'a str,
}

#[derive(Serialize)]
struct ResponseRequest<'a> {
    version: &'a str,
    input: &'a str,
}

/// [`PlanningAgent`] over the agent service's HTTP API.
pub struct HttpPlanningAgent {
    config: AgentConfig,
    http_client: reqwest::Client,
    version: OnceCell<AgentVersion>,
}

impl HttpPlanningAgent {
    pub fn new(config: AgentConfig) -> AgentResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("repair-planner/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AgentError::Transport(e.to_string()))?;

        Ok(HttpPlanningAgent {
            config,
            http_client,
            version: OnceCell::new(),
        })
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    fn agent_url(&self, tail: &str) -> String {
        format!(
            "{}/agents/{}/{}",
            self.config.endpoint, self.config.agent_name, tail
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    fn version_record(&self, created: bool) -> AgentVersion {
        AgentVersion {
            agent_name: self.config.agent_name.clone(),
            version: self.config.agent_version.clone(),
            model: self.config.model.clone(),
            created,
        }
    }

    async fn register(&self) -> AgentResult<AgentVersion> {
        let url = self.agent_url(&format!("versions/{}", self.config.agent_version));
        let response = self.authorize(self.http_client.get(&url)).send().await?;

        match response.status() {
            status if status.is_success() => {
                debug!(version = %self.config.agent_version, "agent version already registered");
                return Ok(self.version_record(false));
            }
            StatusCode::NOT_FOUND => {}
            _ => return Err(http_error(response).await),
        }

        let body = CreateVersionRequest {
            version: &self.config.agent_version,
            model: &self.config.model,
            instructions: &self.config.instructions,
        };
        let response = self
            .authorize(self.http_client.post(self.agent_url("versions")))
            .json(&body)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                info!(
                    agent = %self.config.agent_name,
                    version = %self.config.agent_version,
                    model = %self.config.model,
                    "registered agent version"
                );
                Ok(self.version_record(true))
            }
            // Another process registered it between our GET and POST.
            StatusCode::CONFLICT => Ok(self.version_record(false)),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(AgentError::Registration(format!("HTTP {}: {}", status.as_u16(), body)))
            }
        }
    }
}

#[async_trait]
impl PlanningAgent for HttpPlanningAgent {
    #[instrument(skip(self), fields(agent = %self.config.agent_name, version = %self.config.agent_version))]
    async fn ensure_version(&self) -> AgentResult<AgentVersion> {
        self.version
            .get_or_try_init(|| self.register())
            .await
            .cloned()
    }

    #[instrument(skip(self, prompt), fields(agent = %self.config.agent_name, prompt_len = prompt.len()))]
    async fn invoke(&self, prompt: &str) -> AgentResult<String> {
        self.ensure_version().await?;

        let body = ResponseRequest {
            version: &self.config.agent_version,
            input: prompt,
        };
        let response = self
            .authorize(self.http_client.post(self.agent_url("responses")))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(http_error(response).await);
        }

        let payload: Value = response.json().await?;
        response_text(&payload).ok_or_else(|| {
            AgentError::UnexpectedResponse("response has neither output_text nor output".into())
        })
    }
}

async fn http_error(response: Response) -> AgentError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    AgentError::Http { status, body }
}

/// Text of an agent response: `output_text` when present, otherwise the
/// concatenated `output[].content[].text` items.
pub fn response_text(payload: &Value) -> Option<String> {
    if let Some(text) = payload.get("output_text").and_then(Value::as_str) {
        return Some(text.to_string());
    }

    let items = payload.get("output")?.as_array()?;
    let text: String = items
        .iter()
        .filter_map(|item| item.get("content").and_then(Value::as_array))
        .flatten()
        .filter_map(|c| c.get("text").and_then(Value::as_str))
        .collect();
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn output_text_wins() {
        let payload = json!({"output_text": "{\"title\":\"x\"}", "output": []});
        assert_eq!(response_text(&payload).as_deref(), Some("{\"title\":\"x\"}"));
    }

    #[test]
    fn output_content_items_are_concatenated() {
        let payload = json!({
            "output": [
                {"type": "message", "content": [{"type": "output_text", "text": "{\"title\":"}]},
                {"type": "reasoning"},
                {"type": "message", "content": [{"text": "\"x\"}"}, {"type": "refusal"}]}
            ]
        });
        assert_eq!(response_text(&payload).as_deref(), Some("{\"title\":\"x\"}"));
    }

    #[test]
    fn unrecognised_payload_has_no_text() {
        assert_eq!(response_text(&json!({"status": "ok"})), None);
        assert_eq!(response_text(&json!({"output": "plain"})), None);
    }

    #[test]
    fn urls_are_built_from_config() {
        let agent = HttpPlanningAgent::new(
            AgentConfig::new("http://localhost:9000/").with_agent_name("press"),
        )
        .unwrap();
        assert_eq!(
            agent.agent_url("versions/1"),
            "http://localhost:9000/agents/press/versions/1"
        );
    }
}
