//! Planning agent configuration.

use crate::error::ConfigError;

pub const ENV_ENDPOINT: &str = "PLANNER_AGENT_ENDPOINT";
pub const ENV_NAME: &str = "PLANNER_AGENT_NAME";
pub const ENV_VERSION: &str = "PLANNER_AGENT_VERSION";
pub const ENV_MODEL: &str = "PLANNER_AGENT_MODEL";
pub const ENV_API_KEY: &str = "PLANNER_AGENT_API_KEY";

pub const DEFAULT_AGENT_NAME: &str = "maintenance-planner";
pub const DEFAULT_AGENT_VERSION: &str = "1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// System instructions registered with every agent version.
pub const DEFAULT_INSTRUCTIONS: &str = "You are a maintenance planner for tire curing presses. \
Given a diagnosed fault, the available technicians and the parts inventory, produce one repair \
work order. Reply with a single JSON object using camelCase keys: title, description, type, \
priority, assignedTo, notes, estimatedDuration, partsUsed and tasks. Assign only listed \
technicians and use only listed parts. Do not add commentary.";

/// Where and how to reach the generative planning agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    /// Base URL of the agent service, without a trailing slash
    pub endpoint: String,
    pub agent_name: String,
    pub agent_version: String,
    pub model: String,
    pub api_key: Option<String>,
    pub instructions: String,
}

impl AgentConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            agent_name: DEFAULT_AGENT_NAME.to_string(),
            agent_version: DEFAULT_AGENT_VERSION.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
        }
    }

    pub fn with_agent_name(mut self, name: impl Into<String>) -> Self {
        self.agent_name = name.into();
        self
    }

    pub fn with_agent_version(mut self, version: impl Into<String>) -> Self {
        self.agent_version = version.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Create from environment variables
    ///
    /// Reads:
    /// - PLANNER_AGENT_ENDPOINT (required)
    /// - PLANNER_AGENT_NAME (optional, default: "maintenance-planner")
    /// - PLANNER_AGENT_VERSION (optional, default: "1")
    /// - PLANNER_AGENT_MODEL (optional, default: "gpt-4o-mini")
    /// - PLANNER_AGENT_API_KEY (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let endpoint = get(ENV_ENDPOINT).ok_or(ConfigError::Missing(ENV_ENDPOINT))?;
        let mut config = Self::new(endpoint.trim());
        if let Some(name) = get(ENV_NAME) {
            config.agent_name = name;
        }
        if let Some(version) = get(ENV_VERSION) {
            config.agent_version = version;
        }
        if let Some(model) = get(ENV_MODEL) {
            config.model = model;
        }
        config.api_key = get(ENV_API_KEY);

        config.validate()?;
        Ok(config)
    }

    /// Reject values that cannot form a usable request URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: ENV_ENDPOINT,
                reason: format!("expected an http(s) URL, got {:?}", self.endpoint),
            });
        }
        for (var, value) in [(ENV_NAME, &self.agent_name), (ENV_VERSION, &self.agent_version)] {
            if value.trim().is_empty() || value.contains('/') {
                return Err(ConfigError::Invalid {
                    var,
                    reason: format!("must be a non-empty path segment, got {:?}", value),
                });
            }
        }
        Ok(())
    }
}
