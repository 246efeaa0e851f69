//! Error taxonomy for repair planning.

use maintenance_state::StorageError;

/// Failures talking to the generative planning agent.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("agent transport error: {0}")]
    Transport(String),

    #[error("agent returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("unexpected agent response: {0}")]
    UnexpectedResponse(String),

    #[error("agent version registration failed: {0}")]
    Registration(String),
}

impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AgentError::UnexpectedResponse(err.to_string())
        } else {
            AgentError::Transport(err.to_string())
        }
    }
}

/// Result type for agent calls.
pub type AgentResult<T> = std::result::Result<T, AgentError>;

/// Missing or unusable startup configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Why a planning request failed.
#[derive(Debug, thiserror::Error)]
pub enum PlanningError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("store error: {0}")]
    Store(#[from] StorageError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error("agent returned an empty response")]
    EmptyAgentResponse,

    #[error("agent returned a malformed work order: {reason}")]
    MalformedAgentOutput { reason: String, payload: String },

    #[error("planning cancelled")]
    Cancelled,

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl PlanningError {
    /// The store or the agent could not be reached or reported an error.
    pub fn is_external(&self) -> bool {
        matches!(self, PlanningError::Store(_) | PlanningError::Agent(_))
    }

    /// The agent answered, but not with a usable work order.
    pub fn is_malformed_output(&self) -> bool {
        matches!(
            self,
            PlanningError::EmptyAgentResponse | PlanningError::MalformedAgentOutput { .. }
        )
    }

    /// Short stable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            PlanningError::InvalidArgument(_) => "invalid_argument",
            PlanningError::Store(_) => "store",
            PlanningError::Agent(_) => "agent",
            PlanningError::EmptyAgentResponse => "empty_agent_response",
            PlanningError::MalformedAgentOutput { .. } => "malformed_agent_output",
            PlanningError::Cancelled => "cancelled",
            PlanningError::Config(_) => "config",
        }
    }
}

/// Result type for planning operations.
pub type PlanningResult<T> = std::result::Result<T, PlanningError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_and_malformed_failures_are_distinct() {
        let store = PlanningError::from(StorageError::Backend("down".to_string()));
        let agent = PlanningError::from(AgentError::Transport("refused".to_string()));
        let empty = PlanningError::EmptyAgentResponse;
        let bad = PlanningError::MalformedAgentOutput {
            reason: "expected value".to_string(),
            payload: "{oops}".to_string(),
        };

        assert!(store.is_external() && !store.is_malformed_output());
        assert!(agent.is_external() && !agent.is_malformed_output());
        assert!(empty.is_malformed_output() && !empty.is_external());
        assert!(bad.is_malformed_output() && !bad.is_external());
        assert!(!PlanningError::Cancelled.is_external());
        assert!(!PlanningError::InvalidArgument("x".to_string()).is_malformed_output());
    }

    #[test]
    fn error_messages_carry_context() {
        assert_eq!(
            PlanningError::EmptyAgentResponse.to_string(),
            "agent returned an empty response"
        );
        let err = AgentError::Http {
            status: 503,
            body: "overloaded".to_string(),
        };
        assert_eq!(err.to_string(), "agent returned HTTP 503: overloaded");
        assert_eq!(
            ConfigError::Missing("PLANNER_AGENT_ENDPOINT").to_string(),
            "missing required setting PLANNER_AGENT_ENDPOINT"
        );
    }

    #[test]
    fn kinds_are_stable_labels() {
        assert_eq!(PlanningError::Cancelled.kind(), "cancelled");
        assert_eq!(
            PlanningError::from(ConfigError::Missing("X")).kind(),
            "config"
        );
    }
}
