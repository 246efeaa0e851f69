//! Scripted planning agent for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::agent::{AgentVersion, PlanningAgent};
use crate::error::{AgentError, AgentResult};

/// Returns queued responses in order and records every prompt it receives.
#[derive(Default)]
pub struct ScriptedAgent {
    responses: Mutex<VecDeque<AgentResult<String>>>,
    prompts: Mutex<Vec<String>>,
    ensure_calls: AtomicUsize,
    hang: AtomicBool,
}

impl ScriptedAgent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Agent that answers every call with `text`, in order.
    pub fn replying<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let agent = Self::new();
        for r in responses {
            agent.push_response(r);
        }
        agent
    }

    pub fn push_response(&self, text: impl Into<String>) {
        self.lock_responses().push_back(Ok(text.into()));
    }

    pub fn push_error(&self, err: AgentError) {
        self.lock_responses().push_back(Err(err));
    }

    /// Make `invoke` never complete.
    pub fn hang_on_invoke(&self) {
        self.hang.store(true, Ordering::SeqCst);
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn invoke_count(&self) -> usize {
        self.prompts.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn ensure_calls(&self) -> usize {
        self.ensure_calls.load(Ordering::SeqCst)
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, VecDeque<AgentResult<String>>> {
        self.responses.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl PlanningAgent for ScriptedAgent {
    async fn ensure_version(&self) -> AgentResult<AgentVersion> {
        let first = self.ensure_calls.fetch_add(1, Ordering::SeqCst) == 0;
        Ok(AgentVersion {
            agent_name: "scripted".to_string(),
            version: "1".to_string(),
            model: "scripted".to_string(),
            created: first,
        })
    }

    async fn invoke(&self, prompt: &str) -> AgentResult<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(prompt.to_string());

        if self.hang.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }

        self.lock_responses().pop_front().unwrap_or_else(|| {
            Err(AgentError::UnexpectedResponse(
                "no scripted response left".to_string(),
            ))
        })
    }
}
