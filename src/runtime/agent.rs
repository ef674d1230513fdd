use super::{AgentEvent, AgentRuntimeApi, InvokeAgentRequest};
use crate::error::Result;
use aws_config::SdkConfig;
use futures_util::StreamExt;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// Sends prompts to agents and collects their streamed replies.
#[derive(Clone)]
pub struct AgentRuntime {
    client: Arc<dyn AgentRuntimeApi>,
}

impl AgentRuntime {
    pub fn new(client: Arc<dyn AgentRuntimeApi>) -> Self {
        Self { client }
    }

    pub fn from_conf(config: &SdkConfig) -> Self {
        Self::new(Arc::new(aws_sdk_bedrockagentruntime::Client::new(config)))
    }

    pub(crate) fn client(&self) -> &dyn AgentRuntimeApi {
        self.client.as_ref()
    }

    /// Sends a prompt and returns the reply, joined from every chunk.
    ///
    /// Reuse `session_id` across calls to continue a conversation.
    pub async fn invoke_agent(
        &self,
        agent_id: &str,
        agent_alias_id: &str,
        session_id: &str,
        prompt: &str,
    ) -> Result<String> {
        self.collect_reply(agent_id, agent_alias_id, session_id, prompt, false)
            .await
            .inspect_err(|err| error!(agent_id, "couldn't invoke agent: {err}"))
    }

    /// Like [`invoke_agent`](Self::invoke_agent) with tracing enabled. Trace
    /// events are logged as they arrive.
    pub async fn invoke_agent_traced(
        &self,
        agent_id: &str,
        agent_alias_id: &str,
        session_id: &str,
        prompt: &str,
    ) -> Result<String> {
        self.collect_reply(agent_id, agent_alias_id, session_id, prompt, true)
            .await
            .inspect_err(|err| error!(agent_id, "couldn't invoke agent: {err}"))
    }

    async fn collect_reply(
        &self,
        agent_id: &str,
        agent_alias_id: &str,
        session_id: &str,
        prompt: &str,
        enable_trace: bool,
    ) -> Result<String> {
        let mut events = self
            .client
            .invoke_agent(InvokeAgentRequest {
                agent_id: agent_id.to_string(),
                agent_alias_id: agent_alias_id.to_string(),
                session_id: session_id.to_string(),
                input_text: prompt.to_string(),
                enable_trace,
                files: Vec::new(),
            })
            .await?;

        let mut completion = Vec::new();
        while let Some(event) = events.next().await {
            match event? {
                AgentEvent::Chunk { bytes } => completion.extend(bytes),
                AgentEvent::Trace { trace } => info!(agent_id, "agent trace: {trace}"),
                AgentEvent::Files { .. } | AgentEvent::Other => {}
            }
        }
        Ok(String::from_utf8(completion)?)
    }
}

/// A conversation with one agent alias. Every turn shares a session ID so the
/// agent keeps the context of earlier turns.
#[derive(Clone)]
pub struct ChatSession {
    runtime: AgentRuntime,
    agent_id: String,
    agent_alias_id: String,
    session_id: String,
}

impl ChatSession {
    pub fn new(runtime: AgentRuntime, agent_id: &str, agent_alias_id: &str) -> Self {
        Self::with_session_id(runtime, agent_id, agent_alias_id, &Uuid::new_v4().to_string())
    }

    pub fn with_session_id(runtime: AgentRuntime, agent_id: &str, agent_alias_id: &str, session_id: &str) -> Self {
        Self {
            runtime,
            agent_id: agent_id.to_string(),
            agent_alias_id: agent_alias_id.to_string(),
            session_id: session_id.to_string(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub async fn send(&self, text: &str) -> Result<String> {
        self.runtime
            .invoke_agent(&self.agent_id, &self.agent_alias_id, &self.session_id, text)
            .await
    }
}
