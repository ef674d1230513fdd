//! Runtime calls: talking to agents, running flows and running managed prompts.
//!
//! Agent and flow responses arrive as event streams. The client seam hands them
//! back as a [`EventStream`] of crate-level events, consumed in order.

pub mod agent;
pub mod code_interpreter;
pub mod flow;
pub mod prompt;
mod sdk;

use crate::error::Result;
use async_trait::async_trait;
use futures_util::stream::BoxStream;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use agent::{AgentRuntime, ChatSession};
pub use code_interpreter::{CodeInterpreter, CodeInterpreterResponse, GeneratedImage};
pub use flow::{FlowInput, FlowInvocation, FlowOutput, InputRequest, InvokeFlowRequest};

pub type EventStream<T> = BoxStream<'static, Result<T>>;

/// A file attached to an agent session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputFile {
    pub name: String,
    pub media_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvokeAgentRequest {
    pub agent_id: String,
    pub agent_alias_id: String,
    pub session_id: String,
    pub input_text: String,
    pub enable_trace: bool,
    /// Files for the code interpreter, sent in the session state.
    pub files: Vec<InputFile>,
}

/// A file the agent produced, e.g. a chart drawn by the code interpreter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputFile {
    pub name: Option<String>,
    pub media_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentEvent {
    Chunk { bytes: Vec<u8> },
    Files { files: Vec<OutputFile> },
    /// Debug rendering of a trace part.
    Trace { trace: String },
    Other,
}

impl AgentEvent {
    pub fn chunk(text: &str) -> Self {
        Self::Chunk {
            bytes: text.as_bytes().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowEvent {
    Output { node_name: String, document: serde_json::Value },
    Completion { reason: String },
    /// A node needs more input before the flow can continue.
    InputRequest { node_name: String, content: serde_json::Value },
    Trace { trace: String },
    Other,
}

/// The start of a flow run: the execution it belongs to and its events.
pub struct FlowStream {
    pub execution_id: Option<String>,
    pub events: EventStream<FlowEvent>,
}

#[async_trait]
pub trait AgentRuntimeApi: Send + Sync {
    async fn invoke_agent(&self, request: InvokeAgentRequest) -> Result<EventStream<AgentEvent>>;

    async fn invoke_flow(&self, request: InvokeFlowRequest) -> Result<FlowStream>;
}

/// Model runtime conversation calls.
#[async_trait]
pub trait ConverseApi: Send + Sync {
    /// Runs a managed prompt, filling its variables with text. Returns the
    /// text blocks of the reply message in order.
    async fn converse_with_prompt(
        &self,
        prompt_arn: &str,
        variables: &BTreeMap<String, String>,
    ) -> Result<Vec<String>>;
}
