use super::{AgentRuntime, FlowEvent};
use crate::error::Result;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};

pub const SUCCESS: &str = "SUCCESS";
pub const INPUT_REQUIRED: &str = "INPUT_REQUIRED";

/// Input for one node of a flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowInput {
    pub node_name: String,
    pub node_output_name: Option<String>,
    pub node_input_name: Option<String>,
    pub document: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvokeFlowRequest {
    pub flow_id: String,
    pub flow_alias_id: String,
    pub inputs: Vec<FlowInput>,
    /// Continues an earlier execution. Omitted on the first call.
    pub execution_id: Option<String>,
    pub enable_trace: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowOutput {
    pub node_name: String,
    pub document: Value,
}

/// A node asking for more input in a multi-turn flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputRequest {
    pub node_name: String,
    pub content: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowInvocation {
    /// Completion reason, e.g. `SUCCESS` or `INPUT_REQUIRED`. Empty if the
    /// stream ended without one.
    pub status: String,
    pub input_required: Option<InputRequest>,
    pub execution_id: Option<String>,
    pub outputs: Vec<FlowOutput>,
}

/// Input for the playlist flow: a genre and a number of songs, sent to the
/// `document` output of its `FlowInput` node.
pub fn playlist_input(genre: &str, number: u32) -> FlowInput {
    FlowInput {
        node_name: "FlowInput".to_string(),
        node_output_name: Some("document".to_string()),
        node_input_name: None,
        document: json!({ "genre": genre, "number": number }),
    }
}

impl AgentRuntime {
    /// Runs a flow with tracing enabled and drains its event stream.
    ///
    /// Pass the previous `execution_id` to answer an input request; on the
    /// first call the ID is taken from the response.
    pub async fn invoke_flow(
        &self,
        flow_id: &str,
        flow_alias_id: &str,
        inputs: Vec<FlowInput>,
        execution_id: Option<&str>,
    ) -> Result<FlowInvocation> {
        self.run_flow(flow_id, flow_alias_id, inputs, execution_id)
            .await
            .inspect_err(|err| error!(flow_id, "couldn't invoke flow: {err}"))
    }

    async fn run_flow(
        &self,
        flow_id: &str,
        flow_alias_id: &str,
        inputs: Vec<FlowInput>,
        execution_id: Option<&str>,
    ) -> Result<FlowInvocation> {
        let stream = self
            .client()
            .invoke_flow(InvokeFlowRequest {
                flow_id: flow_id.to_string(),
                flow_alias_id: flow_alias_id.to_string(),
                inputs,
                execution_id: execution_id.map(str::to_string),
                enable_trace: true,
            })
            .await?;

        let mut invocation = FlowInvocation {
            execution_id: execution_id.map(str::to_string).or(stream.execution_id),
            ..FlowInvocation::default()
        };
        let mut events = stream.events;
        while let Some(event) = events.next().await {
            match event? {
                FlowEvent::Completion { reason } => invocation.status = reason,
                FlowEvent::InputRequest { node_name, content } => {
                    invocation.input_required = Some(InputRequest { node_name, content })
                }
                FlowEvent::Output { node_name, document } => {
                    info!(flow_id, node_name, "flow output: {document}");
                    invocation.outputs.push(FlowOutput { node_name, document });
                }
                FlowEvent::Trace { trace } => info!(flow_id, "flow trace: {trace}"),
                FlowEvent::Other => {}
            }
        }
        Ok(invocation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playlist_input_targets_the_input_node() {
        let input = playlist_input("pop", 5);
        assert_eq!(input.node_name, "FlowInput");
        assert_eq!(input.node_output_name.as_deref(), Some("document"));
        assert_eq!(input.document, json!({ "genre": "pop", "number": 5 }));
    }
}
