//! Runtime traits implemented by the SDK clients.

use super::{
    AgentEvent, AgentRuntimeApi, ConverseApi, EventStream, FlowEvent, FlowStream, InvokeAgentRequest,
    InvokeFlowRequest, OutputFile,
};
use crate::convert::{document_to_json_value, json_value_to_document};
use crate::error::{CloudAiError, Result};
use async_stream::try_stream;
use async_trait::async_trait;
use aws_sdk_bedrockagentruntime::primitives::Blob;
use aws_sdk_bedrockagentruntime::types::{
    ByteContentFile, FileSource, FileSourceType, FileUseCase, FlowInput, FlowInputContent,
    FlowResponseStream, InputFile, ResponseStream, SessionState,
};
use aws_sdk_bedrockruntime::types::PromptVariableValues;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

fn agent_event(event: ResponseStream) -> AgentEvent {
    match event {
        ResponseStream::Chunk(part) => AgentEvent::Chunk {
            bytes: part.bytes().map(|b| b.as_ref().to_vec()).unwrap_or_default(),
        },
        ResponseStream::Files(part) => AgentEvent::Files {
            files: part
                .files()
                .iter()
                .map(|f| OutputFile {
                    name: f.name().map(str::to_string),
                    media_type: f.r#type().map(str::to_string),
                    bytes: f.bytes().map(|b| b.as_ref().to_vec()).unwrap_or_default(),
                })
                .collect(),
        },
        ResponseStream::Trace(part) => AgentEvent::Trace {
            trace: format!("{:?}", part.trace()),
        },
        _ => AgentEvent::Other,
    }
}

fn flow_event(event: FlowResponseStream) -> FlowEvent {
    match event {
        FlowResponseStream::FlowOutputEvent(e) => FlowEvent::Output {
            node_name: e.node_name().to_string(),
            document: e
                .content()
                .and_then(|c| c.as_document().ok())
                .map(document_to_json_value)
                .unwrap_or(Value::Null),
        },
        FlowResponseStream::FlowCompletionEvent(e) => FlowEvent::Completion {
            reason: e.completion_reason().as_str().to_string(),
        },
        FlowResponseStream::FlowMultiTurnInputRequestEvent(e) => FlowEvent::InputRequest {
            node_name: e.node_name().to_string(),
            content: e
                .content()
                .and_then(|c| c.as_document().ok())
                .map(document_to_json_value)
                .unwrap_or(Value::Null),
        },
        FlowResponseStream::FlowTraceEvent(e) => FlowEvent::Trace {
            trace: format!("{:?}", e.trace()),
        },
        _ => FlowEvent::Other,
    }
}

fn code_interpreter_file(file: super::InputFile) -> Result<InputFile> {
    let content = ByteContentFile::builder()
        .media_type(file.media_type)
        .data(Blob::new(file.data))
        .build()?;
    let source = FileSource::builder()
        .source_type(FileSourceType::ByteContent)
        .byte_content(content)
        .build()?;
    Ok(InputFile::builder()
        .name(file.name)
        .source(source)
        .use_case(FileUseCase::CodeInterpreter)
        .build()?)
}

#[async_trait]
impl AgentRuntimeApi for aws_sdk_bedrockagentruntime::Client {
    async fn invoke_agent(&self, request: InvokeAgentRequest) -> Result<EventStream<AgentEvent>> {
        let files = request
            .files
            .into_iter()
            .map(code_interpreter_file)
            .collect::<Result<Vec<_>>>()?;
        let session_state =
            (!files.is_empty()).then(|| SessionState::builder().set_files(Some(files)).build());

        let mut output = self
            .invoke_agent()
            .agent_id(request.agent_id)
            .agent_alias_id(request.agent_alias_id)
            .session_id(request.session_id)
            .input_text(request.input_text)
            .enable_trace(request.enable_trace)
            .set_session_state(session_state)
            .send()
            .await?;
        debug!(session_id = output.session_id(), "agent invocation started");

        let events = try_stream! {
            while let Some(event) = output.completion.recv().await.map_err(CloudAiError::from)? {
                yield agent_event(event);
            }
        };
        Ok(Box::pin(events))
    }

    async fn invoke_flow(&self, request: InvokeFlowRequest) -> Result<FlowStream> {
        let inputs = request
            .inputs
            .into_iter()
            .map(|input| {
                FlowInput::builder()
                    .node_name(input.node_name)
                    .set_node_output_name(input.node_output_name)
                    .set_node_input_name(input.node_input_name)
                    .content(FlowInputContent::Document(json_value_to_document(&input.document)))
                    .build()
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut output = self
            .invoke_flow()
            .flow_identifier(request.flow_id)
            .flow_alias_identifier(request.flow_alias_id)
            .set_inputs(Some(inputs))
            .set_execution_id(request.execution_id)
            .enable_trace(request.enable_trace)
            .send()
            .await?;
        let execution_id = output.execution_id().map(str::to_string);

        let events = try_stream! {
            while let Some(event) = output.response_stream.recv().await.map_err(CloudAiError::from)? {
                yield flow_event(event);
            }
        };
        Ok(FlowStream {
            execution_id,
            events: Box::pin(events),
        })
    }
}

#[async_trait]
impl ConverseApi for aws_sdk_bedrockruntime::Client {
    async fn converse_with_prompt(
        &self,
        prompt_arn: &str,
        variables: &BTreeMap<String, String>,
    ) -> Result<Vec<String>> {
        let prompt_variables: HashMap<String, PromptVariableValues> = variables
            .iter()
            .map(|(name, value)| (name.clone(), PromptVariableValues::Text(value.clone())))
            .collect();

        let output = self
            .converse()
            .model_id(prompt_arn)
            .set_prompt_variables(Some(prompt_variables))
            .send()
            .await?;

        Ok(output
            .output()
            .and_then(|o| o.as_message().ok())
            .map(|message| {
                message
                    .content()
                    .iter()
                    .filter_map(|block| block.as_text().ok().cloned())
                    .collect()
            })
            .unwrap_or_default())
    }
}
