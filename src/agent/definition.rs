//! Flow definitions in the service's JSON shape.
//!
//! A definition is a graph of nodes joined by connections. Only the node kinds
//! the flow examples use are supported: `Input`, `Output` and `Prompt` nodes,
//! joined by `Data` connections.

use crate::error::{CloudAiError, Result};
use aws_sdk_bedrockagent::types as sdk;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowDefinition {
    #[serde(default)]
    pub nodes: Vec<FlowNode>,
    #[serde(default)]
    pub connections: Vec<FlowConnection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<NodeConfiguration>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<NodeInput>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<NodeOutput>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<PromptNodeConfiguration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptNodeConfiguration {
    pub source_configuration: PromptSource,
}

/// Exactly one of `inline` or `resource` is expected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline: Option<InlinePrompt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<PromptResource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlinePrompt {
    pub model_id: String,
    #[serde(default = "text_template_type")]
    pub template_type: String,
    pub template_configuration: TemplateConfiguration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inference_configuration: Option<InferenceConfiguration>,
}

fn text_template_type() -> String {
    "TEXT".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptResource {
    pub prompt_arn: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateConfiguration {
    pub text: TextTemplate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextTemplate {
    pub text: String,
    #[serde(default)]
    pub input_variables: Vec<InputVariable>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputVariable {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextInference>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextInference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop_sequences: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInput {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeOutput {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowConnection {
    pub name: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<ConnectionConfiguration>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<DataConnection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataConnection {
    pub source_output: String,
    pub target_input: String,
}

impl FlowDefinition {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = tokio::fs::read_to_string(path).await?;
        Self::from_json(&json)
    }

    /// Converts the definition into the SDK request shape.
    ///
    /// # Errors
    ///
    /// `CloudAiError::InvalidArgument` for node or connection kinds other than
    /// `Input`, `Output`, `Prompt` and `Data`, or a prompt node without a source.
    pub fn to_sdk(&self) -> Result<sdk::FlowDefinition> {
        let nodes = self
            .nodes
            .iter()
            .map(FlowNode::to_sdk)
            .collect::<Result<Vec<_>>>()?;
        let connections = self
            .connections
            .iter()
            .map(FlowConnection::to_sdk)
            .collect::<Result<Vec<_>>>()?;
        Ok(sdk::FlowDefinition::builder()
            .set_nodes(Some(nodes))
            .set_connections(Some(connections))
            .build())
    }

    pub fn node(&self, name: &str) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.name == name)
    }
}

impl FlowNode {
    fn to_sdk(&self) -> Result<sdk::FlowNode> {
        let configuration = match self.kind.as_str() {
            "Input" => sdk::FlowNodeConfiguration::Input(
                sdk::InputFlowNodeConfiguration::builder().build(),
            ),
            "Output" => sdk::FlowNodeConfiguration::Output(
                sdk::OutputFlowNodeConfiguration::builder().build(),
            ),
            "Prompt" => {
                let prompt = self
                    .configuration
                    .as_ref()
                    .and_then(|c| c.prompt.as_ref())
                    .ok_or_else(|| {
                        CloudAiError::InvalidArgument(format!(
                            "prompt node {} has no prompt configuration",
                            self.name
                        ))
                    })?;
                sdk::FlowNodeConfiguration::Prompt(prompt.to_sdk(&self.name)?)
            }
            other => {
                return Err(CloudAiError::InvalidArgument(format!(
                    "node {} has unsupported type {other}",
                    self.name
                )))
            }
        };

        let inputs = self
            .inputs
            .iter()
            .map(|input| {
                sdk::FlowNodeInput::builder()
                    .name(&input.name)
                    .r#type(sdk::FlowNodeIoDataType::from(input.data_type.as_str()))
                    .expression(&input.expression)
                    .build()
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let outputs = self
            .outputs
            .iter()
            .map(|output| {
                sdk::FlowNodeOutput::builder()
                    .name(&output.name)
                    .r#type(sdk::FlowNodeIoDataType::from(output.data_type.as_str()))
                    .build()
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(sdk::FlowNode::builder()
            .name(&self.name)
            .r#type(sdk::FlowNodeType::from(self.kind.as_str()))
            .configuration(configuration)
            .set_inputs(Some(inputs))
            .set_outputs(Some(outputs))
            .build()?)
    }
}

impl PromptNodeConfiguration {
    fn to_sdk(&self, node_name: &str) -> Result<sdk::PromptFlowNodeConfiguration> {
        let source = match (&self.source_configuration.inline, &self.source_configuration.resource) {
            (Some(inline), None) => sdk::PromptFlowNodeSourceConfiguration::Inline(inline.to_sdk()?),
            (None, Some(resource)) => sdk::PromptFlowNodeSourceConfiguration::Resource(
                sdk::PromptFlowNodeResourceConfiguration::builder()
                    .prompt_arn(&resource.prompt_arn)
                    .build(),
            ),
            _ => {
                return Err(CloudAiError::InvalidArgument(format!(
                    "prompt node {node_name} needs exactly one of inline or resource"
                )))
            }
        };
        Ok(sdk::PromptFlowNodeConfiguration::builder()
            .source_configuration(source)
            .build())
    }
}

impl InlinePrompt {
    fn to_sdk(&self) -> Result<sdk::PromptFlowNodeInlineConfiguration> {
        let text = &self.template_configuration.text;
        let variables = text
            .input_variables
            .iter()
            .map(|v| sdk::PromptInputVariable::builder().name(&v.name).build())
            .collect();
        let template = sdk::TextPromptTemplateConfiguration::builder()
            .text(&text.text)
            .set_input_variables(Some(variables))
            .build()?;

        let inference = self
            .inference_configuration
            .as_ref()
            .and_then(|c| c.text.as_ref())
            .map(|t| {
                sdk::PromptInferenceConfiguration::Text(
                    sdk::PromptModelInferenceConfiguration::builder()
                        .set_temperature(t.temperature)
                        .set_top_p(t.top_p)
                        .set_max_tokens(t.max_tokens)
                        .set_stop_sequences((!t.stop_sequences.is_empty()).then(|| t.stop_sequences.clone()))
                        .build(),
                )
            });

        Ok(sdk::PromptFlowNodeInlineConfiguration::builder()
            .model_id(&self.model_id)
            .template_type(sdk::PromptTemplateType::from(self.template_type.as_str()))
            .template_configuration(sdk::PromptTemplateConfiguration::Text(template))
            .set_inference_configuration(inference)
            .build())
    }
}

impl FlowConnection {
    fn to_sdk(&self) -> Result<sdk::FlowConnection> {
        if self.kind != "Data" {
            return Err(CloudAiError::InvalidArgument(format!(
                "connection {} has unsupported type {}",
                self.name, self.kind
            )));
        }
        let data = self
            .configuration
            .as_ref()
            .and_then(|c| c.data.as_ref())
            .ok_or_else(|| {
                CloudAiError::InvalidArgument(format!(
                    "data connection {} has no data configuration",
                    self.name
                ))
            })?;

        Ok(sdk::FlowConnection::builder()
            .name(&self.name)
            .source(&self.source)
            .target(&self.target)
            .r#type(sdk::FlowConnectionType::Data)
            .configuration(sdk::FlowConnectionConfiguration::Data(
                sdk::FlowDataConnectionConfiguration::builder()
                    .source_output(&data.source_output)
                    .target_input(&data.target_input)
                    .build()?,
            ))
            .build()?)
    }
}
