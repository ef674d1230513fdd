//! Control-plane traits implemented by the SDK client.

use super::agents::{ActionGroup, Agent, AgentAlias, CreateActionGroupRequest, CreateAgentRequest, PreparedAgent};
use super::flow::{CreateFlowRequest, Flow};
use super::flow_alias::{CreateFlowAliasRequest, DeletedFlowAlias, FlowAlias};
use super::flow_version::{DeletedFlowVersion, FlowVersion};
use super::prompt::{Prompt, PromptPage, PromptSummary, PromptVariant, UpdatePromptRequest};
use super::{AgentApi, FlowApi, PromptApi};
use crate::convert::to_chrono;
use crate::error::{CloudAiError, Result};
use async_trait::async_trait;
use aws_sdk_bedrockagent::types as sdk;
use aws_sdk_bedrockagent::Client;

// Create, get and update outputs are distinct SDK types with the same accessors.
macro_rules! flow_from_output {
    ($output:expr) => {{
        let output = &$output;
        Flow {
            id: output.id().to_string(),
            arn: output.arn().to_string(),
            name: output.name().to_string(),
            description: output.description().map(str::to_string),
            status: output.status().as_str().to_string(),
            execution_role_arn: output.execution_role_arn().to_string(),
            version: output.version().to_string(),
            created_at: Some(to_chrono(output.created_at())),
            updated_at: Some(to_chrono(output.updated_at())),
        }
    }};
}

macro_rules! flow_version_from_output {
    ($output:expr) => {{
        let output = &$output;
        FlowVersion {
            id: output.id().to_string(),
            arn: output.arn().to_string(),
            name: output.name().to_string(),
            version: output.version().to_string(),
            status: output.status().as_str().to_string(),
            description: output.description().map(str::to_string),
            created_at: Some(to_chrono(output.created_at())),
        }
    }};
}

macro_rules! prompt_from_output {
    ($output:expr) => {{
        let output = &$output;
        Prompt {
            id: output.id().to_string(),
            arn: output.arn().to_string(),
            name: output.name().to_string(),
            description: output.description().map(str::to_string),
            version: output.version().to_string(),
            default_variant: output.default_variant().map(str::to_string),
            variants: output.variants().iter().map(variant_from_sdk).collect(),
            created_at: Some(to_chrono(output.created_at())),
            updated_at: Some(to_chrono(output.updated_at())),
        }
    }};
}

#[async_trait]
impl FlowApi for Client {
    async fn create_flow(&self, request: CreateFlowRequest) -> Result<Flow> {
        let output = self
            .create_flow()
            .name(request.name)
            .set_description(request.description)
            .execution_role_arn(request.execution_role_arn)
            .definition(request.definition.to_sdk()?)
            .send()
            .await?;
        Ok(flow_from_output!(output))
    }

    async fn get_flow(&self, flow_id: &str) -> Result<Flow> {
        let output = self.get_flow().flow_identifier(flow_id).send().await?;
        Ok(flow_from_output!(output))
    }

    async fn prepare_flow(&self, flow_id: &str) -> Result<String> {
        let output = self.prepare_flow().flow_identifier(flow_id).send().await?;
        Ok(output.status().as_str().to_string())
    }

    async fn delete_flow(&self, flow_id: &str, skip_resource_in_use_check: bool) -> Result<String> {
        let output = self
            .delete_flow()
            .flow_identifier(flow_id)
            .skip_resource_in_use_check(skip_resource_in_use_check)
            .send()
            .await?;
        Ok(output.id().to_string())
    }

    async fn create_flow_version(&self, flow_id: &str, description: &str) -> Result<FlowVersion> {
        let output = self
            .create_flow_version()
            .flow_identifier(flow_id)
            .description(description)
            .send()
            .await?;
        Ok(flow_version_from_output!(output))
    }

    async fn get_flow_version(&self, flow_id: &str, version: &str) -> Result<FlowVersion> {
        let output = self
            .get_flow_version()
            .flow_identifier(flow_id)
            .flow_version(version)
            .send()
            .await?;
        Ok(flow_version_from_output!(output))
    }

    async fn delete_flow_version(&self, flow_id: &str, version: &str) -> Result<DeletedFlowVersion> {
        let output = self
            .delete_flow_version()
            .flow_identifier(flow_id)
            .flow_version(version)
            .send()
            .await?;
        Ok(DeletedFlowVersion {
            id: output.id().to_string(),
            version: output.version().to_string(),
        })
    }

    async fn create_flow_alias(&self, request: CreateFlowAliasRequest) -> Result<FlowAlias> {
        let output = self
            .create_flow_alias()
            .flow_identifier(request.flow_id)
            .name(request.name)
            .description(request.description)
            .routing_configuration(
                sdk::FlowAliasRoutingConfigurationListItem::builder()
                    .flow_version(request.version)
                    .build(),
            )
            .send()
            .await?;
        Ok(FlowAlias {
            id: output.id().to_string(),
            arn: output.arn().to_string(),
            name: output.name().to_string(),
            flow_id: output.flow_id().to_string(),
            versions: output
                .routing_configuration()
                .iter()
                .filter_map(|r| r.flow_version().map(str::to_string))
                .collect(),
        })
    }

    async fn delete_flow_alias(&self, flow_id: &str, alias_id: &str) -> Result<DeletedFlowAlias> {
        let output = self
            .delete_flow_alias()
            .flow_identifier(flow_id)
            .alias_identifier(alias_id)
            .send()
            .await?;
        Ok(DeletedFlowAlias {
            flow_id: output.flow_id().to_string(),
            id: output.id().to_string(),
        })
    }
}

fn variant_to_sdk(variant: PromptVariant) -> Result<sdk::PromptVariant> {
    let input_variables = variant
        .input_variables
        .iter()
        .map(|name| sdk::PromptInputVariable::builder().name(name).build())
        .collect();
    let template = sdk::TextPromptTemplateConfiguration::builder()
        .text(variant.text)
        .set_input_variables(Some(input_variables))
        .build()?;
    Ok(sdk::PromptVariant::builder()
        .name(variant.name)
        .template_type(sdk::PromptTemplateType::Text)
        .template_configuration(sdk::PromptTemplateConfiguration::Text(template))
        .set_model_id(variant.model_id)
        .build()?)
}

fn variant_from_sdk(variant: &sdk::PromptVariant) -> PromptVariant {
    let text = variant
        .template_configuration()
        .and_then(|c| c.as_text().ok());
    PromptVariant {
        name: variant.name().to_string(),
        text: text.map(|t| t.text().to_string()).unwrap_or_default(),
        input_variables: text
            .map(|t| {
                t.input_variables()
                    .iter()
                    .filter_map(|v| v.name().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default(),
        model_id: variant.model_id().map(str::to_string),
    }
}

#[async_trait]
impl PromptApi for Client {
    async fn create_prompt(&self, name: &str, description: &str, variant: PromptVariant) -> Result<Prompt> {
        let default_variant = variant.name.clone();
        let output = self
            .create_prompt()
            .name(name)
            .description(description)
            .variants(variant_to_sdk(variant)?)
            .default_variant(default_variant)
            .send()
            .await?;
        Ok(prompt_from_output!(output))
    }

    async fn get_prompt(&self, prompt_id: &str) -> Result<Prompt> {
        let output = self.get_prompt().prompt_identifier(prompt_id).send().await?;
        Ok(prompt_from_output!(output))
    }

    async fn update_prompt(&self, prompt_id: &str, request: UpdatePromptRequest) -> Result<Prompt> {
        let variants = request.variant.map(variant_to_sdk).transpose()?.map(|v| vec![v]);
        let output = self
            .update_prompt()
            .prompt_identifier(prompt_id)
            .name(request.name)
            .set_description(request.description)
            .set_variants(variants)
            .send()
            .await?;
        Ok(prompt_from_output!(output))
    }

    async fn delete_prompt(&self, prompt_id: &str) -> Result<String> {
        let output = self.delete_prompt().prompt_identifier(prompt_id).send().await?;
        Ok(output.id().to_string())
    }

    async fn list_prompts(&self, max_results: i32, next_token: Option<String>) -> Result<PromptPage> {
        let output = self
            .list_prompts()
            .max_results(max_results)
            .set_next_token(next_token)
            .send()
            .await?;
        Ok(PromptPage {
            summaries: output
                .prompt_summaries()
                .iter()
                .map(|s| PromptSummary {
                    id: s.id().to_string(),
                    arn: s.arn().to_string(),
                    name: s.name().to_string(),
                    description: s.description().map(str::to_string),
                    version: s.version().to_string(),
                    created_at: Some(to_chrono(s.created_at())),
                    updated_at: Some(to_chrono(s.updated_at())),
                })
                .collect(),
            next_token: output.next_token().map(str::to_string),
        })
    }
}

fn agent_from_sdk(agent: &sdk::Agent) -> Agent {
    Agent {
        agent_id: agent.agent_id().to_string(),
        agent_name: agent.agent_name().to_string(),
        agent_arn: agent.agent_arn().to_string(),
        agent_status: agent.agent_status().as_str().to_string(),
        agent_version: agent.agent_version().to_string(),
        foundation_model: agent.foundation_model().map(str::to_string),
        instruction: agent.instruction().map(str::to_string),
        description: agent.description().map(str::to_string),
        idle_session_ttl_in_seconds: agent.idle_session_ttl_in_seconds(),
        created_at: Some(to_chrono(agent.created_at())),
    }
}

#[async_trait]
impl AgentApi for Client {
    async fn create_agent(&self, request: CreateAgentRequest) -> Result<Agent> {
        let output = self
            .create_agent()
            .agent_name(request.agent_name)
            .foundation_model(request.foundation_model)
            .instruction(request.instruction)
            .set_description(request.description)
            .set_agent_resource_role_arn(request.agent_resource_role_arn)
            .idle_session_ttl_in_seconds(request.idle_session_ttl_in_seconds)
            .send()
            .await?;
        output
            .agent()
            .map(agent_from_sdk)
            .ok_or_else(|| CloudAiError::NotFound("agent in create response".into()))
    }

    async fn get_agent(&self, agent_id: &str) -> Result<Agent> {
        let output = self.get_agent().agent_id(agent_id).send().await?;
        output
            .agent()
            .map(agent_from_sdk)
            .ok_or_else(|| CloudAiError::NotFound(format!("agent {agent_id}")))
    }

    async fn delete_agent(&self, agent_id: &str, skip_resource_in_use_check: bool) -> Result<String> {
        let output = self
            .delete_agent()
            .agent_id(agent_id)
            .skip_resource_in_use_check(skip_resource_in_use_check)
            .send()
            .await?;
        Ok(output.agent_status().as_str().to_string())
    }

    async fn prepare_agent(&self, agent_id: &str) -> Result<PreparedAgent> {
        let output = self.prepare_agent().agent_id(agent_id).send().await?;
        Ok(PreparedAgent {
            agent_id: output.agent_id().to_string(),
            agent_status: output.agent_status().as_str().to_string(),
            agent_version: output.agent_version().to_string(),
            prepared_at: Some(to_chrono(output.prepared_at())),
        })
    }

    async fn create_agent_alias(
        &self,
        agent_id: &str,
        alias_name: &str,
        description: &str,
        agent_version: &str,
    ) -> Result<AgentAlias> {
        let output = self
            .create_agent_alias()
            .agent_id(agent_id)
            .agent_alias_name(alias_name)
            .description(description)
            .routing_configuration(
                sdk::AgentAliasRoutingConfigurationListItem::builder()
                    .agent_version(agent_version)
                    .build(),
            )
            .send()
            .await?;
        let alias = output
            .agent_alias()
            .ok_or_else(|| CloudAiError::NotFound("agent alias in create response".into()))?;
        Ok(AgentAlias {
            agent_id: alias.agent_id().to_string(),
            agent_alias_id: alias.agent_alias_id().to_string(),
            agent_alias_name: alias.agent_alias_name().to_string(),
            agent_alias_arn: alias.agent_alias_arn().to_string(),
            agent_alias_status: alias.agent_alias_status().as_str().to_string(),
        })
    }

    async fn delete_agent_alias(&self, agent_id: &str, alias_id: &str) -> Result<String> {
        let output = self
            .delete_agent_alias()
            .agent_id(agent_id)
            .agent_alias_id(alias_id)
            .send()
            .await?;
        Ok(output.agent_alias_status().as_str().to_string())
    }

    async fn create_agent_action_group(&self, request: CreateActionGroupRequest) -> Result<ActionGroup> {
        let output = self
            .create_agent_action_group()
            .agent_id(request.agent_id)
            .agent_version(request.agent_version)
            .action_group_name(request.action_group_name)
            .set_description(request.description)
            .api_schema(sdk::ApiSchema::Payload(request.api_schema))
            .set_action_group_executor(request.lambda_arn.map(sdk::ActionGroupExecutor::Lambda))
            .send()
            .await?;
        let group = output
            .agent_action_group()
            .ok_or_else(|| CloudAiError::NotFound("action group in create response".into()))?;
        Ok(ActionGroup {
            action_group_id: group.action_group_id().to_string(),
            action_group_name: group.action_group_name().to_string(),
            agent_id: group.agent_id().to_string(),
            agent_version: group.agent_version().to_string(),
            action_group_state: group.action_group_state().as_str().to_string(),
        })
    }

    async fn delete_agent_action_group(
        &self,
        agent_id: &str,
        agent_version: &str,
        action_group_id: &str,
        skip_resource_in_use_check: bool,
    ) -> Result<()> {
        self.delete_agent_action_group()
            .agent_id(agent_id)
            .agent_version(agent_version)
            .action_group_id(action_group_id)
            .skip_resource_in_use_check(skip_resource_in_use_check)
            .send()
            .await?;
        Ok(())
    }
}
