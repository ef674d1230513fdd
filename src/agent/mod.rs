//! Agent control plane: flows, flow versions and aliases, managed prompts and agents.
//!
//! Every operation takes its client as `&dyn FlowApi`, `&dyn PromptApi` or
//! `&dyn AgentApi`. The SDK client implements all three in [`sdk`].

pub mod agents;
pub mod definition;
pub mod flow;
pub mod flow_alias;
pub mod flow_version;
pub mod prompt;
mod sdk;

use crate::error::Result;
use async_trait::async_trait;

pub use agents::{ActionGroup, Agent, AgentAlias, CreateActionGroupRequest, CreateAgentRequest, PreparedAgent};
pub use definition::FlowDefinition;
pub use flow::{CreateFlowRequest, Flow};
pub use flow_alias::{CreateFlowAliasRequest, DeletedFlowAlias, FlowAlias};
pub use flow_version::{DeletedFlowVersion, FlowVersion};
pub use prompt::{Prompt, PromptPage, PromptSummary, PromptUpdate, PromptVariant, UpdatePromptRequest};

/// Working draft version of an agent.
pub const DRAFT_VERSION: &str = "DRAFT";

#[async_trait]
pub trait FlowApi: Send + Sync {
    async fn create_flow(&self, request: CreateFlowRequest) -> Result<Flow>;

    async fn get_flow(&self, flow_id: &str) -> Result<Flow>;

    /// Starts preparing the flow and returns the status reported right away.
    async fn prepare_flow(&self, flow_id: &str) -> Result<String>;

    /// Returns the ID of the deleted flow.
    async fn delete_flow(&self, flow_id: &str, skip_resource_in_use_check: bool) -> Result<String>;

    async fn create_flow_version(&self, flow_id: &str, description: &str) -> Result<FlowVersion>;

    async fn get_flow_version(&self, flow_id: &str, version: &str) -> Result<FlowVersion>;

    async fn delete_flow_version(&self, flow_id: &str, version: &str) -> Result<DeletedFlowVersion>;

    async fn create_flow_alias(&self, request: CreateFlowAliasRequest) -> Result<FlowAlias>;

    async fn delete_flow_alias(&self, flow_id: &str, alias_id: &str) -> Result<DeletedFlowAlias>;
}

#[async_trait]
pub trait PromptApi: Send + Sync {
    async fn create_prompt(
        &self,
        name: &str,
        description: &str,
        variant: PromptVariant,
    ) -> Result<Prompt>;

    async fn get_prompt(&self, prompt_id: &str) -> Result<Prompt>;

    async fn update_prompt(&self, prompt_id: &str, request: UpdatePromptRequest) -> Result<Prompt>;

    /// Returns the ID of the deleted prompt.
    async fn delete_prompt(&self, prompt_id: &str) -> Result<String>;

    async fn list_prompts(&self, max_results: i32, next_token: Option<String>) -> Result<PromptPage>;
}

#[async_trait]
pub trait AgentApi: Send + Sync {
    async fn create_agent(&self, request: CreateAgentRequest) -> Result<Agent>;

    async fn get_agent(&self, agent_id: &str) -> Result<Agent>;

    /// Returns the agent status reported by the delete call.
    async fn delete_agent(&self, agent_id: &str, skip_resource_in_use_check: bool) -> Result<String>;

    async fn prepare_agent(&self, agent_id: &str) -> Result<PreparedAgent>;

    async fn create_agent_alias(
        &self,
        agent_id: &str,
        alias_name: &str,
        description: &str,
        agent_version: &str,
    ) -> Result<AgentAlias>;

    /// Returns the alias status reported by the delete call.
    async fn delete_agent_alias(&self, agent_id: &str, alias_id: &str) -> Result<String>;

    async fn create_agent_action_group(&self, request: CreateActionGroupRequest) -> Result<ActionGroup>;

    async fn delete_agent_action_group(
        &self,
        agent_id: &str,
        agent_version: &str,
        action_group_id: &str,
        skip_resource_in_use_check: bool,
    ) -> Result<()>;
}
