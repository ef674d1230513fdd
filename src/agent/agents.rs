//! Agents, their aliases and action groups.

use super::{AgentApi, DRAFT_VERSION};
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Idle session timeout the examples give new agents.
pub const IDLE_SESSION_TTL_SECONDS: i32 = 1800;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub agent_id: String,
    pub agent_name: String,
    pub agent_arn: String,
    pub agent_status: String,
    pub agent_version: String,
    pub foundation_model: Option<String>,
    pub instruction: Option<String>,
    pub description: Option<String>,
    pub idle_session_ttl_in_seconds: i32,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAgentRequest {
    pub agent_name: String,
    pub foundation_model: String,
    pub instruction: String,
    pub description: Option<String>,
    pub agent_resource_role_arn: Option<String>,
    pub idle_session_ttl_in_seconds: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedAgent {
    pub agent_id: String,
    pub agent_status: String,
    pub agent_version: String,
    pub prepared_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentAlias {
    pub agent_id: String,
    pub agent_alias_id: String,
    pub agent_alias_name: String,
    pub agent_alias_arn: String,
    pub agent_alias_status: String,
}

/// An action group whose API is described by an inline OpenAPI document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateActionGroupRequest {
    pub agent_id: String,
    pub agent_version: String,
    pub action_group_name: String,
    pub description: Option<String>,
    pub api_schema: String,
    /// Lambda function that fulfils the actions.
    pub lambda_arn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionGroup {
    pub action_group_id: String,
    pub action_group_name: String,
    pub agent_id: String,
    pub agent_version: String,
    pub action_group_state: String,
}

pub async fn create_agent(
    client: &dyn AgentApi,
    name: &str,
    foundation_model: &str,
    instruction: &str,
    description: Option<&str>,
    role_arn: Option<&str>,
) -> Result<Agent> {
    info!(name, foundation_model, "creating agent");
    let agent = client
        .create_agent(CreateAgentRequest {
            agent_name: name.to_string(),
            foundation_model: foundation_model.to_string(),
            instruction: instruction.to_string(),
            description: description.map(str::to_string),
            agent_resource_role_arn: role_arn.map(str::to_string),
            idle_session_ttl_in_seconds: IDLE_SESSION_TTL_SECONDS,
        })
        .await
        .inspect_err(|err| error!(name, "couldn't create agent: {err}"))?;
    info!(agent_id = %agent.agent_id, status = %agent.agent_status, "created agent");
    Ok(agent)
}

pub async fn get_agent(client: &dyn AgentApi, agent_id: &str) -> Result<Agent> {
    client
        .get_agent(agent_id)
        .await
        .inspect_err(|err| error!(agent_id, "couldn't get agent: {err}"))
}

/// Deletes an agent, refusing if it is still in use. Returns the reported status.
pub async fn delete_agent(client: &dyn AgentApi, agent_id: &str) -> Result<String> {
    info!(agent_id, "deleting agent");
    let status = client
        .delete_agent(agent_id, false)
        .await
        .inspect_err(|err| error!(agent_id, "couldn't delete agent: {err}"))?;
    info!(agent_id, %status, "deleted agent");
    Ok(status)
}

/// Builds the working draft so it can be tested. Preparation continues after this returns.
pub async fn prepare_agent(client: &dyn AgentApi, agent_id: &str) -> Result<PreparedAgent> {
    info!(agent_id, "preparing agent");
    let prepared = client
        .prepare_agent(agent_id)
        .await
        .inspect_err(|err| error!(agent_id, "couldn't prepare agent: {err}"))?;
    info!(agent_id, status = %prepared.agent_status, "agent preparation started");
    Ok(prepared)
}

/// Creates an alias routed to the agent's working draft.
pub async fn create_agent_alias(
    client: &dyn AgentApi,
    agent_id: &str,
    alias_name: &str,
    description: &str,
) -> Result<AgentAlias> {
    info!(agent_id, alias_name, "creating agent alias");
    let alias = client
        .create_agent_alias(agent_id, alias_name, description, DRAFT_VERSION)
        .await
        .inspect_err(|err| error!(agent_id, alias_name, "couldn't create agent alias: {err}"))?;
    info!(agent_id, alias_id = %alias.agent_alias_id, "created agent alias");
    Ok(alias)
}

pub async fn delete_agent_alias(client: &dyn AgentApi, agent_id: &str, alias_id: &str) -> Result<String> {
    info!(agent_id, alias_id, "deleting agent alias");
    let status = client
        .delete_agent_alias(agent_id, alias_id)
        .await
        .inspect_err(|err| error!(agent_id, alias_id, "couldn't delete agent alias: {err}"))?;
    Ok(status)
}

/// Adds an action group to the agent's working draft.
pub async fn create_agent_action_group(
    client: &dyn AgentApi,
    agent_id: &str,
    name: &str,
    api_schema: &str,
    description: Option<&str>,
    lambda_arn: Option<&str>,
) -> Result<ActionGroup> {
    info!(agent_id, name, "creating action group");
    let group = client
        .create_agent_action_group(CreateActionGroupRequest {
            agent_id: agent_id.to_string(),
            agent_version: DRAFT_VERSION.to_string(),
            action_group_name: name.to_string(),
            description: description.map(str::to_string),
            api_schema: api_schema.to_string(),
            lambda_arn: lambda_arn.map(str::to_string),
        })
        .await
        .inspect_err(|err| error!(agent_id, name, "couldn't create action group: {err}"))?;
    info!(agent_id, action_group_id = %group.action_group_id, "created action group");
    Ok(group)
}

pub async fn delete_agent_action_group(client: &dyn AgentApi, agent_id: &str, action_group_id: &str) -> Result<()> {
    info!(agent_id, action_group_id, "deleting action group");
    client
        .delete_agent_action_group(agent_id, DRAFT_VERSION, action_group_id, false)
        .await
        .inspect_err(|err| error!(agent_id, action_group_id, "couldn't delete action group: {err}"))
}
