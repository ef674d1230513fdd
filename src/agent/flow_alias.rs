use super::FlowApi;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Test alias that always routes to the working draft of a flow.
pub const TEST_ALIAS_ID: &str = "TSTALIASID";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowAlias {
    pub id: String,
    pub arn: String,
    pub name: String,
    pub flow_id: String,
    /// Versions the alias routes to, in routing order.
    pub versions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateFlowAliasRequest {
    pub flow_id: String,
    pub name: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedFlowAlias {
    pub flow_id: String,
    pub id: String,
}

/// Creates an alias routing to exactly one version of a flow. Returns the alias ID.
pub async fn create_flow_alias(
    client: &dyn FlowApi,
    flow_id: &str,
    version: &str,
    name: &str,
    description: &str,
) -> Result<String> {
    info!(flow_id, version, "creating flow alias");
    let alias = client
        .create_flow_alias(CreateFlowAliasRequest {
            flow_id: flow_id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            version: version.to_string(),
        })
        .await
        .inspect_err(|err| error!(flow_id, "couldn't create flow alias: {err}"))?;
    info!(flow_id, alias_id = %alias.id, "created flow alias");
    Ok(alias.id)
}

pub async fn delete_flow_alias(client: &dyn FlowApi, flow_id: &str, alias_id: &str) -> Result<DeletedFlowAlias> {
    info!(flow_id, alias_id, "deleting flow alias");
    let deleted = client
        .delete_flow_alias(flow_id, alias_id)
        .await
        .inspect_err(|err| error!(flow_id, alias_id, "couldn't delete flow alias: {err}"))?;
    info!(flow_id, alias_id, "deleted flow alias");
    Ok(deleted)
}
