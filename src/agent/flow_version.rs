use super::FlowApi;
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// An immutable snapshot of a flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowVersion {
    pub id: String,
    pub arn: String,
    pub name: String,
    pub version: String,
    pub status: String,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedFlowVersion {
    pub id: String,
    pub version: String,
}

/// Snapshots the working draft of a flow. Returns the new version number.
pub async fn create_flow_version(client: &dyn FlowApi, flow_id: &str, description: &str) -> Result<String> {
    info!(flow_id, "creating flow version");
    let version = client
        .create_flow_version(flow_id, description)
        .await
        .inspect_err(|err| error!(flow_id, "couldn't create flow version: {err}"))?;
    info!(flow_id, version = %version.version, "created flow version");
    Ok(version.version)
}

pub async fn get_flow_version(client: &dyn FlowApi, flow_id: &str, version: &str) -> Result<FlowVersion> {
    info!(flow_id, version, "getting flow version");
    let flow_version = client
        .get_flow_version(flow_id, version)
        .await
        .inspect_err(|err| error!(flow_id, version, "couldn't get flow version: {err}"))?;
    info!(flow_id, version, "retrieved flow version");
    Ok(flow_version)
}

pub async fn delete_flow_version(
    client: &dyn FlowApi,
    flow_id: &str,
    version: &str,
) -> Result<DeletedFlowVersion> {
    info!(flow_id, version, "deleting flow version");
    let deleted = client
        .delete_flow_version(flow_id, version)
        .await
        .inspect_err(|err| error!(flow_id, version, "couldn't delete flow version: {err}"))?;
    info!(flow_id, version, "deleted flow version");
    Ok(deleted)
}
