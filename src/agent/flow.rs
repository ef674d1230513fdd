use super::{FlowApi, FlowDefinition};
use crate::error::{CloudAiError, Result};
use crate::poll::{Observation, Poller, StatusSet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info, warn};

pub const NOT_PREPARED: &str = "NotPrepared";
pub const PREPARING: &str = "Preparing";
pub const PREPARED: &str = "Prepared";
pub const FAILED: &str = "Failed";

const PREPARE_POLL: Poller = Poller::new(
    StatusSet {
        in_progress: &[PREPARING],
        complete: &[PREPARED],
        failed: &[FAILED, NOT_PREPARED],
    },
    Duration::from_secs(5),
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    pub id: String,
    pub arn: String,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub execution_role_arn: String,
    pub version: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateFlowRequest {
    pub name: String,
    pub description: Option<String>,
    pub execution_role_arn: String,
    pub definition: FlowDefinition,
}

/// Creates a flow. The new flow is `NotPrepared` until [`prepare_flow`] runs.
pub async fn create_flow(
    client: &dyn FlowApi,
    name: &str,
    description: &str,
    role_arn: &str,
    definition: FlowDefinition,
) -> Result<Flow> {
    info!(name, "creating flow");
    let flow = client
        .create_flow(CreateFlowRequest {
            name: name.to_string(),
            description: Some(description.to_string()),
            execution_role_arn: role_arn.to_string(),
            definition,
        })
        .await
        .inspect_err(|err| error!(name, "couldn't create flow: {err}"))?;
    info!(name, id = %flow.id, "created flow");
    Ok(flow)
}

pub async fn get_flow(client: &dyn FlowApi, flow_id: &str) -> Result<Flow> {
    info!(flow_id, "getting flow");
    let flow = client
        .get_flow(flow_id)
        .await
        .inspect_err(|err| error!(flow_id, "couldn't get flow: {err}"))?;
    info!(flow_id, name = %flow.name, "retrieved flow");
    Ok(flow)
}

/// Prepares a flow and waits while it is `Preparing`.
///
/// Returns the final status. Anything other than `Prepared` is logged as a
/// warning and returned rather than raised.
pub async fn prepare_flow(client: &dyn FlowApi, flow_id: &str) -> Result<String> {
    info!(flow_id, "preparing flow");
    let initial = client
        .prepare_flow(flow_id)
        .await
        .inspect_err(|err| error!(flow_id, "couldn't prepare flow: {err}"))?;

    let mut pending = Some(initial);
    let outcome = PREPARE_POLL
        .wait(flow_id, || {
            let reported = pending.take();
            async move {
                let status = match reported {
                    Some(status) => status,
                    None => client.get_flow(flow_id).await?.status,
                };
                Ok::<_, CloudAiError>(Observation::new(status))
            }
        })
        .await;

    match outcome {
        Ok(observation) => {
            info!(flow_id, status = %observation.status, "finished preparing flow");
            Ok(observation.status)
        }
        Err(CloudAiError::StatusFailed { status, .. } | CloudAiError::UnexpectedStatus { status, .. }) => {
            warn!(flow_id, %status, "flow not prepared");
            Ok(status)
        }
        Err(err) => {
            error!(flow_id, "couldn't get flow status: {err}");
            Err(err)
        }
    }
}

/// Deletes a flow even if an alias still points at it. Returns the flow ID.
pub async fn delete_flow(client: &dyn FlowApi, flow_id: &str) -> Result<String> {
    info!(flow_id, "deleting flow");
    let id = client
        .delete_flow(flow_id, true)
        .await
        .inspect_err(|err| {
            if err.is_not_found() {
                error!(flow_id, "flow not found");
            } else if err.service_code() == Some("AccessDeniedException") {
                error!(flow_id, "not allowed to delete flow");
            } else {
                error!(flow_id, "couldn't delete flow: {err}");
            }
        })?;
    info!(flow_id, "finished deleting flow");
    Ok(id)
}
