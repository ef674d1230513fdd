//! Project policies, which let another account copy a project's models.

use super::CustomLabelsApi;
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{error, info};

const POLICIES_PAGE_SIZE: i32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectPolicy {
    pub project_arn: String,
    pub policy_name: String,
    pub policy_revision_id: String,
    pub policy_document: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyPage {
    pub policies: Vec<ProjectPolicy>,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PutPolicyRequest {
    pub project_arn: String,
    pub policy_name: String,
    pub policy_document: String,
    /// Revision being replaced. `None` attaches a new policy.
    pub policy_revision_id: Option<String>,
}

/// Attaches the JSON policy in `document_path` to a project.
///
/// The document is re-serialized compactly before sending. Pass the current
/// `revision_id` to replace an existing policy. Returns the new revision ID.
pub async fn put_project_policy(
    client: &dyn CustomLabelsApi,
    project_arn: &str,
    policy_name: &str,
    document_path: impl AsRef<Path>,
    revision_id: Option<&str>,
) -> Result<String> {
    info!(policy_name, project_arn, "attaching project policy");
    let result = async {
        let document: serde_json::Value = serde_json::from_slice(&tokio::fs::read(document_path).await?)?;
        client
            .put_project_policy(PutPolicyRequest {
                project_arn: project_arn.to_string(),
                policy_name: policy_name.to_string(),
                policy_document: serde_json::to_string(&document)?,
                policy_revision_id: revision_id.map(str::to_string),
            })
            .await
    }
    .await
    .inspect_err(|err| error!(policy_name, project_arn, "couldn't attach project policy: {err}"))?;
    info!(policy_name, revision_id = %result, "finished creating project policy");
    Ok(result)
}

/// Lists every policy attached to a project.
pub async fn list_project_policies(client: &dyn CustomLabelsApi, project_arn: &str) -> Result<Vec<ProjectPolicy>> {
    info!(project_arn, "listing project policies");
    let mut policies = Vec::new();
    let mut next_token = None;
    loop {
        let page = client
            .list_project_policies(project_arn, POLICIES_PAGE_SIZE, next_token)
            .await
            .inspect_err(|err| error!(project_arn, "couldn't list policies: {err}"))?;
        policies.extend(page.policies);
        next_token = page.next_token;
        if next_token.is_none() {
            break;
        }
    }
    info!(project_arn, count = policies.len(), "finished listing project policies");
    Ok(policies)
}

/// Deletes a project policy, optionally only if it is at `revision_id`.
pub async fn delete_project_policy(
    client: &dyn CustomLabelsApi,
    policy_name: &str,
    project_arn: &str,
    revision_id: Option<&str>,
) -> Result<()> {
    info!(policy_name, "deleting project policy");
    client
        .delete_project_policy(project_arn, policy_name, revision_id.map(str::to_string))
        .await
        .inspect_err(|err| error!(policy_name, "couldn't delete project policy: {err}"))?;
    info!(policy_name, "deleted project policy");
    Ok(())
}

impl std::fmt::Display for ProjectPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Policy name: {}", self.policy_name)?;
        writeln!(f, "Project Arn: {}", self.project_arn)?;
        writeln!(f, "Document: {}", self.policy_document)?;
        write!(f, "Revision ID: {}", self.policy_revision_id)
    }
}
