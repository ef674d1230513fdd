//! Execution roles that let the agent service run flows.

use crate::convert::to_chrono;
use crate::error::{CloudAiError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

const SERVICE_PRINCIPAL: &str = "bedrock.amazonaws.com";
const ROLE_DESCRIPTION: &str = "Role for Amazon Bedrock operations";
const BASE_ACTIONS: [&str; 3] = [
    "bedrock:InvokeModel",
    "bedrock:Retrieve",
    "bedrock:RetrieveAndGenerate",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub role_name: String,
    pub role_id: String,
    pub arn: String,
    pub create_date: Option<DateTime<Utc>>,
}

/// The identity calls used to manage flow roles.
#[async_trait]
pub trait RoleApi: Send + Sync {
    async fn create_role(
        &self,
        role_name: &str,
        assume_role_policy_document: &str,
        description: &str,
    ) -> Result<Role>;

    async fn put_role_policy(
        &self,
        role_name: &str,
        policy_name: &str,
        policy_document: &str,
    ) -> Result<()>;

    async fn list_role_policies(&self, role_name: &str) -> Result<Vec<String>>;

    async fn delete_role_policy(&self, role_name: &str, policy_name: &str) -> Result<()>;

    async fn delete_role(&self, role_name: &str) -> Result<()>;
}

/// Name of the inline policy attached to a flow role.
pub fn policy_name(role_name: &str) -> String {
    format!("{role_name}-policy")
}

/// Trust policy allowing the agent service to assume the role.
pub fn trust_policy() -> serde_json::Value {
    json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Principal": { "Service": SERVICE_PRINCIPAL },
            "Action": "sts:AssumeRole"
        }]
    })
}

/// Permissions a new flow role starts with: model invocation and retrieval on any resource.
pub fn base_policy() -> serde_json::Value {
    json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Action": BASE_ACTIONS,
            "Resource": "*"
        }]
    })
}

/// Permissions scoped to specific resources, including reading the flow itself.
pub fn scoped_policy(resource_arns: &[String]) -> serde_json::Value {
    let mut actions = vec!["bedrock:GetFlow"];
    actions.extend(BASE_ACTIONS);
    json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Action": actions,
            "Resource": resource_arns
        }]
    })
}

/// Creates a role the agent service can assume to run flows.
pub async fn create_flow_role(client: &dyn RoleApi, role_name: &str) -> Result<Role> {
    info!(role_name, "creating role");
    let result = async {
        let role = client
            .create_role(role_name, &trust_policy().to_string(), ROLE_DESCRIPTION)
            .await?;
        info!("attaching inline policy");
        client
            .put_role_policy(role_name, &policy_name(role_name), &base_policy().to_string())
            .await?;
        Ok::<_, CloudAiError>(role)
    }
    .await;

    match result {
        Ok(role) => {
            info!(arn = %role.arn, "created role");
            Ok(role)
        }
        Err(err) => {
            error!(role_name, "couldn't create role: {err}");
            Err(err)
        }
    }
}

/// Replaces the role's inline policy with one scoped to `resource_arns`.
pub async fn update_role_policy(
    client: &dyn RoleApi,
    role_name: &str,
    resource_arns: &[String],
) -> Result<()> {
    client
        .put_role_policy(
            role_name,
            &policy_name(role_name),
            &scoped_policy(resource_arns).to_string(),
        )
        .await
        .inspect_err(|err| error!(role_name, "couldn't update role policy: {err}"))?;
    info!(role_name, "updated role policy");
    Ok(())
}

/// Deletes every inline policy on the role, then the role.
pub async fn delete_flow_role(client: &dyn RoleApi, role_name: &str) -> Result<()> {
    let result = async {
        for policy in client.list_role_policies(role_name).await? {
            client.delete_role_policy(role_name, &policy).await?;
        }
        client.delete_role(role_name).await
    }
    .await;

    match result {
        Ok(()) => {
            info!(role_name, "deleted role");
            Ok(())
        }
        Err(err) => {
            error!(role_name, "couldn't delete role: {err}");
            Err(err)
        }
    }
}

#[async_trait]
impl RoleApi for aws_sdk_iam::Client {
    async fn create_role(
        &self,
        role_name: &str,
        assume_role_policy_document: &str,
        description: &str,
    ) -> Result<Role> {
        let output = self
            .create_role()
            .role_name(role_name)
            .assume_role_policy_document(assume_role_policy_document)
            .description(description)
            .send()
            .await?;
        let role = output
            .role()
            .ok_or_else(|| CloudAiError::NotFound(format!("role {role_name} in response")))?;
        Ok(Role {
            role_name: role.role_name().to_string(),
            role_id: role.role_id().to_string(),
            arn: role.arn().to_string(),
            create_date: Some(to_chrono(role.create_date())),
        })
    }

    async fn put_role_policy(
        &self,
        role_name: &str,
        policy_name: &str,
        policy_document: &str,
    ) -> Result<()> {
        self.put_role_policy()
            .role_name(role_name)
            .policy_name(policy_name)
            .policy_document(policy_document)
            .send()
            .await?;
        Ok(())
    }

    async fn list_role_policies(&self, role_name: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut marker = None;
        loop {
            let output = self
                .list_role_policies()
                .role_name(role_name)
                .set_marker(marker)
                .send()
                .await?;
            names.extend(output.policy_names().iter().cloned());
            marker = output.marker().map(str::to_string);
            if !output.is_truncated() || marker.is_none() {
                return Ok(names);
            }
        }
    }

    async fn delete_role_policy(&self, role_name: &str, policy_name: &str) -> Result<()> {
        self.delete_role_policy()
            .role_name(role_name)
            .policy_name(policy_name)
            .send()
            .await?;
        Ok(())
    }

    async fn delete_role(&self, role_name: &str) -> Result<()> {
        self.delete_role().role_name(role_name).send().await?;
        Ok(())
    }
}
