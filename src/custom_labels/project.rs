use super::{project_name_from_arn, CustomLabelsApi};
use crate::error::{CloudAiError, Result};
use crate::poll::wait_until_gone;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

const DELETE_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDescription {
    pub project_arn: String,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
    pub datasets: Vec<DatasetMetadata>,
}

/// A dataset as listed in its project's description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub dataset_arn: String,
    pub dataset_type: String,
    pub status: String,
    pub status_message: Option<String>,
    pub status_message_code: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Describes one project by name, or every project in the account and region.
pub async fn describe_projects(
    client: &dyn CustomLabelsApi,
    project_name: Option<&str>,
) -> Result<Vec<ProjectDescription>> {
    match project_name {
        Some(name) => info!(name, "describing project"),
        None => info!("describing all projects"),
    }
    let projects = client
        .describe_projects(project_name.map(|name| vec![name.to_string()]))
        .await
        .inspect_err(|err| error!(?project_name, "couldn't describe project: {err}"))?;
    info!(count = projects.len(), "finished project description");
    Ok(projects)
}

/// Creates a project and returns its ARN.
pub async fn create_project(client: &dyn CustomLabelsApi, project_name: &str) -> Result<String> {
    info!(project_name, "creating project");
    let arn = client
        .create_project(project_name)
        .await
        .inspect_err(|err| error!(project_name, "couldn't create project: {err}"))?;
    info!(project_name, %arn, "created project");
    Ok(arn)
}

/// Deletes a project and waits until describing it by name returns nothing.
pub async fn delete_project(client: &dyn CustomLabelsApi, project_arn: &str) -> Result<()> {
    info!(project_arn, "deleting project");
    let name = project_name_from_arn(project_arn)?;
    let status = client
        .delete_project(project_arn)
        .await
        .inspect_err(|err| error!(project_arn, "couldn't delete project: {err}"))?;
    info!(project_arn, %status, "project deletion started");

    wait_until_gone(project_arn, DELETE_INTERVAL, || async move {
        let projects = client.describe_projects(Some(vec![name.to_string()])).await?;
        Ok::<_, CloudAiError>(!projects.is_empty())
    })
    .await
    .inspect_err(|err| error!(project_arn, "couldn't confirm project deletion: {err}"))
}
