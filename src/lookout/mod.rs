//! Anomaly-detection vision projects and their datasets.

pub mod export;
mod sdk;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

pub use export::export_datasets;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookoutProject {
    pub project_name: String,
    pub project_arn: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookoutDataset {
    /// `train` or `test`.
    pub dataset_type: String,
    pub status: String,
    pub status_message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LookoutEntryPage {
    pub entries: Vec<String>,
    pub next_token: Option<String>,
}

#[async_trait]
pub trait LookoutVisionApi: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<LookoutProject>>;

    /// The datasets of a project.
    async fn describe_project(&self, project_name: &str) -> Result<Vec<LookoutDataset>>;

    async fn list_dataset_entries(
        &self,
        project_name: &str,
        dataset_type: &str,
        next_token: Option<String>,
    ) -> Result<LookoutEntryPage>;
}

/// Lists the projects in the account and region.
pub async fn list_projects(client: &dyn LookoutVisionApi) -> Result<Vec<LookoutProject>> {
    let projects = client
        .list_projects()
        .await
        .inspect_err(|err| error!("couldn't list projects: {err}"))?;
    info!(count = projects.len(), "listed projects");
    Ok(projects)
}
