use super::CustomLabelsApi;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// A model whose tags matched a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedModel {
    pub project_arn: String,
    pub model_arn: String,
}

/// Finds every model, across all projects, tagged with `key` set to `value`.
pub async fn find_tag_in_projects(client: &dyn CustomLabelsApi, key: &str, value: &str) -> Result<Vec<TaggedModel>> {
    search(client, key, value)
        .await
        .inspect_err(|err| error!(key, value, "problem finding tags: {err}"))
}

async fn search(client: &dyn CustomLabelsApi, key: &str, value: &str) -> Result<Vec<TaggedModel>> {
    let mut found = Vec::new();
    for project in client.describe_projects(None).await? {
        info!(project_arn = %project.project_arn, "searching project");
        for model in client.describe_project_versions(&project.project_arn, None).await? {
            info!(model_arn = %model.model_arn, key, value, "searching model for tag");
            let tags = client.list_tags_for_resource(&model.model_arn).await?;
            if tags.get(key).map(String::as_str) == Some(value) {
                info!(project_arn = %project.project_arn, model_arn = %model.model_arn, "match");
                found.push(TaggedModel {
                    project_arn: project.project_arn.clone(),
                    model_arn: model.model_arn,
                });
            }
        }
    }
    if found.is_empty() {
        info!(key, value, "no match for tag");
    }
    Ok(found)
}
