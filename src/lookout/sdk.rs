use super::{LookoutDataset, LookoutEntryPage, LookoutProject, LookoutVisionApi};
use crate::convert::to_chrono_opt;
use crate::error::Result;
use async_trait::async_trait;
use aws_sdk_lookoutvision::Client;

#[async_trait]
impl LookoutVisionApi for Client {
    async fn list_projects(&self) -> Result<Vec<LookoutProject>> {
        let mut projects = Vec::new();
        let mut next_token = None;
        loop {
            let output = self.list_projects().set_next_token(next_token).send().await?;
            projects.extend(output.projects().iter().map(|project| LookoutProject {
                project_name: project.project_name().unwrap_or_default().to_string(),
                project_arn: project.project_arn().unwrap_or_default().to_string(),
                created_at: to_chrono_opt(project.creation_timestamp()),
            }));
            next_token = output.next_token().map(str::to_string);
            if next_token.is_none() {
                return Ok(projects);
            }
        }
    }

    async fn describe_project(&self, project_name: &str) -> Result<Vec<LookoutDataset>> {
        let output = self.describe_project().project_name(project_name).send().await?;
        Ok(output
            .project_description()
            .map(|project| {
                project
                    .datasets()
                    .iter()
                    .map(|dataset| LookoutDataset {
                        dataset_type: dataset.dataset_type().unwrap_or_default().to_string(),
                        status: dataset.status().map(|s| s.as_str().to_string()).unwrap_or_default(),
                        status_message: dataset.status_message().map(str::to_string),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn list_dataset_entries(
        &self,
        project_name: &str,
        dataset_type: &str,
        next_token: Option<String>,
    ) -> Result<LookoutEntryPage> {
        let output = self
            .list_dataset_entries()
            .project_name(project_name)
            .dataset_type(dataset_type)
            .set_next_token(next_token)
            .send()
            .await?;
        Ok(LookoutEntryPage {
            entries: output.dataset_entries().to_vec(),
            next_token: output.next_token().map(str::to_string),
        })
    }
}
