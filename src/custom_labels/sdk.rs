//! [`CustomLabelsApi`] for the Rekognition SDK client.

use super::{
    CopyModelRequest, CreateDatasetRequest, CustomLabelsApi, DatasetDescription, DatasetMetadata,
    DatasetSource, DatasetStats, EntryPage, EvaluationResult, ModelDescription, PolicyPage,
    ProjectDescription, ProjectPolicy, PutPolicyRequest,
};
use crate::convert::to_chrono_opt;
use crate::error::Result;
use crate::s3::S3Uri;
use async_trait::async_trait;
use aws_sdk_rekognition::primitives::Blob;
use aws_sdk_rekognition::types as sdk;
use aws_sdk_rekognition::Client;
use std::collections::BTreeMap;

fn s3_uri(object: Option<&sdk::S3Object>) -> Option<S3Uri> {
    let object = object?;
    Some(S3Uri::new(object.bucket()?, object.name().unwrap_or_default()))
}

fn project_from_sdk(project: &sdk::ProjectDescription) -> ProjectDescription {
    ProjectDescription {
        project_arn: project.project_arn().unwrap_or_default().to_string(),
        status: project.status().map(|s| s.as_str().to_string()).unwrap_or_default(),
        created_at: to_chrono_opt(project.creation_timestamp()),
        datasets: project
            .datasets()
            .iter()
            .map(|dataset| DatasetMetadata {
                dataset_arn: dataset.dataset_arn().unwrap_or_default().to_string(),
                dataset_type: dataset.dataset_type().map(|t| t.as_str().to_string()).unwrap_or_default(),
                status: dataset.status().map(|s| s.as_str().to_string()).unwrap_or_default(),
                status_message: dataset.status_message().map(str::to_string),
                status_message_code: dataset.status_message_code().map(|c| c.as_str().to_string()),
                created_at: to_chrono_opt(dataset.creation_timestamp()),
            })
            .collect(),
    }
}

fn model_from_sdk(model: &sdk::ProjectVersionDescription) -> ModelDescription {
    ModelDescription {
        model_arn: model.project_version_arn().unwrap_or_default().to_string(),
        created_at: to_chrono_opt(model.creation_timestamp()),
        status: model.status().map(|s| s.as_str().to_string()).unwrap_or_default(),
        status_message: model.status_message().map(str::to_string),
        billable_training_time_in_seconds: model.billable_training_time_in_seconds(),
        evaluation: model.evaluation_result().map(|result| EvaluationResult {
            f1_score: result.f1_score(),
            summary: s3_uri(result.summary().and_then(|s| s.s3_object())),
        }),
        manifest_summary: s3_uri(model.manifest_summary().and_then(|m| m.s3_object())),
        output: model.output_config().and_then(|config| {
            Some(S3Uri::new(
                config.s3_bucket()?,
                config.s3_key_prefix().unwrap_or_default(),
            ))
        }),
        min_inference_units: model.min_inference_units(),
        max_inference_units: model.max_inference_units(),
    }
}

fn policy_from_sdk(policy: &sdk::ProjectPolicy) -> ProjectPolicy {
    ProjectPolicy {
        project_arn: policy.project_arn().unwrap_or_default().to_string(),
        policy_name: policy.policy_name().unwrap_or_default().to_string(),
        policy_revision_id: policy.policy_revision_id().unwrap_or_default().to_string(),
        policy_document: policy.policy_document().unwrap_or_default().to_string(),
        created_at: to_chrono_opt(policy.creation_timestamp()),
        updated_at: to_chrono_opt(policy.last_updated_timestamp()),
    }
}

fn dataset_source(source: DatasetSource) -> sdk::DatasetSource {
    match source {
        DatasetSource::Manifest { bucket, key } => sdk::DatasetSource::builder()
            .ground_truth_manifest(
                sdk::GroundTruthManifest::builder()
                    .s3_object(sdk::S3Object::builder().bucket(bucket).name(key).build())
                    .build(),
            )
            .build(),
        DatasetSource::Dataset { arn } => sdk::DatasetSource::builder().dataset_arn(arn).build(),
    }
}

#[async_trait]
impl CustomLabelsApi for Client {
    async fn describe_projects(&self, names: Option<Vec<String>>) -> Result<Vec<ProjectDescription>> {
        let mut projects = Vec::new();
        let mut next_token = None;
        loop {
            let output = self
                .describe_projects()
                .set_project_names(names.clone())
                .set_next_token(next_token)
                .send()
                .await?;
            projects.extend(output.project_descriptions().iter().map(project_from_sdk));
            next_token = output.next_token().map(str::to_string);
            if next_token.is_none() {
                return Ok(projects);
            }
        }
    }

    async fn create_project(&self, project_name: &str) -> Result<String> {
        let output = self.create_project().project_name(project_name).send().await?;
        Ok(output.project_arn().unwrap_or_default().to_string())
    }

    async fn delete_project(&self, project_arn: &str) -> Result<String> {
        let output = self.delete_project().project_arn(project_arn).send().await?;
        Ok(output.status().map(|s| s.as_str().to_string()).unwrap_or_default())
    }

    async fn create_dataset(&self, request: CreateDatasetRequest) -> Result<String> {
        let output = self
            .create_dataset()
            .project_arn(request.project_arn)
            .dataset_type(sdk::DatasetType::from(request.dataset_type.as_str()))
            .dataset_source(dataset_source(request.source))
            .send()
            .await?;
        Ok(output.dataset_arn().unwrap_or_default().to_string())
    }

    async fn describe_dataset(&self, dataset_arn: &str) -> Result<DatasetDescription> {
        let output = self.describe_dataset().dataset_arn(dataset_arn).send().await?;
        let description = output.dataset_description();
        Ok(DatasetDescription {
            created_at: to_chrono_opt(description.and_then(|d| d.creation_timestamp())),
            updated_at: to_chrono_opt(description.and_then(|d| d.last_updated_timestamp())),
            status: description
                .and_then(|d| d.status())
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
            status_message: description.and_then(|d| d.status_message()).map(str::to_string),
            status_message_code: description
                .and_then(|d| d.status_message_code())
                .map(|c| c.as_str().to_string()),
            stats: description.and_then(|d| d.dataset_stats()).map(|stats| DatasetStats {
                labeled_entries: stats.labeled_entries().unwrap_or_default(),
                total_entries: stats.total_entries().unwrap_or_default(),
                total_labels: stats.total_labels().unwrap_or_default(),
                error_entries: stats.error_entries().unwrap_or_default(),
            }),
        })
    }

    async fn delete_dataset(&self, dataset_arn: &str) -> Result<()> {
        self.delete_dataset().dataset_arn(dataset_arn).send().await?;
        Ok(())
    }

    async fn update_dataset_entries(&self, dataset_arn: &str, changes: Vec<u8>) -> Result<()> {
        let changes = sdk::DatasetChanges::builder()
            .ground_truth(Blob::new(changes))
            .build()?;
        self.update_dataset_entries()
            .dataset_arn(dataset_arn)
            .changes(changes)
            .send()
            .await?;
        Ok(())
    }

    async fn distribute_dataset_entries(&self, train_dataset_arn: &str, test_dataset_arn: &str) -> Result<()> {
        self.distribute_dataset_entries()
            .datasets(sdk::DistributeDataset::builder().arn(train_dataset_arn).build()?)
            .datasets(sdk::DistributeDataset::builder().arn(test_dataset_arn).build()?)
            .send()
            .await?;
        Ok(())
    }

    async fn list_dataset_entries(
        &self,
        dataset_arn: &str,
        has_errors: bool,
        max_results: i32,
        next_token: Option<String>,
    ) -> Result<EntryPage> {
        let output = self
            .list_dataset_entries()
            .dataset_arn(dataset_arn)
            .has_errors(has_errors)
            .max_results(max_results)
            .set_next_token(next_token)
            .send()
            .await?;
        Ok(EntryPage {
            entries: output.dataset_entries().to_vec(),
            next_token: output.next_token().map(str::to_string),
        })
    }

    async fn describe_project_versions(
        &self,
        project_arn: &str,
        version_names: Option<Vec<String>>,
    ) -> Result<Vec<ModelDescription>> {
        let mut models = Vec::new();
        let mut next_token = None;
        loop {
            let output = self
                .describe_project_versions()
                .project_arn(project_arn)
                .set_version_names(version_names.clone())
                .set_next_token(next_token)
                .send()
                .await?;
            models.extend(output.project_version_descriptions().iter().map(model_from_sdk));
            next_token = output.next_token().map(str::to_string);
            if next_token.is_none() {
                return Ok(models);
            }
        }
    }

    async fn start_project_version(
        &self,
        model_arn: &str,
        min_inference_units: i32,
        max_inference_units: Option<i32>,
    ) -> Result<String> {
        let output = self
            .start_project_version()
            .project_version_arn(model_arn)
            .min_inference_units(min_inference_units)
            .set_max_inference_units(max_inference_units)
            .send()
            .await?;
        Ok(output.status().map(|s| s.as_str().to_string()).unwrap_or_default())
    }

    async fn stop_project_version(&self, model_arn: &str) -> Result<String> {
        let output = self
            .stop_project_version()
            .project_version_arn(model_arn)
            .send()
            .await?;
        Ok(output.status().map(|s| s.as_str().to_string()).unwrap_or_default())
    }

    async fn delete_project_version(&self, model_arn: &str) -> Result<String> {
        let output = self
            .delete_project_version()
            .project_version_arn(model_arn)
            .send()
            .await?;
        Ok(output.status().map(|s| s.as_str().to_string()).unwrap_or_default())
    }

    async fn copy_project_version(&self, request: CopyModelRequest) -> Result<String> {
        let output_config = sdk::OutputConfig::builder()
            .s3_bucket(request.output.bucket)
            .s3_key_prefix(request.output.key)
            .build();
        let output = self
            .copy_project_version()
            .source_project_arn(request.source_project_arn)
            .source_project_version_arn(request.source_model_arn)
            .destination_project_arn(request.destination_project_arn)
            .version_name(request.version_name)
            .output_config(output_config)
            .send()
            .await?;
        Ok(output.project_version_arn().unwrap_or_default().to_string())
    }

    async fn put_project_policy(&self, request: PutPolicyRequest) -> Result<String> {
        let output = self
            .put_project_policy()
            .project_arn(request.project_arn)
            .policy_name(request.policy_name)
            .policy_document(request.policy_document)
            .set_policy_revision_id(request.policy_revision_id)
            .send()
            .await?;
        Ok(output.policy_revision_id().unwrap_or_default().to_string())
    }

    async fn list_project_policies(
        &self,
        project_arn: &str,
        max_results: i32,
        next_token: Option<String>,
    ) -> Result<PolicyPage> {
        let output = self
            .list_project_policies()
            .project_arn(project_arn)
            .max_results(max_results)
            .set_next_token(next_token)
            .send()
            .await?;
        Ok(PolicyPage {
            policies: output.project_policies().iter().map(policy_from_sdk).collect(),
            next_token: output.next_token().map(str::to_string),
        })
    }

    async fn delete_project_policy(
        &self,
        project_arn: &str,
        policy_name: &str,
        policy_revision_id: Option<String>,
    ) -> Result<()> {
        self.delete_project_policy()
            .project_arn(project_arn)
            .policy_name(policy_name)
            .set_policy_revision_id(policy_revision_id)
            .send()
            .await?;
        Ok(())
    }

    async fn list_tags_for_resource(&self, resource_arn: &str) -> Result<BTreeMap<String, String>> {
        let output = self
            .list_tags_for_resource()
            .resource_arn(resource_arn)
            .send()
            .await?;
        Ok(output
            .tags()
            .map(|tags| tags.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default())
    }
}
