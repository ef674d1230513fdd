//! Custom-label image classification: projects, datasets, models, project
//! policies, tags and evaluation results.
//!
//! Operations take the service client as `&dyn CustomLabelsApi`; the SDK client
//! implements it in [`sdk`].

pub mod arn;
pub mod dataset;
pub mod evaluation;
pub mod model;
pub mod policy;
pub mod project;
mod sdk;
pub mod tags;

use crate::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

pub use arn::{project_name_from_arn, version_name_from_arn};
pub use dataset::{
    CreateDatasetRequest, DatasetDescription, DatasetSource, DatasetStats, DatasetType,
    DatasetUpdate, Distribution, EntryPage,
};
pub use evaluation::ConfusionMatrix;
pub use model::{CopyModelRequest, EvaluationResult, ModelDescription};
pub use policy::{PolicyPage, ProjectPolicy, PutPolicyRequest};
pub use project::{DatasetMetadata, ProjectDescription};
pub use tags::TaggedModel;

#[async_trait]
pub trait CustomLabelsApi: Send + Sync {
    /// Describes the named projects, or every project when `names` is `None`.
    async fn describe_projects(&self, names: Option<Vec<String>>) -> Result<Vec<ProjectDescription>>;

    /// Returns the new project's ARN.
    async fn create_project(&self, project_name: &str) -> Result<String>;

    /// Returns the project status reported by the delete call.
    async fn delete_project(&self, project_arn: &str) -> Result<String>;

    /// Returns the new dataset's ARN.
    async fn create_dataset(&self, request: CreateDatasetRequest) -> Result<String>;

    async fn describe_dataset(&self, dataset_arn: &str) -> Result<DatasetDescription>;

    async fn delete_dataset(&self, dataset_arn: &str) -> Result<()>;

    /// Adds or updates entries from JSON Lines manifest content.
    async fn update_dataset_entries(&self, dataset_arn: &str, changes: Vec<u8>) -> Result<()>;

    async fn distribute_dataset_entries(&self, train_dataset_arn: &str, test_dataset_arn: &str) -> Result<()>;

    async fn list_dataset_entries(
        &self,
        dataset_arn: &str,
        has_errors: bool,
        max_results: i32,
        next_token: Option<String>,
    ) -> Result<EntryPage>;

    /// Describes versions of a project, or all versions when `version_names` is `None`.
    async fn describe_project_versions(
        &self,
        project_arn: &str,
        version_names: Option<Vec<String>>,
    ) -> Result<Vec<ModelDescription>>;

    /// Returns the model status reported by the start call.
    async fn start_project_version(
        &self,
        model_arn: &str,
        min_inference_units: i32,
        max_inference_units: Option<i32>,
    ) -> Result<String>;

    async fn stop_project_version(&self, model_arn: &str) -> Result<String>;

    async fn delete_project_version(&self, model_arn: &str) -> Result<String>;

    /// Returns the ARN of the copy.
    async fn copy_project_version(&self, request: CopyModelRequest) -> Result<String>;

    /// Returns the revision ID of the stored policy.
    async fn put_project_policy(&self, request: PutPolicyRequest) -> Result<String>;

    async fn list_project_policies(
        &self,
        project_arn: &str,
        max_results: i32,
        next_token: Option<String>,
    ) -> Result<PolicyPage>;

    async fn delete_project_policy(
        &self,
        project_arn: &str,
        policy_name: &str,
        policy_revision_id: Option<String>,
    ) -> Result<()>;

    async fn list_tags_for_resource(&self, resource_arn: &str) -> Result<BTreeMap<String, String>>;
}
