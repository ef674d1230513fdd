use super::{version_name_from_arn, CustomLabelsApi};
use crate::error::{CloudAiError, Result};
use crate::poll::{wait_until_gone, Observation, Poller, StatusSet};
use crate::s3::S3Uri;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info, warn};

pub const STARTING: &str = "STARTING";
pub const RUNNING: &str = "RUNNING";
pub const FAILED: &str = "FAILED";
pub const STOPPING: &str = "STOPPING";
pub const STOPPED: &str = "STOPPED";
pub const COPYING_IN_PROGRESS: &str = "COPYING_IN_PROGRESS";
pub const COPYING_COMPLETED: &str = "COPYING_COMPLETED";
pub const COPYING_FAILED: &str = "COPYING_FAILED";

const START_POLL: Poller = Poller::new(
    StatusSet {
        in_progress: &[STARTING],
        complete: &[RUNNING],
        failed: &[FAILED],
    },
    Duration::from_secs(30),
);

const STOP_POLL: Poller = Poller::new(
    StatusSet {
        in_progress: &[STOPPING],
        complete: &[STOPPED],
        failed: &[],
    },
    Duration::from_secs(10),
);

const COPY_POLL: Poller = Poller::new(
    StatusSet {
        in_progress: &[COPYING_IN_PROGRESS],
        complete: &[COPYING_COMPLETED],
        failed: &[COPYING_FAILED],
    },
    Duration::from_secs(60),
);

const DELETE_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub f1_score: Option<f32>,
    /// Location of the evaluation summary file.
    pub summary: Option<S3Uri>,
}

/// A trained model, called a project version by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescription {
    pub model_arn: String,
    pub created_at: Option<DateTime<Utc>>,
    pub status: String,
    pub status_message: Option<String>,
    pub billable_training_time_in_seconds: Option<i64>,
    pub evaluation: Option<EvaluationResult>,
    pub manifest_summary: Option<S3Uri>,
    /// Where training results are written.
    pub output: Option<S3Uri>,
    pub min_inference_units: Option<i32>,
    pub max_inference_units: Option<i32>,
}

impl ModelDescription {
    pub fn billable_training_minutes(&self) -> Option<f64> {
        self.billable_training_time_in_seconds
            .map(|seconds| seconds as f64 / 60.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopyModelRequest {
    pub source_project_arn: String,
    pub source_model_arn: String,
    pub destination_project_arn: String,
    pub version_name: String,
    pub output: S3Uri,
}

/// Describes the models of a project, or only the named versions.
pub async fn describe_models(
    client: &dyn CustomLabelsApi,
    project_arn: &str,
    version_names: Option<&[&str]>,
) -> Result<Vec<ModelDescription>> {
    info!(project_arn, ?version_names, "describing models");
    let models = client
        .describe_project_versions(
            project_arn,
            version_names.map(|names| names.iter().map(|n| n.to_string()).collect()),
        )
        .await
        .inspect_err(|err| error!(project_arn, "couldn't describe model: {err}"))?;
    info!(project_arn, count = models.len(), "described models");
    Ok(models)
}

async fn describe_model(client: &dyn CustomLabelsApi, project_arn: &str, model_arn: &str) -> Result<ModelDescription> {
    let version_name = version_name_from_arn(model_arn)?;
    client
        .describe_project_versions(project_arn, Some(vec![version_name.to_string()]))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| CloudAiError::NotFound(format!("Model {model_arn} not found.")))
}

/// The current status of a model.
pub async fn get_model_status(client: &dyn CustomLabelsApi, project_arn: &str, model_arn: &str) -> Result<String> {
    info!(model_arn, "getting model status");
    let model = describe_model(client, project_arn, model_arn)
        .await
        .inspect_err(|err| error!(model_arn, "couldn't get model status: {err}"))?;
    info!(model_arn, status = %model.status, message = ?model.status_message, "model status");
    Ok(model.status)
}

async fn observe_model(client: &dyn CustomLabelsApi, project_arn: &str, model_arn: &str) -> Result<Observation> {
    let model = describe_model(client, project_arn, model_arn).await?;
    Ok(Observation::new(model.status).with_message(model.status_message))
}

/// Starts hosting a model and waits until it is running.
///
/// Without `max_inference_units` the model does not auto-scale.
pub async fn start_model(
    client: &dyn CustomLabelsApi,
    project_arn: &str,
    model_arn: &str,
    min_inference_units: i32,
    max_inference_units: Option<i32>,
) -> Result<String> {
    info!(model_arn, min_inference_units, ?max_inference_units, "starting model");
    let result = async {
        client
            .start_project_version(model_arn, min_inference_units, max_inference_units)
            .await?;
        START_POLL
            .wait(model_arn, || observe_model(client, project_arn, model_arn))
            .await
    }
    .await
    .inspect_err(|err| error!(model_arn, "couldn't start model: {err}"))?;
    info!(model_arn, status = %result.status, "model started");
    Ok(result.status)
}

/// Stops a running model and waits until it is stopped.
pub async fn stop_model(client: &dyn CustomLabelsApi, project_arn: &str, model_arn: &str) -> Result<String> {
    info!(model_arn, "stopping model");
    let result = async {
        let status = client.stop_project_version(model_arn).await?;
        info!(model_arn, %status, "stop requested");
        STOP_POLL
            .wait(model_arn, || observe_model(client, project_arn, model_arn))
            .await
    }
    .await
    .inspect_err(|err| error!(model_arn, "couldn't stop model: {err}"))?;
    info!(model_arn, status = %result.status, "model stopped");
    Ok(result.status)
}

/// Deletes a model and waits until its version no longer describes.
pub async fn delete_model(client: &dyn CustomLabelsApi, project_arn: &str, model_arn: &str) -> Result<()> {
    info!(model_arn, "deleting model");
    let version_name = version_name_from_arn(model_arn)?;
    client
        .delete_project_version(model_arn)
        .await
        .inspect_err(|err| error!(model_arn, "couldn't delete model: {err}"))?;

    wait_until_gone(model_arn, DELETE_INTERVAL, || async move {
        let models = client
            .describe_project_versions(project_arn, Some(vec![version_name.to_string()]))
            .await?;
        Ok::<_, CloudAiError>(!models.is_empty())
    })
    .await
    .inspect_err(|err| error!(model_arn, "couldn't confirm model deletion: {err}"))
}

/// Copies a model version into another project, writing training results
/// under `output`.
///
/// Returns the ARN of the copy and its final status. A failed copy is logged
/// and reported through the status rather than raised.
pub async fn copy_model(
    client: &dyn CustomLabelsApi,
    source_project_arn: &str,
    source_model_arn: &str,
    destination_project_arn: &str,
    output: &S3Uri,
    destination_version_name: &str,
) -> Result<(String, String)> {
    info!(
        source_model_arn,
        source_project_arn, destination_project_arn, "copying model"
    );
    let model_arn = client
        .copy_project_version(CopyModelRequest {
            source_project_arn: source_project_arn.to_string(),
            source_model_arn: source_model_arn.to_string(),
            destination_project_arn: destination_project_arn.to_string(),
            version_name: destination_version_name.to_string(),
            output: output.clone(),
        })
        .await
        .inspect_err(|err| error!(source_model_arn, "couldn't copy model: {err}"))?;
    info!(%model_arn, "destination model");

    let outcome = COPY_POLL
        .wait(&model_arn, || async move {
            let model = client
                .describe_project_versions(
                    destination_project_arn,
                    Some(vec![destination_version_name.to_string()]),
                )
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| CloudAiError::NotFound(format!("Model {destination_version_name} not found.")))?;
            Ok::<_, CloudAiError>(Observation::new(model.status).with_message(model.status_message))
        })
        .await;

    let status = match outcome {
        Ok(observation) => {
            info!(%model_arn, "model was successfully copied");
            observation.status
        }
        Err(CloudAiError::StatusFailed { status, message, .. }) => {
            warn!(%model_arn, ?message, "model copy failed");
            status
        }
        Err(CloudAiError::UnexpectedStatus { status, .. }) => {
            warn!(%model_arn, %status, "model copy ended in an unexpected status");
            status
        }
        Err(err) => {
            error!(%model_arn, "couldn't get copied model status: {err}");
            return Err(err);
        }
    };
    Ok((model_arn, status))
}
