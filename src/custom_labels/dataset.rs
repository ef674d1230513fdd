use super::CustomLabelsApi;
use crate::error::{CloudAiError, Result};
use crate::poll::{wait_until_gone, Observation, Poller, StatusSet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, info, warn};

pub const CREATE_IN_PROGRESS: &str = "CREATE_IN_PROGRESS";
pub const CREATE_COMPLETE: &str = "CREATE_COMPLETE";
pub const CREATE_FAILED: &str = "CREATE_FAILED";
pub const UPDATE_IN_PROGRESS: &str = "UPDATE_IN_PROGRESS";
pub const UPDATE_COMPLETE: &str = "UPDATE_COMPLETE";
pub const UPDATE_FAILED: &str = "UPDATE_FAILED";

const ENTRIES_PAGE_SIZE: i32 = 100;
const DELETE_INTERVAL: Duration = Duration::from_secs(5);
const DISTRIBUTION_UNEXPECTED: &str = "An unexpected error occurred while distributing the dataset";

const CREATE_POLL: Poller = Poller::new(
    StatusSet {
        in_progress: &[CREATE_IN_PROGRESS],
        complete: &[CREATE_COMPLETE],
        failed: &[CREATE_FAILED],
    },
    Duration::from_secs(5),
);

const UPDATE_POLL: Poller = Poller::new(
    StatusSet {
        in_progress: &[UPDATE_IN_PROGRESS],
        complete: &[UPDATE_COMPLETE],
        failed: &[UPDATE_FAILED],
    },
    Duration::from_secs(5),
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DatasetType {
    Train,
    Test,
}

impl DatasetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Train => "TRAIN",
            Self::Test => "TEST",
        }
    }
}

impl FromStr for DatasetType {
    type Err = CloudAiError;

    /// Accepts `train` or `test` in any case.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "TRAIN" => Ok(Self::Train),
            "TEST" => Ok(Self::Test),
            _ => Err(CloudAiError::InvalidArgument(format!(
                "dataset type must be train or test, not {s}"
            ))),
        }
    }
}

impl fmt::Display for DatasetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a new dataset's entries come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetSource {
    /// A Ground Truth format manifest file in S3.
    Manifest { bucket: String, key: String },
    /// A copy of an existing dataset.
    Dataset { arn: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDatasetRequest {
    pub project_arn: String,
    pub dataset_type: DatasetType,
    pub source: DatasetSource,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub labeled_entries: i32,
    pub total_entries: i32,
    pub total_labels: i32,
    pub error_entries: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetDescription {
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub status: String,
    pub status_message: Option<String>,
    pub status_message_code: Option<String>,
    pub stats: Option<DatasetStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryPage {
    pub entries: Vec<String>,
    pub next_token: Option<String>,
}

/// Final status of a dataset update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetUpdate {
    pub status: String,
    pub message: Option<String>,
}

/// Outcome of splitting a training dataset into training and test datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub train: DatasetUpdate,
    pub test: DatasetUpdate,
}

impl Distribution {
    pub fn succeeded(&self) -> bool {
        self.train.status == UPDATE_COMPLETE && self.test.status == UPDATE_COMPLETE
    }
}

fn observe(description: DatasetDescription) -> Observation {
    Observation::new(description.status).with_message(description.status_message)
}

async fn wait_for_creation(client: &dyn CustomLabelsApi, dataset_arn: &str) -> Result<()> {
    CREATE_POLL
        .wait(dataset_arn, || async move {
            Ok::<_, CloudAiError>(observe(client.describe_dataset(dataset_arn).await?))
        })
        .await?;
    Ok(())
}

async fn create_dataset(client: &dyn CustomLabelsApi, request: CreateDatasetRequest) -> Result<String> {
    let project_arn = request.project_arn.clone();
    let dataset_type = request.dataset_type;
    info!(%project_arn, %dataset_type, "creating dataset");
    let result = async {
        let arn = client.create_dataset(request).await?;
        info!(%arn, "waiting for dataset creation");
        wait_for_creation(client, &arn).await?;
        Ok::<_, CloudAiError>(arn)
    }
    .await;
    match &result {
        Ok(arn) => info!(%arn, "dataset created"),
        Err(err) => error!(%project_arn, %dataset_type, "couldn't create dataset: {err}"),
    }
    result
}

/// Creates a dataset from a manifest file in S3 and waits until it is ready.
///
/// Returns the dataset ARN.
pub async fn create_dataset_from_manifest(
    client: &dyn CustomLabelsApi,
    project_arn: &str,
    dataset_type: DatasetType,
    bucket: &str,
    manifest_key: &str,
) -> Result<String> {
    create_dataset(
        client,
        CreateDatasetRequest {
            project_arn: project_arn.to_string(),
            dataset_type,
            source: DatasetSource::Manifest {
                bucket: bucket.to_string(),
                key: manifest_key.to_string(),
            },
        },
    )
    .await
}

/// Creates a dataset by copying another one and waits until it is ready.
pub async fn create_dataset_from_existing(
    client: &dyn CustomLabelsApi,
    project_arn: &str,
    dataset_type: DatasetType,
    dataset_arn: &str,
) -> Result<String> {
    create_dataset(
        client,
        CreateDatasetRequest {
            project_arn: project_arn.to_string(),
            dataset_type,
            source: DatasetSource::Dataset {
                arn: dataset_arn.to_string(),
            },
        },
    )
    .await
}

pub async fn describe_dataset(client: &dyn CustomLabelsApi, dataset_arn: &str) -> Result<DatasetDescription> {
    info!(dataset_arn, "describing dataset");
    let description = client
        .describe_dataset(dataset_arn)
        .await
        .inspect_err(|err| error!(dataset_arn, "couldn't describe dataset: {err}"))?;
    info!(dataset_arn, status = %description.status, "described dataset");
    Ok(description)
}

/// Deletes a dataset and waits until describing it fails with not-found.
pub async fn delete_dataset(client: &dyn CustomLabelsApi, dataset_arn: &str) -> Result<()> {
    info!(dataset_arn, "deleting dataset");
    client
        .delete_dataset(dataset_arn)
        .await
        .inspect_err(|err| error!(dataset_arn, "couldn't delete dataset: {err}"))?;

    wait_until_gone(dataset_arn, DELETE_INTERVAL, || async move {
        match client.describe_dataset(dataset_arn).await {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    })
    .await
    .inspect_err(|err| error!(dataset_arn, "couldn't confirm dataset deletion: {err}"))
}

/// Adds or updates entries from a local JSON Lines manifest file.
///
/// Waits for the update and returns its final status. A failed update is an
/// error.
pub async fn update_dataset_entries(
    client: &dyn CustomLabelsApi,
    dataset_arn: &str,
    manifest_path: impl AsRef<Path>,
) -> Result<DatasetUpdate> {
    let manifest_path = manifest_path.as_ref();
    info!(dataset_arn, manifest = %manifest_path.display(), "updating dataset entries");
    let result = async {
        let changes = tokio::fs::read(manifest_path).await?;
        client.update_dataset_entries(dataset_arn, changes).await?;
        UPDATE_POLL
            .wait(dataset_arn, || async move {
                Ok::<_, CloudAiError>(observe(client.describe_dataset(dataset_arn).await?))
            })
            .await
    }
    .await
    .inspect_err(|err| error!(dataset_arn, "couldn't update dataset entries: {err}"))?;

    info!(dataset_arn, status = %result.status, "dataset entries updated");
    Ok(DatasetUpdate {
        status: result.status,
        message: result.message,
    })
}

/// Waits for a dataset update and reports failures as a status instead of an error.
async fn distribution_status(client: &dyn CustomLabelsApi, dataset_arn: &str) -> Result<DatasetUpdate> {
    let outcome = UPDATE_POLL
        .wait(dataset_arn, || async move {
            Ok::<_, CloudAiError>(observe(client.describe_dataset(dataset_arn).await?))
        })
        .await;
    match outcome {
        Ok(observation) => Ok(DatasetUpdate {
            status: observation.status,
            message: observation.message,
        }),
        Err(CloudAiError::StatusFailed { status, message, .. }) => {
            warn!(dataset_arn, %status, ?message, "dataset distribution failed");
            Ok(DatasetUpdate { status, message })
        }
        Err(CloudAiError::UnexpectedStatus { status, .. }) => {
            warn!(dataset_arn, %status, "unexpected dataset status after distribution");
            Ok(DatasetUpdate {
                status,
                message: Some(DISTRIBUTION_UNEXPECTED.to_string()),
            })
        }
        Err(err) => Err(err),
    }
}

/// Splits the training dataset's entries between the training and test datasets.
///
/// Waits for both datasets. A failed or unexpected status is returned in the
/// [`Distribution`], not raised.
pub async fn distribute_dataset_entries(
    client: &dyn CustomLabelsApi,
    train_dataset_arn: &str,
    test_dataset_arn: &str,
) -> Result<Distribution> {
    info!(train_dataset_arn, test_dataset_arn, "distributing dataset entries");
    let result = async {
        client
            .distribute_dataset_entries(train_dataset_arn, test_dataset_arn)
            .await?;
        let train = distribution_status(client, train_dataset_arn).await?;
        let test = distribution_status(client, test_dataset_arn).await?;
        Ok::<_, CloudAiError>(Distribution { train, test })
    }
    .await
    .inspect_err(|err| error!(train_dataset_arn, test_dataset_arn, "couldn't distribute dataset: {err}"))?;

    info!(
        train = %result.train.status,
        test = %result.test.status,
        "finished distributing dataset entries"
    );
    Ok(result)
}

/// Lists every JSON Lines entry of a dataset, or only entries with errors.
pub async fn list_dataset_entries(
    client: &dyn CustomLabelsApi,
    dataset_arn: &str,
    errors_only: bool,
) -> Result<Vec<String>> {
    info!(dataset_arn, errors_only, "listing dataset entries");
    let mut entries = Vec::new();
    let mut next_token = None;
    loop {
        let page = client
            .list_dataset_entries(dataset_arn, errors_only, ENTRIES_PAGE_SIZE, next_token)
            .await
            .inspect_err(|err| error!(dataset_arn, "couldn't list dataset entries: {err}"))?;
        entries.extend(page.entries);
        next_token = page.next_token;
        if next_token.is_none() {
            break;
        }
    }
    info!(dataset_arn, count = entries.len(), "finished listing dataset entries");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_type_parses_any_case() {
        assert_eq!("train".parse::<DatasetType>().unwrap(), DatasetType::Train);
        assert_eq!("TEST".parse::<DatasetType>().unwrap(), DatasetType::Test);
        assert!(matches!(
            "validation".parse::<DatasetType>(),
            Err(CloudAiError::InvalidArgument(_))
        ));
    }

    #[test]
    fn dataset_type_serializes_upper_case() {
        assert_eq!(serde_json::to_value(DatasetType::Train).unwrap(), "TRAIN");
        assert_eq!(DatasetType::Test.to_string(), "TEST");
    }

    #[test]
    fn distribution_succeeds_only_if_both_updates_complete() {
        let complete = DatasetUpdate {
            status: UPDATE_COMPLETE.into(),
            message: None,
        };
        let failed = DatasetUpdate {
            status: UPDATE_FAILED.into(),
            message: Some("not enough images".into()),
        };
        assert!(Distribution {
            train: complete.clone(),
            test: complete.clone()
        }
        .succeeded());
        assert!(!Distribution {
            train: complete,
            test: failed
        }
        .succeeded());
    }
}
