//! Drives the Rekognition SDK client against a local mock of the JSON protocol.

use aws_credential_types::Credentials;
use aws_sdk_rekognition::config::{BehaviorVersion, Region};
use aws_smithy_types::retry::RetryConfig;
use cloudai::custom_labels::dataset::{self, CREATE_COMPLETE};
use cloudai::custom_labels::{model, project, DatasetType};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const PROJECT_ARN: &str = "arn:aws:rekognition:us-east-1:123456789012:project/pets/1690000000000";
const DATASET_ARN: &str = "arn:aws:rekognition:us-east-1:123456789012:project/pets/dataset/train/1690000000001";

fn client(server: &MockServer) -> aws_sdk_rekognition::Client {
    let config = aws_sdk_rekognition::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(Credentials::new("test", "test", None, None, "test"))
        .endpoint_url(server.uri())
        .retry_config(RetryConfig::disabled())
        .build();
    aws_sdk_rekognition::Client::from_conf(config)
}

fn target(operation: &str) -> wiremock::MockBuilder {
    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("x-amz-target", format!("RekognitionService.{operation}").as_str()))
}

fn reply(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "application/x-amz-json-1.1")
        .set_body_json(body)
}

fn failure(code: &str) -> ResponseTemplate {
    ResponseTemplate::new(400)
        .insert_header("content-type", "application/x-amz-json-1.1")
        .set_body_json(json!({ "__type": code, "message": format!("Simulated {code}") }))
}

/// Serves project descriptions over two pages.
struct ProjectPages {
    calls: AtomicUsize,
}

impl Respond for ProjectPages {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            reply(json!({
                "ProjectDescriptions": [{
                    "ProjectArn": PROJECT_ARN,
                    "Status": "CREATED",
                    "CreationTimestamp": 1690000000.0,
                    "Datasets": [{
                        "DatasetArn": DATASET_ARN,
                        "DatasetType": "TRAIN",
                        "Status": "CREATE_COMPLETE",
                        "CreationTimestamp": 1690000001.0,
                    }],
                }],
                "NextToken": "page-2",
            }))
        } else {
            reply(json!({
                "ProjectDescriptions": [{
                    "ProjectArn": "arn:aws:rekognition:us-east-1:123456789012:project/birds/1690000000100",
                    "Status": "CREATING",
                }],
            }))
        }
    }
}

#[tokio::test]
async fn describe_projects_follows_next_token() {
    let server = MockServer::start().await;
    target("DescribeProjects")
        .respond_with(ProjectPages {
            calls: AtomicUsize::new(0),
        })
        .expect(2)
        .mount(&server)
        .await;

    let projects = project::describe_projects(&client(&server), None).await.unwrap();

    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].project_arn, PROJECT_ARN);
    assert_eq!(projects[0].datasets[0].dataset_type, "TRAIN");
    assert!(projects[0].created_at.is_some());
    assert_eq!(projects[1].status, "CREATING");
}

#[tokio::test]
async fn create_project_sends_name() {
    let server = MockServer::start().await;
    target("CreateProject")
        .and(body_partial_json(json!({ "ProjectName": "pets" })))
        .respond_with(reply(json!({ "ProjectArn": PROJECT_ARN })))
        .expect(1)
        .mount(&server)
        .await;

    let arn = project::create_project(&client(&server), "pets").await.unwrap();

    assert_eq!(arn, PROJECT_ARN);
}

#[tokio::test]
async fn service_error_keeps_vendor_code() {
    let server = MockServer::start().await;
    target("CreateProject")
        .respond_with(failure("ResourceInUseException"))
        .mount(&server)
        .await;

    let err = project::create_project(&client(&server), "pets").await.unwrap_err();

    assert_eq!(err.service_code(), Some("ResourceInUseException"));
}

#[tokio::test]
async fn create_dataset_from_manifest_round_trip() {
    let server = MockServer::start().await;
    target("CreateDataset")
        .and(body_partial_json(json!({
            "ProjectArn": PROJECT_ARN,
            "DatasetType": "TRAIN",
            "DatasetSource": {
                "GroundTruthManifest": {
                    "S3Object": { "Bucket": "pets-bucket", "Name": "train.manifest" }
                }
            },
        })))
        .respond_with(reply(json!({ "DatasetArn": DATASET_ARN })))
        .expect(1)
        .mount(&server)
        .await;
    target("DescribeDataset")
        .and(body_partial_json(json!({ "DatasetArn": DATASET_ARN })))
        .respond_with(reply(json!({
            "DatasetDescription": {
                "Status": CREATE_COMPLETE,
                "StatusMessage": "The dataset was successfully created.",
                "DatasetStats": { "LabeledEntries": 10, "TotalEntries": 12, "TotalLabels": 2, "ErrorEntries": 0 },
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let arn = dataset::create_dataset_from_manifest(
        &client(&server),
        PROJECT_ARN,
        DatasetType::Train,
        "pets-bucket",
        "train.manifest",
    )
    .await
    .unwrap();

    assert_eq!(arn, DATASET_ARN);
}

#[tokio::test]
async fn describe_dataset_maps_stats() {
    let server = MockServer::start().await;
    target("DescribeDataset")
        .respond_with(reply(json!({
            "DatasetDescription": {
                "Status": "UPDATE_COMPLETE",
                "DatasetStats": { "LabeledEntries": 10, "TotalEntries": 12, "TotalLabels": 2, "ErrorEntries": 1 },
            }
        })))
        .mount(&server)
        .await;

    let description = dataset::describe_dataset(&client(&server), DATASET_ARN).await.unwrap();

    let stats = description.stats.unwrap();
    assert_eq!(stats.total_entries, 12);
    assert_eq!(stats.error_entries, 1);
}

#[tokio::test]
async fn describe_dataset_not_found_is_detected() {
    let server = MockServer::start().await;
    target("DescribeDataset")
        .respond_with(failure("ResourceNotFoundException"))
        .mount(&server)
        .await;

    let err = dataset::describe_dataset(&client(&server), DATASET_ARN).await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn model_description_maps_evaluation_summary() {
    let server = MockServer::start().await;
    let version = "pets.2023-07-22T10.00.00";
    let model_arn = format!("{PROJECT_ARN}/version/{version}/1690000000003");
    target("DescribeProjectVersions")
        .and(body_partial_json(json!({ "ProjectArn": PROJECT_ARN, "VersionNames": [version] })))
        .respond_with(reply(json!({
            "ProjectVersionDescriptions": [{
                "ProjectVersionArn": model_arn,
                "Status": "TRAINING_COMPLETED",
                "BillableTrainingTimeInSeconds": 1800,
                "EvaluationResult": {
                    "F1Score": 0.95,
                    "Summary": { "S3Object": { "Bucket": "output-bucket", "Name": "summary.json" } },
                },
                "OutputConfig": { "S3Bucket": "output-bucket", "S3KeyPrefix": "pets/" },
            }]
        })))
        .mount(&server)
        .await;

    let models = model::describe_models(&client(&server), PROJECT_ARN, Some(&[version]))
        .await
        .unwrap();

    assert_eq!(models.len(), 1);
    let model = &models[0];
    assert_eq!(model.model_arn, model_arn);
    assert_eq!(model.billable_training_minutes(), Some(30.0));
    let summary = model.evaluation.as_ref().and_then(|e| e.summary.as_ref()).unwrap();
    assert_eq!(summary.to_string(), "s3://output-bucket/summary.json");
    assert_eq!(model.output.as_ref().unwrap().key, "pets/");
}
