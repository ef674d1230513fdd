mod common;

use cloudai::agent::flow::{self, FAILED, PREPARED, PREPARING};
use cloudai::agent::{flow_alias, flow_version, DeletedFlowAlias, DeletedFlowVersion, Flow, FlowAlias, FlowDefinition, FlowVersion};
use common::{assert_service_error, Stubber, TEST_ERROR};
use serde_json::json;

const FLOW_ID: &str = "FLOW123456";
const ROLE_ARN: &str = "arn:aws:iam::123456789012:role/test-flow-role";

fn playlist() -> FlowDefinition {
    FlowDefinition::from_json(include_str!("../demos/data/playlist_flow.json")).unwrap()
}

fn flow(status: &str) -> Flow {
    Flow {
        id: FLOW_ID.into(),
        arn: format!("arn:aws:bedrock:us-east-1:123456789012:flow/{FLOW_ID}"),
        name: "playlist".into(),
        description: Some("Makes playlists".into()),
        status: status.into(),
        execution_role_arn: ROLE_ARN.into(),
        version: "DRAFT".into(),
        created_at: None,
        updated_at: None,
    }
}

fn flow_version(version: &str) -> FlowVersion {
    FlowVersion {
        id: FLOW_ID.into(),
        arn: format!("arn:aws:bedrock:us-east-1:123456789012:flow/{FLOW_ID}/version/{version}"),
        name: "playlist".into(),
        version: version.into(),
        status: PREPARED.into(),
        description: Some("first version".into()),
        created_at: None,
    }
}

fn create_params() -> serde_json::Value {
    json!({
        "name": "playlist",
        "description": "Makes playlists",
        "execution_role_arn": ROLE_ARN,
        "definition": serde_json::to_value(playlist()).unwrap(),
    })
}

#[tokio::test]
async fn create_flow_sends_definition_and_returns_flow() {
    let stubber = Stubber::new();
    stubber.add_ok("create_flow", create_params(), flow("NotPrepared"));

    let created = flow::create_flow(&stubber, "playlist", "Makes playlists", ROLE_ARN, playlist())
        .await
        .unwrap();

    assert_eq!(created, flow("NotPrepared"));
}

#[tokio::test]
async fn create_flow_error_propagates() {
    let stubber = Stubber::new();
    stubber.add_err("create_flow", create_params(), TEST_ERROR);

    let result = flow::create_flow(&stubber, "playlist", "Makes playlists", ROLE_ARN, playlist()).await;

    assert_service_error(result, TEST_ERROR);
}

#[tokio::test]
async fn get_flow_returns_flow() {
    let stubber = Stubber::new();
    stubber.add_ok("get_flow", json!({ "flow_id": FLOW_ID }), flow(PREPARED));

    let got = flow::get_flow(&stubber, FLOW_ID).await.unwrap();

    assert_eq!(got.status, PREPARED);
    assert_eq!(got.execution_role_arn, ROLE_ARN);
}

#[tokio::test(start_paused = true)]
async fn prepare_flow_waits_while_preparing() {
    let stubber = Stubber::new();
    let params = json!({ "flow_id": FLOW_ID });
    stubber.add_ok("prepare_flow", params.clone(), PREPARING);
    stubber.add_ok("get_flow", params.clone(), flow(PREPARING));
    stubber.add_ok("get_flow", params, flow(PREPARED));

    let status = flow::prepare_flow(&stubber, FLOW_ID).await.unwrap();

    assert_eq!(status, PREPARED);
}

#[tokio::test(start_paused = true)]
async fn prepare_flow_reports_failure_as_status() {
    let stubber = Stubber::new();
    let params = json!({ "flow_id": FLOW_ID });
    stubber.add_ok("prepare_flow", params.clone(), PREPARING);
    stubber.add_ok("get_flow", params, flow(FAILED));

    let status = flow::prepare_flow(&stubber, FLOW_ID).await.unwrap();

    assert_eq!(status, FAILED);
}

#[tokio::test]
async fn prepare_flow_error_propagates() {
    let stubber = Stubber::new();
    stubber.add_err("prepare_flow", json!({ "flow_id": FLOW_ID }), TEST_ERROR);

    assert_service_error(flow::prepare_flow(&stubber, FLOW_ID).await, TEST_ERROR);
}

#[tokio::test]
async fn delete_flow_skips_in_use_check() {
    let stubber = Stubber::new();
    stubber.add_ok(
        "delete_flow",
        json!({ "flow_id": FLOW_ID, "skip_resource_in_use_check": true }),
        FLOW_ID,
    );

    assert_eq!(flow::delete_flow(&stubber, FLOW_ID).await.unwrap(), FLOW_ID);
}

#[tokio::test]
async fn delete_flow_not_found_propagates() {
    let stubber = Stubber::new();
    stubber.add_err(
        "delete_flow",
        json!({ "flow_id": FLOW_ID, "skip_resource_in_use_check": true }),
        "ResourceNotFoundException",
    );

    let err = flow::delete_flow(&stubber, FLOW_ID).await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn flow_version_lifecycle() {
    let stubber = Stubber::new();
    stubber.add_ok(
        "create_flow_version",
        json!({ "flow_id": FLOW_ID, "description": "first version" }),
        flow_version("1"),
    );
    stubber.add_ok(
        "get_flow_version",
        json!({ "flow_id": FLOW_ID, "version": "1" }),
        flow_version("1"),
    );
    stubber.add_ok(
        "delete_flow_version",
        json!({ "flow_id": FLOW_ID, "version": "1" }),
        DeletedFlowVersion {
            id: FLOW_ID.into(),
            version: "1".into(),
        },
    );

    let version = flow_version::create_flow_version(&stubber, FLOW_ID, "first version")
        .await
        .unwrap();
    assert_eq!(version, "1");
    let got = flow_version::get_flow_version(&stubber, FLOW_ID, &version).await.unwrap();
    assert_eq!(got, flow_version("1"));
    let deleted = flow_version::delete_flow_version(&stubber, FLOW_ID, &version).await.unwrap();
    assert_eq!(deleted.version, "1");
}

#[tokio::test]
async fn flow_version_error_propagates() {
    let stubber = Stubber::new();
    stubber.add_err(
        "create_flow_version",
        json!({ "flow_id": FLOW_ID, "description": "first version" }),
        TEST_ERROR,
    );

    assert_service_error(
        flow_version::create_flow_version(&stubber, FLOW_ID, "first version").await,
        TEST_ERROR,
    );
}

#[tokio::test]
async fn flow_alias_routes_to_one_version() {
    let stubber = Stubber::new();
    stubber.add_ok(
        "create_flow_alias",
        json!({
            "flow_id": FLOW_ID,
            "name": "latest",
            "description": "Alias for the first version",
            "version": "1",
        }),
        FlowAlias {
            id: "ALIAS12345".into(),
            arn: format!("arn:aws:bedrock:us-east-1:123456789012:flow/{FLOW_ID}/alias/ALIAS12345"),
            name: "latest".into(),
            flow_id: FLOW_ID.into(),
            versions: vec!["1".into()],
        },
    );
    stubber.add_ok(
        "delete_flow_alias",
        json!({ "flow_id": FLOW_ID, "alias_id": "ALIAS12345" }),
        DeletedFlowAlias {
            flow_id: FLOW_ID.into(),
            id: "ALIAS12345".into(),
        },
    );

    let alias_id = flow_alias::create_flow_alias(&stubber, FLOW_ID, "1", "latest", "Alias for the first version")
        .await
        .unwrap();
    assert_eq!(alias_id, "ALIAS12345");
    let deleted = flow_alias::delete_flow_alias(&stubber, FLOW_ID, &alias_id).await.unwrap();
    assert_eq!(deleted.id, alias_id);
}

#[tokio::test]
async fn flow_alias_error_propagates() {
    let stubber = Stubber::new();
    stubber.add_err(
        "delete_flow_alias",
        json!({ "flow_id": FLOW_ID, "alias_id": "ALIAS12345" }),
        TEST_ERROR,
    );

    assert_service_error(
        flow_alias::delete_flow_alias(&stubber, FLOW_ID, "ALIAS12345").await,
        TEST_ERROR,
    );
}

#[tokio::test]
async fn playlist_definition_file_converts() {
    let definition = FlowDefinition::from_file("demos/data/playlist_flow.json")
        .await
        .unwrap();
    assert_eq!(definition.nodes.len(), 3);
    assert_eq!(definition.to_sdk().unwrap().connections().len(), 3);
}

#[tokio::test]
async fn missing_definition_file_is_an_io_error() {
    let err = FlowDefinition::from_file("demos/data/no_such_flow.json")
        .await
        .unwrap_err();
    assert!(matches!(err, cloudai::CloudAiError::Io(_)));
}
