#![allow(dead_code)]

//! A scripted stand-in for every service client.
//!
//! Tests queue the calls they expect, in order, with the exact parameters and
//! a canned response or service error. Each client call pops the next stub and
//! fails the test if the operation or parameters differ. Dropping a stubber
//! with unused stubs fails the test too.

use async_trait::async_trait;
use cloudai::agent::{
    ActionGroup, Agent, AgentAlias, AgentApi, CreateActionGroupRequest, CreateAgentRequest,
    CreateFlowAliasRequest, CreateFlowRequest, DeletedFlowAlias, DeletedFlowVersion, Flow, FlowAlias,
    FlowApi, FlowVersion, PreparedAgent, Prompt, PromptApi, PromptPage, PromptVariant,
    UpdatePromptRequest,
};
use cloudai::custom_labels::{
    CopyModelRequest, CreateDatasetRequest, CustomLabelsApi, DatasetDescription, EntryPage,
    ModelDescription, PolicyPage, ProjectDescription, PutPolicyRequest,
};
use cloudai::iam::{Role, RoleApi};
use cloudai::lookout::{LookoutDataset, LookoutEntryPage, LookoutProject, LookoutVisionApi};
use cloudai::runtime::{
    AgentEvent, AgentRuntimeApi, ConverseApi, EventStream, FlowEvent, FlowStream, InvokeAgentRequest,
    InvokeFlowRequest,
};
use cloudai::s3::ObjectStore;
use cloudai::{CloudAiError, Result};
use futures_util::stream::{self, StreamExt};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

pub const TEST_ERROR: &str = "TestException";

struct Stub {
    operation: String,
    params: Value,
    response: std::result::Result<Value, (String, String)>,
}

#[derive(Default)]
pub struct Stubber {
    stubs: Mutex<VecDeque<Stub>>,
}

impl Stubber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects `operation` with `params` and answers with `response`.
    pub fn add_ok(&self, operation: &str, params: Value, response: impl Serialize) {
        let response = serde_json::to_value(response).expect("canned response serializes");
        self.push(operation, params, Ok(response));
    }

    /// Expects `operation` with `params` and fails it with a service error.
    pub fn add_err(&self, operation: &str, params: Value, code: &str) {
        self.push(
            operation,
            params,
            Err((code.to_string(), format!("Simulated {code} for {operation}"))),
        );
    }

    fn push(&self, operation: &str, params: Value, response: std::result::Result<Value, (String, String)>) {
        self.stubs.lock().unwrap().push_back(Stub {
            operation: operation.to_string(),
            params,
            response,
        });
    }

    pub fn pending(&self) -> usize {
        self.stubs.lock().unwrap().len()
    }

    fn call<T: DeserializeOwned>(&self, operation: &str, params: Value) -> Result<T> {
        let stub = self
            .stubs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected call to {operation} with {params}"));
        assert_eq!(stub.operation, operation, "operation called out of order");
        assert_eq!(stub.params, params, "parameters for {operation}");
        match stub.response {
            Ok(value) => Ok(serde_json::from_value(value).expect("canned response matches return type")),
            Err((code, message)) => Err(CloudAiError::service(code, message)),
        }
    }
}

impl Drop for Stubber {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            let stubs = self.stubs.lock().unwrap();
            let left: Vec<&str> = stubs.iter().map(|s| s.operation.as_str()).collect();
            assert!(left.is_empty(), "stubbed calls never made: {left:?}");
        }
    }
}

fn to_params(request: &impl Serialize) -> Value {
    serde_json::to_value(request).expect("request serializes")
}

/// Canned reply for a flow invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowReply {
    pub execution_id: Option<String>,
    pub events: Vec<FlowEvent>,
}

#[async_trait]
impl FlowApi for Stubber {
    async fn create_flow(&self, request: CreateFlowRequest) -> Result<Flow> {
        self.call("create_flow", to_params(&request))
    }

    async fn get_flow(&self, flow_id: &str) -> Result<Flow> {
        self.call("get_flow", json!({ "flow_id": flow_id }))
    }

    async fn prepare_flow(&self, flow_id: &str) -> Result<String> {
        self.call("prepare_flow", json!({ "flow_id": flow_id }))
    }

    async fn delete_flow(&self, flow_id: &str, skip_resource_in_use_check: bool) -> Result<String> {
        self.call(
            "delete_flow",
            json!({ "flow_id": flow_id, "skip_resource_in_use_check": skip_resource_in_use_check }),
        )
    }

    async fn create_flow_version(&self, flow_id: &str, description: &str) -> Result<FlowVersion> {
        self.call(
            "create_flow_version",
            json!({ "flow_id": flow_id, "description": description }),
        )
    }

    async fn get_flow_version(&self, flow_id: &str, version: &str) -> Result<FlowVersion> {
        self.call("get_flow_version", json!({ "flow_id": flow_id, "version": version }))
    }

    async fn delete_flow_version(&self, flow_id: &str, version: &str) -> Result<DeletedFlowVersion> {
        self.call("delete_flow_version", json!({ "flow_id": flow_id, "version": version }))
    }

    async fn create_flow_alias(&self, request: CreateFlowAliasRequest) -> Result<FlowAlias> {
        self.call("create_flow_alias", to_params(&request))
    }

    async fn delete_flow_alias(&self, flow_id: &str, alias_id: &str) -> Result<DeletedFlowAlias> {
        self.call("delete_flow_alias", json!({ "flow_id": flow_id, "alias_id": alias_id }))
    }
}

#[async_trait]
impl PromptApi for Stubber {
    async fn create_prompt(&self, name: &str, description: &str, variant: PromptVariant) -> Result<Prompt> {
        self.call(
            "create_prompt",
            json!({ "name": name, "description": description, "variant": to_params(&variant) }),
        )
    }

    async fn get_prompt(&self, prompt_id: &str) -> Result<Prompt> {
        self.call("get_prompt", json!({ "prompt_id": prompt_id }))
    }

    async fn update_prompt(&self, prompt_id: &str, request: UpdatePromptRequest) -> Result<Prompt> {
        self.call(
            "update_prompt",
            json!({ "prompt_id": prompt_id, "request": to_params(&request) }),
        )
    }

    async fn delete_prompt(&self, prompt_id: &str) -> Result<String> {
        self.call("delete_prompt", json!({ "prompt_id": prompt_id }))
    }

    async fn list_prompts(&self, max_results: i32, next_token: Option<String>) -> Result<PromptPage> {
        self.call(
            "list_prompts",
            json!({ "max_results": max_results, "next_token": next_token }),
        )
    }
}

#[async_trait]
impl AgentApi for Stubber {
    async fn create_agent(&self, request: CreateAgentRequest) -> Result<Agent> {
        self.call("create_agent", to_params(&request))
    }

    async fn get_agent(&self, agent_id: &str) -> Result<Agent> {
        self.call("get_agent", json!({ "agent_id": agent_id }))
    }

    async fn delete_agent(&self, agent_id: &str, skip_resource_in_use_check: bool) -> Result<String> {
        self.call(
            "delete_agent",
            json!({ "agent_id": agent_id, "skip_resource_in_use_check": skip_resource_in_use_check }),
        )
    }

    async fn prepare_agent(&self, agent_id: &str) -> Result<PreparedAgent> {
        self.call("prepare_agent", json!({ "agent_id": agent_id }))
    }

    async fn create_agent_alias(
        &self,
        agent_id: &str,
        alias_name: &str,
        description: &str,
        agent_version: &str,
    ) -> Result<AgentAlias> {
        self.call(
            "create_agent_alias",
            json!({
                "agent_id": agent_id,
                "alias_name": alias_name,
                "description": description,
                "agent_version": agent_version,
            }),
        )
    }

    async fn delete_agent_alias(&self, agent_id: &str, alias_id: &str) -> Result<String> {
        self.call("delete_agent_alias", json!({ "agent_id": agent_id, "alias_id": alias_id }))
    }

    async fn create_agent_action_group(&self, request: CreateActionGroupRequest) -> Result<ActionGroup> {
        self.call("create_agent_action_group", to_params(&request))
    }

    async fn delete_agent_action_group(
        &self,
        agent_id: &str,
        agent_version: &str,
        action_group_id: &str,
        skip_resource_in_use_check: bool,
    ) -> Result<()> {
        self.call(
            "delete_agent_action_group",
            json!({
                "agent_id": agent_id,
                "agent_version": agent_version,
                "action_group_id": action_group_id,
                "skip_resource_in_use_check": skip_resource_in_use_check,
            }),
        )
    }
}

#[async_trait]
impl RoleApi for Stubber {
    async fn create_role(
        &self,
        role_name: &str,
        assume_role_policy_document: &str,
        description: &str,
    ) -> Result<Role> {
        self.call(
            "create_role",
            json!({
                "role_name": role_name,
                "assume_role_policy_document": assume_role_policy_document,
                "description": description,
            }),
        )
    }

    async fn put_role_policy(&self, role_name: &str, policy_name: &str, policy_document: &str) -> Result<()> {
        self.call(
            "put_role_policy",
            json!({
                "role_name": role_name,
                "policy_name": policy_name,
                "policy_document": policy_document,
            }),
        )
    }

    async fn list_role_policies(&self, role_name: &str) -> Result<Vec<String>> {
        self.call("list_role_policies", json!({ "role_name": role_name }))
    }

    async fn delete_role_policy(&self, role_name: &str, policy_name: &str) -> Result<()> {
        self.call(
            "delete_role_policy",
            json!({ "role_name": role_name, "policy_name": policy_name }),
        )
    }

    async fn delete_role(&self, role_name: &str) -> Result<()> {
        self.call("delete_role", json!({ "role_name": role_name }))
    }
}

#[async_trait]
impl AgentRuntimeApi for Stubber {
    async fn invoke_agent(&self, request: InvokeAgentRequest) -> Result<EventStream<AgentEvent>> {
        let events: Vec<AgentEvent> = self.call("invoke_agent", to_params(&request))?;
        Ok(stream::iter(events.into_iter().map(Ok)).boxed())
    }

    async fn invoke_flow(&self, request: InvokeFlowRequest) -> Result<FlowStream> {
        let reply: FlowReply = self.call("invoke_flow", to_params(&request))?;
        Ok(FlowStream {
            execution_id: reply.execution_id,
            events: stream::iter(reply.events.into_iter().map(Ok)).boxed(),
        })
    }
}

#[async_trait]
impl ConverseApi for Stubber {
    async fn converse_with_prompt(
        &self,
        prompt_arn: &str,
        variables: &BTreeMap<String, String>,
    ) -> Result<Vec<String>> {
        self.call(
            "converse",
            json!({ "prompt_arn": prompt_arn, "variables": variables }),
        )
    }
}

#[async_trait]
impl CustomLabelsApi for Stubber {
    async fn describe_projects(&self, names: Option<Vec<String>>) -> Result<Vec<ProjectDescription>> {
        self.call("describe_projects", json!({ "names": names }))
    }

    async fn create_project(&self, project_name: &str) -> Result<String> {
        self.call("create_project", json!({ "project_name": project_name }))
    }

    async fn delete_project(&self, project_arn: &str) -> Result<String> {
        self.call("delete_project", json!({ "project_arn": project_arn }))
    }

    async fn create_dataset(&self, request: CreateDatasetRequest) -> Result<String> {
        self.call("create_dataset", to_params(&request))
    }

    async fn describe_dataset(&self, dataset_arn: &str) -> Result<DatasetDescription> {
        self.call("describe_dataset", json!({ "dataset_arn": dataset_arn }))
    }

    async fn delete_dataset(&self, dataset_arn: &str) -> Result<()> {
        self.call("delete_dataset", json!({ "dataset_arn": dataset_arn }))
    }

    async fn update_dataset_entries(&self, dataset_arn: &str, changes: Vec<u8>) -> Result<()> {
        self.call(
            "update_dataset_entries",
            json!({ "dataset_arn": dataset_arn, "changes": String::from_utf8_lossy(&changes) }),
        )
    }

    async fn distribute_dataset_entries(&self, train_dataset_arn: &str, test_dataset_arn: &str) -> Result<()> {
        self.call(
            "distribute_dataset_entries",
            json!({ "train_dataset_arn": train_dataset_arn, "test_dataset_arn": test_dataset_arn }),
        )
    }

    async fn list_dataset_entries(
        &self,
        dataset_arn: &str,
        has_errors: bool,
        max_results: i32,
        next_token: Option<String>,
    ) -> Result<EntryPage> {
        self.call(
            "list_dataset_entries",
            json!({
                "dataset_arn": dataset_arn,
                "has_errors": has_errors,
                "max_results": max_results,
                "next_token": next_token,
            }),
        )
    }

    async fn describe_project_versions(
        &self,
        project_arn: &str,
        version_names: Option<Vec<String>>,
    ) -> Result<Vec<ModelDescription>> {
        self.call(
            "describe_project_versions",
            json!({ "project_arn": project_arn, "version_names": version_names }),
        )
    }

    async fn start_project_version(
        &self,
        model_arn: &str,
        min_inference_units: i32,
        max_inference_units: Option<i32>,
    ) -> Result<String> {
        self.call(
            "start_project_version",
            json!({
                "model_arn": model_arn,
                "min_inference_units": min_inference_units,
                "max_inference_units": max_inference_units,
            }),
        )
    }

    async fn stop_project_version(&self, model_arn: &str) -> Result<String> {
        self.call("stop_project_version", json!({ "model_arn": model_arn }))
    }

    async fn delete_project_version(&self, model_arn: &str) -> Result<String> {
        self.call("delete_project_version", json!({ "model_arn": model_arn }))
    }

    async fn copy_project_version(&self, request: CopyModelRequest) -> Result<String> {
        self.call("copy_project_version", to_params(&request))
    }

    async fn put_project_policy(&self, request: PutPolicyRequest) -> Result<String> {
        self.call("put_project_policy", to_params(&request))
    }

    async fn list_project_policies(
        &self,
        project_arn: &str,
        max_results: i32,
        next_token: Option<String>,
    ) -> Result<PolicyPage> {
        self.call(
            "list_project_policies",
            json!({ "project_arn": project_arn, "max_results": max_results, "next_token": next_token }),
        )
    }

    async fn delete_project_policy(
        &self,
        project_arn: &str,
        policy_name: &str,
        policy_revision_id: Option<String>,
    ) -> Result<()> {
        self.call(
            "delete_project_policy",
            json!({
                "project_arn": project_arn,
                "policy_name": policy_name,
                "policy_revision_id": policy_revision_id,
            }),
        )
    }

    async fn list_tags_for_resource(&self, resource_arn: &str) -> Result<BTreeMap<String, String>> {
        self.call("list_tags_for_resource", json!({ "resource_arn": resource_arn }))
    }
}

#[async_trait]
impl LookoutVisionApi for Stubber {
    async fn list_projects(&self) -> Result<Vec<LookoutProject>> {
        self.call("list_projects", json!({}))
    }

    async fn describe_project(&self, project_name: &str) -> Result<Vec<LookoutDataset>> {
        self.call("describe_project", json!({ "project_name": project_name }))
    }

    async fn list_dataset_entries(
        &self,
        project_name: &str,
        dataset_type: &str,
        next_token: Option<String>,
    ) -> Result<LookoutEntryPage> {
        self.call(
            "lookout_list_dataset_entries",
            json!({ "project_name": project_name, "dataset_type": dataset_type, "next_token": next_token }),
        )
    }
}

#[async_trait]
impl ObjectStore for Stubber {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let body: String = self.call("get_object", json!({ "bucket": bucket, "key": key }))?;
        Ok(body.into_bytes())
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        self.call(
            "put_object",
            json!({ "bucket": bucket, "key": key, "body": String::from_utf8_lossy(&body) }),
        )
    }

    async fn copy_object(&self, source_bucket: &str, source_key: &str, bucket: &str, key: &str) -> Result<()> {
        self.call(
            "copy_object",
            json!({
                "source_bucket": source_bucket,
                "source_key": source_key,
                "bucket": bucket,
                "key": key,
            }),
        )
    }

    async fn object_exists(&self, bucket: &str, key: &str) -> Result<bool> {
        self.call("head_object", json!({ "bucket": bucket, "key": key }))
    }
}

pub fn assert_service_error<T: std::fmt::Debug>(result: Result<T>, code: &str) {
    match result {
        Err(err) => assert_eq!(err.service_code(), Some(code), "unexpected error {err}"),
        Ok(value) => panic!("expected {code}, got {value:?}"),
    }
}
