//! Managed prompts: reusable templates with `{{variable}}` placeholders.

use super::PromptApi;
use crate::error::Result;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Name of the single variant the examples create.
pub const DEFAULT_VARIANT: &str = "default";

static TEMPLATE_VARIABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(.*?)\}\}").expect("template variable regex is valid"));

/// A TEXT template variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptVariant {
    pub name: String,
    pub text: String,
    pub input_variables: Vec<String>,
    pub model_id: Option<String>,
}

impl PromptVariant {
    /// Builds the `default` variant, declaring every placeholder in `template`.
    pub fn from_template(template: &str, model_id: Option<&str>) -> Self {
        Self {
            name: DEFAULT_VARIANT.to_string(),
            text: template.to_string(),
            input_variables: template_variables(template),
            model_id: model_id.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub id: String,
    pub arn: String,
    pub name: String,
    pub description: Option<String>,
    pub version: String,
    pub default_variant: Option<String>,
    pub variants: Vec<PromptVariant>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptSummary {
    pub id: String,
    pub arn: String,
    pub name: String,
    pub description: Option<String>,
    pub version: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptPage {
    pub summaries: Vec<PromptSummary>,
    pub next_token: Option<String>,
}

/// Fields to change on a prompt. Unset fields are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub template: Option<String>,
    pub model_id: Option<String>,
}

/// The update request as sent to the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePromptRequest {
    pub name: String,
    pub description: Option<String>,
    pub variant: Option<PromptVariant>,
}

/// Placeholder names in order of appearance, trimmed of surrounding whitespace.
pub fn template_variables(template: &str) -> Vec<String> {
    TEMPLATE_VARIABLE
        .captures_iter(template)
        .map(|c| c[1].trim().to_string())
        .collect()
}

pub async fn create_prompt(
    client: &dyn PromptApi,
    name: &str,
    description: &str,
    template: &str,
    model_id: Option<&str>,
) -> Result<Prompt> {
    info!(name, "creating prompt");
    let variant = PromptVariant::from_template(template, model_id);
    let prompt = client
        .create_prompt(name, description, variant)
        .await
        .inspect_err(|err| error!(name, "couldn't create prompt: {err}"))?;
    info!(name, id = %prompt.id, "created prompt");
    Ok(prompt)
}

pub async fn get_prompt(client: &dyn PromptApi, prompt_id: &str) -> Result<Prompt> {
    info!(prompt_id, "getting prompt");
    let prompt = client
        .get_prompt(prompt_id)
        .await
        .inspect_err(|err| error!(prompt_id, "couldn't get prompt: {err}"))?;
    info!(prompt_id, name = %prompt.name, "retrieved prompt");
    Ok(prompt)
}

/// Updates a prompt. The service requires a name, so the prompt ID stands in
/// when none is given. A new variant is sent only with a template or model.
pub async fn update_prompt(client: &dyn PromptApi, prompt_id: &str, update: PromptUpdate) -> Result<Prompt> {
    info!(prompt_id, "updating prompt");
    let variant = (update.template.is_some() || update.model_id.is_some()).then(|| {
        PromptVariant::from_template(
            update.template.as_deref().unwrap_or_default(),
            update.model_id.as_deref(),
        )
    });
    let request = UpdatePromptRequest {
        name: update.name.unwrap_or_else(|| prompt_id.to_string()),
        description: update.description,
        variant,
    };

    let prompt = client
        .update_prompt(prompt_id, request)
        .await
        .inspect_err(|err| error!(prompt_id, "couldn't update prompt: {err}"))?;
    info!(prompt_id, name = %prompt.name, "updated prompt");
    Ok(prompt)
}

pub async fn delete_prompt(client: &dyn PromptApi, prompt_id: &str) -> Result<String> {
    info!(prompt_id, "deleting prompt");
    let id = client
        .delete_prompt(prompt_id)
        .await
        .inspect_err(|err| error!(prompt_id, "couldn't delete prompt: {err}"))?;
    info!(prompt_id, "finished deleting prompt");
    Ok(id)
}

/// Lists every prompt, requesting `max_results` per page.
pub async fn list_prompts(client: &dyn PromptApi, max_results: i32) -> Result<Vec<PromptSummary>> {
    info!("listing prompts");
    let mut prompts = Vec::new();
    let mut next_token = None;
    loop {
        let page = client
            .list_prompts(max_results, next_token)
            .await
            .inspect_err(|err| error!("couldn't list prompts: {err}"))?;
        prompts.extend(page.summaries);
        next_token = page.next_token;
        if next_token.is_none() {
            break;
        }
    }
    info!(count = prompts.len(), "listed prompts");
    Ok(prompts)
}
