use super::ConverseApi;
use crate::error::Result;
use std::collections::BTreeMap;
use tracing::{error, info};

/// Runs a managed prompt by ARN, filling its `{{variables}}` with text values.
///
/// Returns the last text block of the reply, or an empty string if it has none.
pub async fn invoke_prompt(
    client: &dyn ConverseApi,
    prompt_arn: &str,
    variables: &BTreeMap<String, String>,
) -> Result<String> {
    info!(prompt_arn, "invoking prompt");
    let blocks = client
        .converse_with_prompt(prompt_arn, variables)
        .await
        .inspect_err(|err| error!(prompt_arn, "couldn't invoke prompt: {err}"))?;
    let text = blocks.into_iter().last().unwrap_or_default();
    info!(prompt_arn, "finished invoking prompt");
    Ok(text)
}
