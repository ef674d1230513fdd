use super::LookoutVisionApi;
use crate::error::{CloudAiError, Result};
use crate::poll::wait_until_present;
use crate::s3::{ObjectStore, S3Uri};
use serde_json::Value;
use std::time::Duration;
use tracing::{error, info};

const SOURCE_REF: &str = "source-ref";
const EXISTS_INTERVAL: Duration = Duration::from_secs(5);

/// Copies every dataset of a project, images and manifest, under `s3_path`.
///
/// Each image referenced by an entry's `source-ref` is copied to
/// `{s3_path}{dataset_type}/{original key}` and the entry is rewritten to point
/// at the copy. The rewritten entries are written to
/// `{s3_path}datasets/{dataset_type}.manifest`.
pub async fn export_datasets(
    client: &dyn LookoutVisionApi,
    store: &dyn ObjectStore,
    project_name: &str,
    s3_path: &str,
) -> Result<()> {
    info!(project_name, s3_path, "exporting datasets");
    export(client, store, project_name, s3_path)
        .await
        .inspect_err(|err| error!(project_name, "couldn't export datasets: {err}"))?;
    info!(project_name, s3_path, "exported datasets");
    Ok(())
}

async fn export(client: &dyn LookoutVisionApi, store: &dyn ObjectStore, project_name: &str, s3_path: &str) -> Result<()> {
    let mut destination = S3Uri::parse(s3_path)?;
    if !destination.key.is_empty() && !destination.key.ends_with('/') {
        destination.key.push('/');
    }

    for dataset in client.describe_project(project_name).await? {
        let dataset_type = dataset.dataset_type.as_str();
        let mut manifest = String::new();
        for line in list_entries(client, project_name, dataset_type).await? {
            let entry = copy_entry_image(store, &line, &destination.join(&format!("{dataset_type}/"))).await?;
            manifest.push_str(&entry.to_string());
            manifest.push('\n');
        }

        let manifest_uri = destination.join(&format!("datasets/{dataset_type}.manifest"));
        store
            .put_object(&manifest_uri.bucket, &manifest_uri.key, manifest.into_bytes())
            .await?;
        wait_until_present(&manifest_uri.to_string(), EXISTS_INTERVAL, || {
            store.object_exists(&manifest_uri.bucket, &manifest_uri.key)
        })
        .await?;
        info!(dataset_type, manifest = %manifest_uri, "wrote dataset manifest");
    }
    Ok(())
}

async fn list_entries(client: &dyn LookoutVisionApi, project_name: &str, dataset_type: &str) -> Result<Vec<String>> {
    let mut entries = Vec::new();
    let mut next_token = None;
    loop {
        let page = client
            .list_dataset_entries(project_name, dataset_type, next_token)
            .await?;
        entries.extend(page.entries);
        next_token = page.next_token;
        if next_token.is_none() {
            return Ok(entries);
        }
    }
}

/// Copies the image an entry refers to under `prefix` and returns the entry
/// pointing at the copy.
async fn copy_entry_image(store: &dyn ObjectStore, line: &str, prefix: &S3Uri) -> Result<Value> {
    let mut entry: Value = serde_json::from_str(line)?;
    let source = entry
        .get(SOURCE_REF)
        .and_then(Value::as_str)
        .ok_or_else(|| CloudAiError::InvalidArgument(format!("dataset entry has no {SOURCE_REF}: {line}")))
        .and_then(S3Uri::parse)?;
    let target = prefix.join(&source.key);

    store
        .copy_object(&source.bucket, &source.key, &target.bucket, &target.key)
        .await?;
    wait_until_present(&target.to_string(), EXISTS_INTERVAL, || {
        store.object_exists(&target.bucket, &target.key)
    })
    .await?;
    info!(source = %source, target = %target, "copied image");

    entry[SOURCE_REF] = Value::String(target.to_string());
    Ok(entry)
}
