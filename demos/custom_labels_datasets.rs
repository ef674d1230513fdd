//! Manages the datasets of a custom-label project.
//!
//! Usage:
//! `cargo run --example custom_labels_datasets -- create <PROJECT_ARN> train --bucket B --manifest KEY`
//! `cargo run --example custom_labels_datasets -- copy <PROJECT_ARN> test <DATASET_ARN>`
//! `cargo run --example custom_labels_datasets -- update <DATASET_ARN> updates.manifest`
//! `cargo run --example custom_labels_datasets -- distribute <TRAIN_ARN> <TEST_ARN>`
//! `cargo run --example custom_labels_datasets -- entries <DATASET_ARN> [--errors-only]`

use clap::{Parser, Subcommand};
use cloudai::config::{AwsSettings, CUSTOM_LABELS_PROFILE};
use cloudai::convert::print_json;
use cloudai::custom_labels::{dataset, DatasetType};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
struct Args {
    #[arg(long, env = "CLOUDAI_REGION")]
    region: Option<String>,
    #[arg(long, env = "CLOUDAI_PROFILE", default_value = CUSTOM_LABELS_PROFILE)]
    profile: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Creates a dataset from a manifest file in S3.
    Create {
        project_arn: String,
        dataset_type: DatasetType,
        #[arg(long)]
        bucket: String,
        #[arg(long)]
        manifest: String,
    },
    /// Creates a dataset by copying an existing one.
    Copy {
        project_arn: String,
        dataset_type: DatasetType,
        dataset_arn: String,
    },
    Describe { dataset_arn: String },
    Delete { dataset_arn: String },
    /// Adds or updates entries from a local JSON Lines manifest.
    Update { dataset_arn: String, manifest: PathBuf },
    /// Splits the training dataset between training and test.
    Distribute { train_arn: String, test_arn: String },
    Entries {
        dataset_arn: String,
        #[arg(long)]
        errors_only: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let mut settings = AwsSettings::from_env().with_profile(args.profile);
    settings.region = args.region.or(settings.region);
    let client = aws_sdk_rekognition::Client::new(&settings.load().await);

    match args.command {
        Command::Create {
            project_arn,
            dataset_type,
            bucket,
            manifest,
        } => {
            let arn =
                dataset::create_dataset_from_manifest(&client, &project_arn, dataset_type, &bucket, &manifest)
                    .await?;
            println!("Created {dataset_type} dataset: {arn}");
        }
        Command::Copy {
            project_arn,
            dataset_type,
            dataset_arn,
        } => {
            let arn = dataset::create_dataset_from_existing(&client, &project_arn, dataset_type, &dataset_arn).await?;
            println!("Created {dataset_type} dataset: {arn}");
        }
        Command::Describe { dataset_arn } => {
            print_json(&dataset::describe_dataset(&client, &dataset_arn).await?)?;
        }
        Command::Delete { dataset_arn } => {
            dataset::delete_dataset(&client, &dataset_arn).await?;
            println!("Deleted dataset: {dataset_arn}");
        }
        Command::Update { dataset_arn, manifest } => {
            let update = dataset::update_dataset_entries(&client, &dataset_arn, &manifest).await?;
            println!("Status: {}", update.status);
            if let Some(message) = update.message {
                println!("Message: {message}");
            }
        }
        Command::Distribute { train_arn, test_arn } => {
            let distribution = dataset::distribute_dataset_entries(&client, &train_arn, &test_arn).await?;
            if distribution.succeeded() {
                println!("Distributed dataset entries.");
            } else {
                println!("Distribution failed.");
                print_json(&distribution)?;
            }
        }
        Command::Entries {
            dataset_arn,
            errors_only,
        } => {
            for entry in dataset::list_dataset_entries(&client, &dataset_arn, errors_only).await? {
                println!("{entry}");
            }
        }
    }
    Ok(())
}
