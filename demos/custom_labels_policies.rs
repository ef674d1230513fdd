//! Attaches, lists and deletes project policies so another account can copy models.
//!
//! Usage:
//! `cargo run --example custom_labels_policies -- put <PROJECT_ARN> <NAME> policy.json [--revision ID]`
//! `cargo run --example custom_labels_policies -- list <PROJECT_ARN>`
//! `cargo run --example custom_labels_policies -- delete <PROJECT_ARN> <NAME> [--revision ID]`

use clap::{Parser, Subcommand};
use cloudai::config::{AwsSettings, CUSTOM_LABELS_PROFILE};
use cloudai::custom_labels::policy;
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
    Put {
        project_arn: String,
        policy_name: String,
        document: PathBuf,
        #[arg(long)]
        revision: Option<String>,
    },
    List {
        project_arn: String,
    },
    Delete {
        project_arn: String,
        policy_name: String,
        #[arg(long)]
        revision: Option<String>,
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
        Command::Put {
            project_arn,
            policy_name,
            document,
            revision,
        } => {
            let revision =
                policy::put_project_policy(&client, &project_arn, &policy_name, &document, revision.as_deref())
                    .await?;
            println!("Policy revision: {revision}");
        }
        Command::List { project_arn } => {
            let policies = policy::list_project_policies(&client, &project_arn).await?;
            if policies.is_empty() {
                println!("No policies attached to {project_arn}.");
            }
            for policy in policies {
                println!("{policy}\n");
            }
        }
        Command::Delete {
            project_arn,
            policy_name,
            revision,
        } => {
            policy::delete_project_policy(&client, &policy_name, &project_arn, revision.as_deref()).await?;
            println!("Deleted policy: {policy_name}");
        }
    }
    Ok(())
}
