//! Lists the custom-label projects in the account, with their datasets.
//!
//! Usage:
//! `cargo run --example hello_custom_labels -- [--region us-east-1] [--profile NAME]`

use clap::Parser;
use cloudai::config::{AwsSettings, CUSTOM_LABELS_PROFILE};
use cloudai::custom_labels::project;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
struct Args {
    #[arg(long, env = "CLOUDAI_REGION")]
    region: Option<String>,
    /// Named profile; defaults to the custom labels profile.
    #[arg(long, env = "CLOUDAI_PROFILE", default_value = CUSTOM_LABELS_PROFILE)]
    profile: String,
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

    let projects = project::describe_projects(&client, None).await?;
    if projects.is_empty() {
        println!("No projects found.");
    }
    for project in projects {
        println!("Project: {}", project.project_arn);
        println!("\tStatus: {}", project.status);
        if let Some(created) = project.created_at {
            println!("\tCreated: {created}");
        }
        for dataset in project.datasets {
            println!("\t{} dataset: {} ({})", dataset.dataset_type, dataset.dataset_arn, dataset.status);
        }
    }
    Ok(())
}
