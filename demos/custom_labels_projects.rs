//! Creates, describes or deletes a custom-label project.
//!
//! Usage:
//! `cargo run --example custom_labels_projects -- create my-project`
//! `cargo run --example custom_labels_projects -- describe [my-project]`
//! `cargo run --example custom_labels_projects -- delete <PROJECT_ARN>`
//! `cargo run --example custom_labels_projects -- find-tag <KEY> <VALUE>`

use clap::{Parser, Subcommand};
use cloudai::config::{AwsSettings, CUSTOM_LABELS_PROFILE};
use cloudai::convert::print_json;
use cloudai::custom_labels::{project, tags};
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
    Create { name: String },
    /// Describes one project, or all of them.
    Describe { name: Option<String> },
    /// Deletes a project and waits until it is gone.
    Delete { project_arn: String },
    /// Finds models tagged with KEY=VALUE.
    FindTag { key: String, value: String },
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
        Command::Create { name } => {
            let arn = project::create_project(&client, &name).await?;
            println!("Created project: {arn}");
        }
        Command::Describe { name } => {
            let projects = project::describe_projects(&client, name.as_deref()).await?;
            print_json(&projects)?;
        }
        Command::Delete { project_arn } => {
            project::delete_project(&client, &project_arn).await?;
            println!("Deleted project: {project_arn}");
        }
        Command::FindTag { key, value } => {
            let found = tags::find_tag_in_projects(&client, &key, &value).await?;
            if found.is_empty() {
                println!("No models tagged {key}={value}.");
            }
            for model in found {
                println!("{}\n\t{}", model.project_arn, model.model_arn);
            }
        }
    }
    Ok(())
}
