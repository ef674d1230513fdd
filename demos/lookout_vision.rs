//! Lists anomaly-detection projects, or exports one project's datasets to S3.
//!
//! Usage:
//! `cargo run --example lookout_vision -- list`
//! `cargo run --example lookout_vision -- export <PROJECT_NAME> s3://bucket/prefix/`

use clap::{Parser, Subcommand};
use cloudai::config::{AwsSettings, LOOKOUT_VISION_PROFILE};
use cloudai::lookout;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
struct Args {
    #[arg(long, env = "CLOUDAI_REGION")]
    region: Option<String>,
    #[arg(long, env = "CLOUDAI_PROFILE", default_value = LOOKOUT_VISION_PROFILE)]
    profile: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    List,
    /// Copies every dataset image and manifest under an S3 path.
    Export { project_name: String, s3_path: String },
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
    let config = settings.load().await;
    let client = aws_sdk_lookoutvision::Client::new(&config);

    match args.command {
        Command::List => {
            for project in lookout::list_projects(&client).await? {
                println!("{}\t{}", project.project_name, project.project_arn);
            }
        }
        Command::Export { project_name, s3_path } => {
            let store = aws_sdk_s3::Client::new(&config);
            lookout::export_datasets(&client, &store, &project_name, &s3_path).await?;
            println!("Exported datasets of {project_name} to {s3_path}");
        }
    }
    Ok(())
}
