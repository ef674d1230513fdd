//! Hosts, stops, copies, deletes and evaluates custom-label models.
//!
//! Usage:
//! `cargo run --example custom_labels_models -- describe <PROJECT_ARN> [VERSION...]`
//! `cargo run --example custom_labels_models -- start <PROJECT_ARN> <MODEL_ARN> --min 1 [--max 2]`
//! `cargo run --example custom_labels_models -- stop <PROJECT_ARN> <MODEL_ARN>`
//! `cargo run --example custom_labels_models -- copy <SRC_PROJECT> <SRC_MODEL> <DEST_PROJECT> s3://bucket/prefix/ NAME`
//! `cargo run --example custom_labels_models -- evaluation <PROJECT_NAME> <VERSION>`

use clap::{Parser, Subcommand};
use cloudai::config::{AwsSettings, CUSTOM_LABELS_PROFILE};
use cloudai::custom_labels::evaluation::{get_model_summary_location, get_summary};
use cloudai::custom_labels::{model, ConfusionMatrix};
use cloudai::s3::S3Uri;
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
    Describe {
        project_arn: String,
        versions: Vec<String>,
    },
    Status {
        project_arn: String,
        model_arn: String,
    },
    Start {
        project_arn: String,
        model_arn: String,
        #[arg(long, default_value_t = 1)]
        min: i32,
        /// Enables auto-scaling up to this many inference units.
        #[arg(long)]
        max: Option<i32>,
    },
    Stop {
        project_arn: String,
        model_arn: String,
    },
    Delete {
        project_arn: String,
        model_arn: String,
    },
    Copy {
        source_project_arn: String,
        source_model_arn: String,
        destination_project_arn: String,
        /// Training output location, e.g. `s3://bucket/prefix/`.
        output: String,
        version_name: String,
    },
    /// Prints the confusion matrix from a model's evaluation summary.
    Evaluation {
        project_name: String,
        version_name: String,
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
    let config = settings.load().await;
    let client = aws_sdk_rekognition::Client::new(&config);

    match args.command {
        Command::Describe { project_arn, versions } => {
            let names: Vec<&str> = versions.iter().map(String::as_str).collect();
            let filter = (!names.is_empty()).then_some(names.as_slice());
            for model in model::describe_models(&client, &project_arn, filter).await? {
                println!("Model: {}", model.model_arn);
                println!("\tStatus: {}", model.status);
                if let Some(message) = &model.status_message {
                    println!("\tMessage: {message}");
                }
                if let Some(minutes) = model.billable_training_minutes() {
                    println!("\tBillable training time: {minutes:.1} minutes");
                }
                if let Some(f1) = model.evaluation.as_ref().and_then(|e| e.f1_score) {
                    println!("\tF1 score: {f1}");
                }
            }
        }
        Command::Status { project_arn, model_arn } => {
            println!("{}", model::get_model_status(&client, &project_arn, &model_arn).await?);
        }
        Command::Start {
            project_arn,
            model_arn,
            min,
            max,
        } => {
            let status = model::start_model(&client, &project_arn, &model_arn, min, max).await?;
            println!("Model status: {status}");
        }
        Command::Stop { project_arn, model_arn } => {
            let status = model::stop_model(&client, &project_arn, &model_arn).await?;
            println!("Model status: {status}");
        }
        Command::Delete { project_arn, model_arn } => {
            model::delete_model(&client, &project_arn, &model_arn).await?;
            println!("Deleted model: {model_arn}");
        }
        Command::Copy {
            source_project_arn,
            source_model_arn,
            destination_project_arn,
            output,
            version_name,
        } => {
            let (arn, status) = model::copy_model(
                &client,
                &source_project_arn,
                &source_model_arn,
                &destination_project_arn,
                &S3Uri::parse(&output)?,
                &version_name,
            )
            .await?;
            println!("Copied model {arn}: {status}");
        }
        Command::Evaluation {
            project_name,
            version_name,
        } => {
            let store = aws_sdk_s3::Client::new(&config);
            let location = get_model_summary_location(&client, &project_name, &version_name).await?;
            let summary = get_summary(&store, &location).await?;
            print!("{}", ConfusionMatrix::from_summary(&summary)?);
        }
    }
    Ok(())
}
