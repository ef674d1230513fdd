//! Runnable Rust examples for managed AI agents and custom-label vision on AWS.
//!
//! Each module wraps one group of service calls in small async functions that
//! log what they do, translate SDK errors into [`CloudAiError`] and, for
//! long-running operations, poll until the resource settles.
//!
//! ## Features
//! - Flows, flow versions and aliases, managed prompts and agents ([`agent`]).
//! - Invoking agents, flows and prompts, including the code interpreter ([`runtime`]).
//! - Execution roles for flows ([`iam`]).
//! - Custom-label projects, datasets, models and project policies ([`custom_labels`]).
//! - Exporting anomaly-detection datasets to S3 ([`lookout`]).
//!
//! Every operation takes its client as a trait object, so tests can substitute
//! a stub for the SDK client.
//!
//! ```no_run
//! # use cloudai::{config::AwsSettings, custom_labels::project};
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = AwsSettings::from_env().load().await;
//! let client = aws_sdk_rekognition::Client::new(&config);
//! for project in project::describe_projects(&client, None).await? {
//!     println!("{} {}", project.project_arn, project.status);
//! }
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod convert;
pub mod custom_labels;
pub mod error;
pub mod iam;
pub mod lookout;
pub mod poll;
pub mod runtime;
pub mod s3;

pub use error::{CloudAiError, Result};
