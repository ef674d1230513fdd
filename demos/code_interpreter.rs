//! Sends a file to an agent with the code interpreter enabled and saves any
//! charts it draws.
//!
//! Usage:
//! `cargo run --example code_interpreter -- <AGENT_ID> <AGENT_ALIAS_ID> song_plays.csv "Chart plays per song" [--out images]`

use clap::Parser;
use cloudai::config::AwsSettings;
use cloudai::runtime::code_interpreter::save_images;
use cloudai::runtime::{AgentRuntime, CodeInterpreter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
struct Args {
    #[arg(long, env = "CLOUDAI_REGION")]
    region: Option<String>,
    #[arg(long, env = "CLOUDAI_PROFILE")]
    profile: Option<String>,
    agent_id: String,
    agent_alias_id: String,
    file: PathBuf,
    prompt: String,
    /// Directory for generated images.
    #[arg(long, default_value = "generated-images")]
    out: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let mut settings = AwsSettings::from_env();
    settings.region = args.region.or(settings.region);
    settings.profile = args.profile.or(settings.profile);
    let interpreter = CodeInterpreter::new(AgentRuntime::from_conf(&settings.load().await));

    let session_id = uuid::Uuid::new_v4().to_string();
    let response = interpreter
        .invoke_agent_with_file(&args.agent_id, &args.agent_alias_id, &session_id, &args.prompt, &args.file)
        .await?;

    println!("{}", response.text);
    if !response.images.is_empty() {
        for path in save_images(&response.images, &args.out).await? {
            println!("Saved {}", path.display());
        }
    }
    Ok(())
}
