//! Walks a flow through its whole life:
//! 1. Creating an execution role for the flow.
//! 2. Creating the playlist flow from its definition file and preparing it.
//! 3. Snapshotting a version and pointing an alias at it.
//! 4. Running the flow once through the alias.
//! 5. Deleting the alias, version, flow and role again.
//!
//! Usage:
//! `cargo run --example flow_lifecycle -- [--definition demos/data/playlist_flow.json] [--genre pop] [--number 5]`

use clap::Parser;
use cloudai::agent::flow::{self, PREPARED};
use cloudai::agent::{flow_alias, flow_version, FlowDefinition};
use cloudai::config::AwsSettings;
use cloudai::iam;
use cloudai::runtime::flow::playlist_input;
use cloudai::runtime::AgentRuntime;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const MODEL_ID: &str = "anthropic.claude-3-haiku-20240307-v1:0";

#[derive(Parser)]
struct Args {
    #[arg(long, env = "CLOUDAI_REGION")]
    region: Option<String>,
    #[arg(long, env = "CLOUDAI_PROFILE")]
    profile: Option<String>,
    #[arg(long, default_value = "demos/data/playlist_flow.json")]
    definition: PathBuf,
    #[arg(long, default_value = "playlist-flow")]
    name: String,
    #[arg(long, default_value = "pop")]
    genre: String,
    #[arg(long, default_value_t = 5)]
    number: u32,
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
    let config = settings.load().await;
    let roles = aws_sdk_iam::Client::new(&config);
    let flows = aws_sdk_bedrockagent::Client::new(&config);
    let runtime = AgentRuntime::from_conf(&config);

    let role_name = format!("{}-role", args.name);
    let definition = FlowDefinition::from_file(&args.definition).await?;

    // 1. Role
    let role = iam::create_flow_role(&roles, &role_name).await?;
    println!("Created role {}", role.arn);
    // New roles take a few seconds before the service can assume them.
    tokio::time::sleep(Duration::from_secs(10)).await;

    // 2. Flow
    let created = flow::create_flow(&flows, &args.name, "Makes playlists", &role.arn, definition).await?;
    println!("Created flow {} ({})", created.id, created.status);

    let model_arn = format!(
        "arn:aws:bedrock:{}::foundation-model/{MODEL_ID}",
        config.region().map(|r| r.as_ref()).unwrap_or("us-east-1")
    );
    iam::update_role_policy(&roles, &role_name, &[created.arn.clone(), model_arn]).await?;

    let status = flow::prepare_flow(&flows, &created.id).await?;
    println!("Flow status: {status}");

    if status == PREPARED {
        // 3. Version and alias
        let version = flow_version::create_flow_version(&flows, &created.id, "first version").await?;
        let alias_id =
            flow_alias::create_flow_alias(&flows, &created.id, &version, "latest", "Routes to the first version")
                .await?;
        println!("Created version {version} and alias {alias_id}");

        // 4. Run
        let result = runtime
            .invoke_flow(&created.id, &alias_id, vec![playlist_input(&args.genre, args.number)], None)
            .await?;
        println!("Flow finished: {}", result.status);
        for output in &result.outputs {
            println!("{}:\n{}", output.node_name, output.document);
        }

        // 5. Clean up
        flow_alias::delete_flow_alias(&flows, &created.id, &alias_id).await?;
        flow_version::delete_flow_version(&flows, &created.id, &version).await?;
    } else {
        eprintln!("Flow didn't prepare; skipping the run.");
    }

    flow::delete_flow(&flows, &created.id).await?;
    iam::delete_flow_role(&roles, &role_name).await?;
    println!("Deleted flow {} and role {role_name}", created.id);
    Ok(())
}
