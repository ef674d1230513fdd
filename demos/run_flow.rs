//! Runs an existing flow, answering any input requests from stdin.
//!
//! Usage:
//! `cargo run --example run_flow -- <FLOW_ID> [FLOW_ALIAS_ID] [--genre pop] [--number 5]`

use clap::Parser;
use cloudai::agent::flow_alias::TEST_ALIAS_ID;
use cloudai::config::AwsSettings;
use cloudai::runtime::flow::{playlist_input, INPUT_REQUIRED};
use cloudai::runtime::{AgentRuntime, FlowInput};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
struct Args {
    #[arg(long, env = "CLOUDAI_REGION")]
    region: Option<String>,
    #[arg(long, env = "CLOUDAI_PROFILE")]
    profile: Option<String>,
    flow_id: String,
    /// Defaults to the draft test alias.
    #[arg(default_value = TEST_ALIAS_ID)]
    flow_alias_id: String,
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
    let runtime = AgentRuntime::from_conf(&settings.load().await);

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut inputs = vec![playlist_input(&args.genre, args.number)];
    let mut execution_id: Option<String> = None;
    loop {
        let result = runtime
            .invoke_flow(&args.flow_id, &args.flow_alias_id, inputs, execution_id.as_deref())
            .await?;
        for output in &result.outputs {
            println!("{}", output.document.as_str().map(str::to_string).unwrap_or_else(|| output.document.to_string()));
        }
        if result.status != INPUT_REQUIRED {
            println!("Flow finished: {}", result.status);
            break;
        }
        let Some(request) = result.input_required else {
            break;
        };
        println!("{}", request.content);
        let Some(answer) = stdin.next_line().await? else {
            break;
        };
        execution_id = result.execution_id;
        inputs = vec![FlowInput {
            node_name: request.node_name,
            node_output_name: None,
            node_input_name: Some("agentInputText".to_string()),
            document: Value::String(answer),
        }];
    }
    Ok(())
}
