//! Creates a managed prompt, runs it, updates it, lists prompts and deletes it.
//!
//! Usage:
//! `cargo run --example prompts_scenario -- [--genre jazz] [--number 3]`

use clap::Parser;
use cloudai::agent::{prompt, PromptUpdate};
use cloudai::config::AwsSettings;
use cloudai::runtime::prompt::invoke_prompt;
use std::collections::BTreeMap;
use tracing_subscriber::EnvFilter;

const MODEL_ID: &str = "anthropic.claude-3-haiku-20240307-v1:0";
const TEMPLATE: &str = "Make me a {{genre}} playlist of {{number}} songs. Only list the songs.";

#[derive(Parser)]
struct Args {
    #[arg(long, env = "CLOUDAI_REGION")]
    region: Option<String>,
    #[arg(long, env = "CLOUDAI_PROFILE")]
    profile: Option<String>,
    #[arg(long, default_value = "playlist-prompt")]
    name: String,
    #[arg(long, default_value = "jazz")]
    genre: String,
    #[arg(long, default_value_t = 3)]
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
    let prompts = aws_sdk_bedrockagent::Client::new(&config);
    let converse = aws_sdk_bedrockruntime::Client::new(&config);

    let created = prompt::create_prompt(&prompts, &args.name, "Makes playlists", TEMPLATE, Some(MODEL_ID)).await?;
    println!("Created prompt {} with variables {:?}", created.id, created.variants[0].input_variables);

    let variables = BTreeMap::from([
        ("genre".to_string(), args.genre.clone()),
        ("number".to_string(), args.number.to_string()),
    ]);
    let playlist = invoke_prompt(&converse, &created.arn, &variables).await?;
    println!("{playlist}");

    let update = PromptUpdate {
        name: Some(args.name.clone()),
        description: Some("Makes short playlists".to_string()),
        ..PromptUpdate::default()
    };
    let updated = prompt::update_prompt(&prompts, &created.id, update).await?;
    println!("Updated prompt: {}", updated.description.unwrap_or_default());

    for summary in prompt::list_prompts(&prompts, 10).await? {
        println!("{}\t{}", summary.id, summary.name);
    }

    prompt::delete_prompt(&prompts, &created.id).await?;
    println!("Deleted prompt {}", created.id);
    Ok(())
}
