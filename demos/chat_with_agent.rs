//! An interactive chat with an agent. Type `quit` or press Ctrl-C to stop.
//!
//! Usage:
//! `cargo run --example chat_with_agent -- <AGENT_ID> <AGENT_ALIAS_ID> [--trace]`

use clap::Parser;
use cloudai::config::AwsSettings;
use cloudai::runtime::{AgentRuntime, ChatSession};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
struct Args {
    #[arg(long, env = "CLOUDAI_REGION")]
    region: Option<String>,
    #[arg(long, env = "CLOUDAI_PROFILE")]
    profile: Option<String>,
    agent_id: String,
    agent_alias_id: String,
    /// Logs the agent's reasoning trace for every turn.
    #[arg(long)]
    trace: bool,
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
    let chat = ChatSession::new(runtime.clone(), &args.agent_id, &args.agent_alias_id);
    println!("Session {}. Type 'quit' to exit.", chat.session_id());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("You: ");
        tokio::io::stdout().flush().await?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(prompt) = line else { break };
        let prompt = prompt.trim();
        if prompt.eq_ignore_ascii_case("quit") {
            break;
        }
        if prompt.is_empty() {
            continue;
        }

        let reply = if args.trace {
            runtime
                .invoke_agent_traced(&args.agent_id, &args.agent_alias_id, chat.session_id(), prompt)
                .await
        } else {
            chat.send(prompt).await
        };
        match reply {
            Ok(text) => println!("Agent: {text}"),
            Err(e) => eprintln!("Error: {e}"),
        }
    }
    println!("Goodbye.");
    Ok(())
}
