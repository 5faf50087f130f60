//! agentchat binary: a terminal chat with the configured agent.

use agentchat::app::ChatApp;
use agentchat::chat::terminal::{run_conversation, TerminalSurface};
use agentchat::config::RelayConfig;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                // Keep HTTP connection chatter out of the default output.
                .unwrap_or_else(|_| "info,reqwest=warn,hyper=warn,hyper_util=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> agentchat::error::Result<()> {
    let config = RelayConfig::from_env()?;
    tracing::info!(endpoint = %config.project_endpoint, agent_id = %config.agent_id, "starting");

    let app = ChatApp::from_config(&config)?;
    let surface = TerminalSurface::stdout();
    let result = run_conversation(&app, BufReader::new(tokio::io::stdin()), &surface).await;
    app.shutdown();
    result
}
