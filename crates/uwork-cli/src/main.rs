use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use uwork_chat::{ChatClient, ToolBridge};
use uwork_core::{ItemService, ItemStore};
use uwork_server::AppState;

#[derive(Parser)]
#[command(
    name = "uwork",
    about = "Useful Work tracker — REST API and conversational assistant over a single items table",
    version
)]
struct Cli {
    /// Port to listen on
    #[arg(long, env = "UWORK_PORT", default_value = "3001")]
    port: u16,

    /// Path to the SQLite database file
    #[arg(long, env = "UWORK_DB_PATH", default_value = "useful-work.db")]
    db_path: PathBuf,

    /// Chat-completions endpoint for the conversational assistant
    #[arg(
        long,
        env = "UWORK_LLM_URL",
        default_value = "https://api.openai.com/v1/chat/completions"
    )]
    llm_url: String,

    /// API key for the LLM endpoint; chat is disabled when unset
    #[arg(long, env = "UWORK_LLM_API_KEY")]
    llm_api_key: Option<String>,

    /// Model name sent with every completion request
    #[arg(long, env = "UWORK_LLM_MODEL", default_value = "gpt-4o-mini")]
    llm_model: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .init();

    let store = ItemStore::open(&cli.db_path)?;
    let service = ItemService::new(store);

    let bridge = match cli.llm_api_key {
        Some(key) => {
            let client = ChatClient::new(cli.llm_url, key, cli.llm_model)?;
            Some(Arc::new(ToolBridge::new(client, service.clone())))
        }
        None => {
            tracing::info!("UWORK_LLM_API_KEY not set; /api/chat disabled");
            None
        }
    };

    uwork_server::serve(AppState::new(service, bridge), cli.port).await
}
