pub mod models;
pub mod server;
pub mod config;
pub mod llm;
pub mod cli;
pub mod quiz;

use cli::Args;
use config::prompt::{ load_system_prompt, DEFAULT_SYSTEM_PROMPT };
use llm::LlmConfig;
use llm::chat::new_client as new_chat_client;
use log::info;
use server::{ AppState, GenerationSettings, Server };
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Chat Base URL: {}", args.chat_base_url);
    info!("Chat Model: {}", args.chat_model);
    info!("Chat Temperature: {}", args.chat_temperature);
    info!("Quiz Temperature: {}", args.quiz_temperature);
    match args.quiz_max_count {
        Some(max) => info!("Quiz Max Count: {}", max),
        None => info!("Quiz Max Count: unlimited"),
    }
    info!("API Key Configured: {}", args.api_key().is_some());
    info!("System Prompt: {}", args.system_prompt_path.as_deref().unwrap_or("built-in"));
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let system_prompt: Arc<str> = match &args.system_prompt_path {
        Some(path) => load_system_prompt(path)?,
        None => Arc::from(DEFAULT_SYSTEM_PROMPT),
    };

    let llm_config = LlmConfig::from_args(&args);
    let chat_client = match llm_config.api_key {
        Some(_) => Some(new_chat_client(&llm_config)?),
        None => None,
    };
    if let Some(client) = &chat_client {
        info!(
            "Chat client configured: Model={}, BaseURL={}",
            client.get_model(),
            client.get_base_url().as_deref().unwrap_or("adapter default")
        );
    }

    let addr = args.server_addr.parse::<SocketAddr>()?;
    let state = AppState::new(chat_client, system_prompt, GenerationSettings::from_args(&args));
    let server = Server::new(addr, state, args);
    server.run().await?;

    Ok(())
}
