use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Server Args ---
    /// Host address and port for the HTTP server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "0.0.0.0:3000")]
    pub server_addr: String,

    // --- Chat LLM Provider Args ---
    /// API Key for the Cohere inference API. Without it both generate endpoints answer 500.
    #[arg(long, env = "CO_API_KEY", hide_env_values = true)]
    pub co_api_key: Option<String>,

    /// Base URL for the Cohere API
    #[arg(long, env = "CHAT_BASE_URL", default_value = "https://api.cohere.com")]
    pub chat_base_url: String,

    /// Model name used for both chat and quiz generation
    #[arg(long, env = "CHAT_MODEL", default_value = "command-a-reasoning-08-2025")]
    pub chat_model: String,

    /// Sampling temperature for chat replies. Kept low for factual answers.
    #[arg(long, env = "CHAT_TEMPERATURE", default_value = "0.3")]
    pub chat_temperature: f32,

    // --- Quiz Args ---
    /// Sampling temperature for quiz generation. Kept higher for variety.
    #[arg(long, env = "QUIZ_TEMPERATURE", default_value = "0.8")]
    pub quiz_temperature: f32,

    /// Optional ceiling on the number of quiz items a single request may ask for. Unset means no limit.
    #[arg(long, env = "QUIZ_MAX_COUNT")]
    pub quiz_max_count: Option<u32>,

    // --- Prompt Args ---
    /// Optional path to a text file replacing the built-in chat system prompt.
    #[arg(long, env = "SYSTEM_PROMPT_PATH")]
    pub system_prompt_path: Option<String>,

    // --- TLS Args ---
    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}

impl Args {
    /// The credential with blank values treated as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.co_api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}
