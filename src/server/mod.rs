pub mod api;
pub mod error;

use crate::cli::Args;
use crate::llm::chat::ChatClient;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use log::{ info, error, warn };
use tokio::signal;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub chat_temperature: f32,
    pub quiz_temperature: f32,
    pub quiz_max_count: Option<u32>,
}

impl GenerationSettings {
    pub fn from_args(args: &Args) -> Self {
        Self {
            chat_temperature: args.chat_temperature,
            quiz_temperature: args.quiz_temperature,
            quiz_max_count: args.quiz_max_count,
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            chat_temperature: 0.3,
            quiz_temperature: 0.8,
            quiz_max_count: None,
        }
    }
}

/// Shared, read-only request context. `chat_client` is `None` when no API key is configured.
#[derive(Clone)]
pub struct AppState {
    pub chat_client: Option<Arc<dyn ChatClient>>,
    pub system_prompt: Arc<str>,
    pub settings: GenerationSettings,
}

impl AppState {
    pub fn new(
        chat_client: Option<Arc<dyn ChatClient>>,
        system_prompt: Arc<str>,
        settings: GenerationSettings,
    ) -> Self {
        Self { chat_client, system_prompt, settings }
    }
}

pub struct Server {
    addr: SocketAddr,
    state: AppState,
    args: Args,
}

impl Server {
    pub fn new(addr: SocketAddr, state: AppState, args: Args) -> Self {
        if state.chat_client.is_none() {
            warn!("CO_API_KEY is not set. Generate endpoints will answer 500 until it is configured.");
        }
        Self { addr, state, args }
    }

    pub async fn run(self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let app = api::build_router(self.state);

        if self.args.enable_tls {
            let (cert_path, key_path) = match (&self.args.tls_cert_path, &self.args.tls_key_path) {
                (Some(cert), Some(key)) => (cert, key),
                (Some(_), None) | (None, Some(_)) => {
                    error!("Both --tls-cert-path and --tls-key-path must be provided to enable TLS.");
                    return Err("Missing TLS certificate or key path".into());
                }
                (None, None) => {
                    error!("--enable-tls was set but no certificate/key paths provided.");
                    return Err("TLS enabled without cert/key".into());
                }
            };

            info!("TLS enabled. Loading certificate from '{}' and key from '{}'", cert_path, key_path);
            let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                cert_path,
                key_path
            ).await?;

            let handle = axum_server::Handle::new();
            let shutdown_handle = handle.clone();
            tokio::spawn(async move {
                shutdown_signal().await;
                shutdown_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
            });

            info!("HTTPS server listening on: https://{}", self.addr);
            axum_server::bind_rustls(self.addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service()).await?;
        } else {
            let listener = tokio::net::TcpListener::bind(self.addr).await.map_err(|e| {
                error!("Failed to bind HTTP server to {}: {}. Try a different port.", self.addr, e);
                e
            })?;

            info!("HTTP server listening on: http://{}", self.addr);
            axum::serve(listener, app.into_make_service())
                .with_graceful_shutdown(shutdown_signal()).await?;
        }

        info!("Server shutdown complete");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, starting graceful shutdown"),
        _ = terminate => info!("Received SIGTERM, starting graceful shutdown"),
    }
}
