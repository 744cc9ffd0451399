//! Instruct Server - web front-end for instruction-tuned text generation

mod handlers;
mod views;

use clap::{Parser, ValueEnum};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use handlers::{router, AppState};
use instruct::{Backend, InstructService, ServiceConfig};
use views::Pages;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendArg {
    /// Text-generation pipeline endpoint returning `generated_text`
    Pipeline,
    /// OpenAI-compatible completions server
    Openai,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Pipeline => Backend::Pipeline,
            BackendArg::Openai => Backend::OpenAi,
        }
    }
}

/// Instruct Server - fill an instruction prompt, show the model's answer
#[derive(Parser, Debug)]
#[command(name = "instruct-server")]
#[command(about = "Serve a single-page instruction form backed by a text-generation model")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value = "5000")]
    port: u16,

    /// Pretrained checkpoint directory
    #[arg(short, long, default_value = instruct::types::DEFAULT_CHECKPOINT)]
    checkpoint: PathBuf,

    /// Generation backend
    #[arg(short, long, value_enum, default_value = "pipeline")]
    backend: BackendArg,

    /// Backend URL (pipeline endpoint, or e.g. http://localhost:8000/v1 for vLLM)
    #[arg(short = 'u', long, default_value = "http://127.0.0.1:8080")]
    backend_url: String,

    /// Backend API key (optional; the openai backend falls back to OPENAI_API_KEY)
    #[arg(short = 'k', long)]
    backend_key: Option<String>,
}

/// Pick the key sent to the backend.
///
/// `OPENAI_API_KEY` is only a fallback for OpenAI-compatible backends; a
/// pipeline endpoint gets a key only when one is passed explicitly.
fn resolve_backend_key(
    backend: BackendArg,
    cli_key: Option<String>,
    env_key: Option<String>,
) -> Option<String> {
    match backend {
        BackendArg::Openai => cli_key.or(env_key),
        BackendArg::Pipeline => cli_key,
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let backend_key = resolve_backend_key(
        args.backend,
        args.backend_key.clone(),
        std::env::var("OPENAI_API_KEY").ok(),
    );

    let mut config = ServiceConfig::new(&args.checkpoint)
        .with_backend(args.backend.into())
        .with_base_url(&args.backend_url);
    if let Some(key) = backend_key {
        config = config.with_api_key(key);
    }

    // Loaded once, shared by every request until the process exits
    let service = match InstructService::load(&config) {
        Ok(service) => service,
        Err(e) => {
            tracing::error!("Failed to load {}: {}", args.checkpoint.display(), e);
            std::process::exit(1);
        }
    };

    let pages = match Pages::new() {
        Ok(pages) => pages,
        Err(e) => {
            tracing::error!("Failed to compile templates: {}", e);
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState { service, pages });
    let app = router(state);

    let addr = SocketAddr::from((args.host, args.port));
    tracing::info!("Instruct Server starting on {}", addr);
    tracing::info!("Checkpoint: {}", args.checkpoint.display());
    tracing::info!("Backend: {:?} at {}", args.backend, args.backend_url);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_ignores_openai_env_key() {
        let key = resolve_backend_key(BackendArg::Pipeline, None, Some("sk-env".to_string()));
        assert_eq!(key, None);
    }

    #[test]
    fn test_pipeline_uses_explicit_key() {
        let key = resolve_backend_key(
            BackendArg::Pipeline,
            Some("hf_token".to_string()),
            Some("sk-env".to_string()),
        );
        assert_eq!(key.as_deref(), Some("hf_token"));
    }

    #[test]
    fn test_openai_falls_back_to_env_key() {
        let key = resolve_backend_key(BackendArg::Openai, None, Some("sk-env".to_string()));
        assert_eq!(key.as_deref(), Some("sk-env"));
    }

    #[test]
    fn test_openai_prefers_explicit_key() {
        let key = resolve_backend_key(
            BackendArg::Openai,
            Some("sk-cli".to_string()),
            Some("sk-env".to_string()),
        );
        assert_eq!(key.as_deref(), Some("sk-cli"));
    }

    #[test]
    fn test_args_default_to_pipeline_without_key() {
        let args = Args::parse_from(["instruct_server"]);
        assert!(matches!(args.backend, BackendArg::Pipeline));
        assert_eq!(
            resolve_backend_key(args.backend, args.backend_key, Some("sk-env".to_string())),
            None
        );
    }
}
