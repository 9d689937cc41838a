use anyhow::{anyhow, Result};
use clap::Parser;
use gsf_forge::cache::{CacheScope, InMemoryNoteCache};
use gsf_forge::config::AppConfig;
use gsf_forge::http_server;
use gsf_forge::startup::{build_client, StartupError};
use gsf_forge::NoteForger;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "gsf-daemon",
    about = "Serves the study-notes forge: paste raw text, get aesthetic Markdown notes",
    version
)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// TOML secrets file holding GEMINI_API_KEY (checked before the environment)
    #[arg(long, env = "GSF_SECRETS_PATH")]
    secrets: Option<PathBuf>,

    /// HTTP server address
    #[arg(long, env = "GSF_HTTP_ADDR")]
    http_addr: Option<SocketAddr>,

    /// Which requests share memoized notes: "process" or "session"
    #[arg(long, env = "GSF_CACHE_SCOPE")]
    cache_scope: Option<CacheScope>,

    /// Override the Gemini REST base URL
    #[arg(long, env = "GSF_API_BASE")]
    api_base: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "GSF_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; the key may come from the secrets file or the shell.
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    // Initialize tracing (logging)
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)))
        .init();

    info!("Starting study notes forge");

    // Load config from file or use defaults
    let mut config = match &args.config {
        Some(path) => {
            let cfg = AppConfig::load_from_file(path)?;
            info!("Loaded configuration from {}", path.display());
            cfg
        }
        None => {
            let (cfg, path) = AppConfig::load_from_default()?;
            if let Some(path) = path {
                info!("Loaded configuration from {}", path.display());
            }
            cfg
        }
    };

    // Update config from CLI args
    if let Some(secrets) = args.secrets {
        config.secrets_path = secrets;
    }
    if let Some(http_addr) = args.http_addr {
        config.http_addr = http_addr;
    }
    if let Some(cache_scope) = args.cache_scope {
        config.cache_scope = cache_scope;
    }
    if let Some(api_base) = args.api_base {
        config.gemini.api_base = api_base;
    }

    let gemini_client = match build_client(&config) {
        Ok(client) => client,
        Err(e) => {
            match &e {
                StartupError::Credentials(_) => {
                    error!(error = %e, secrets = %config.secrets_path.display(), "No usable Gemini API key")
                }
                StartupError::ClientInit(_) => error!(error = %e, "Failed to initialize Gemini client"),
            }
            return Err(anyhow!("{}", e));
        }
    };

    let forger = NoteForger::new(
        Arc::new(gemini_client),
        Arc::new(InMemoryNoteCache::new()),
        config.cache_scope,
    );

    http_server::run_server(forger, config.http_addr).await
}
