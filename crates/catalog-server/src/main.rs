use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use catalog_server::{api, setup_app_state};
use domain::{FallbackTranslator, Translator};
use infrastructure::{JsonTranslator, ServerConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding default.* and <RUN_MODE>.* config files
    #[arg(long, default_value = "config")]
    config_dir: String,

    /// API Port (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Locale JSON file (overrides config)
    #[arg(long)]
    locale: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let mut config = ServerConfig::load(&args.config_dir)
        .with_context(|| format!("Failed to load configuration from {}", args.config_dir))?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(locale) = args.locale {
        config.locale.path = Some(locale);
    }

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},catalog_server=debug", config.log_level)));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Catalog Server starting...");

    let translator: Arc<dyn Translator> = match &config.locale.path {
        Some(path) => Arc::new(JsonTranslator::load(path)?),
        None => {
            warn!("No locale configured, serving built-in labels");
            Arc::new(FallbackTranslator)
        }
    };

    let state = setup_app_state(translator);
    let app = api::create_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("API Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Catalog Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
