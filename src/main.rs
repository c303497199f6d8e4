use anyhow::{Context, Result};
use clap::Parser;
use meeting_minutes::{
    create_router, AppState, Config, MinutesGenerator, MinutesService, OpenAiClient,
    OutputWriter, SessionStore,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "meeting-minutes", about = "Generate meeting minutes from uploaded documents")]
struct Args {
    /// Configuration file (extension optional)
    #[arg(long, default_value = "config/meeting-minutes")]
    config: String,

    /// Override the bind address
    #[arg(long)]
    bind: Option<String>,

    /// Override the port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    let bind = args.bind.unwrap_or(cfg.service.http.bind);
    let port = args.port.unwrap_or(cfg.service.http.port);

    info!("Loaded config: {}", cfg.service.name);
    info!("Uploads under {}", cfg.storage.base_dir.display());
    info!("Minutes written to {}", cfg.storage.output_dir.display());
    info!("Model: {}", cfg.openai.model);

    let api = Arc::new(OpenAiClient::new(cfg.openai.base_url, cfg.openai.api_key));
    let generator = MinutesGenerator::new(api, cfg.openai.model, cfg.polling.policy());
    let writer = OutputWriter::new(cfg.storage.output_dir, cfg.storage.output_collision);

    let state = AppState::new(
        SessionStore::new(cfg.storage.base_dir),
        MinutesService::new(generator, writer),
        cfg.storage.upload_collision,
    );

    // Create the session directory up front
    let session = state.sessions.session().await?;
    info!("Upload session: {}", session.session_id);

    let listener = tokio::net::TcpListener::bind((bind.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", bind, port))?;
    info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
