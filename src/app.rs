use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::runtime::Builder;

use crate::{
    cli::{Cli, Command},
    http::{self, AppState},
    infra::{
        config::{self, BridgeConfig, FileConfigStore},
        logging,
        storage_layout::StorageLayout,
    },
    telegram::{self, TelegramBridge},
};

pub fn run(cli: Cli) -> Result<()> {
    let config = config::load(cli.config.as_deref())?;
    logging::init(&config.logging)?;

    let layout = StorageLayout::resolve()?;
    layout.ensure_dirs()?;
    let session_path = layout.session_file();

    let rt = Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to initialize async runtime")?;

    match cli.command_or_default() {
        Command::Serve => rt.block_on(serve(cli.config.as_deref(), &config, &session_path)),
        Command::Login => rt.block_on(telegram::login(&config.telegram, &session_path)),
    }
}

async fn serve(
    config_path: Option<&Path>,
    config: &BridgeConfig,
    session_path: &Path,
) -> Result<()> {
    let bridge = TelegramBridge::connect(&config.telegram, session_path)
        .await
        .context("failed to connect to Telegram")?;

    if !bridge.is_authorized().await? {
        anyhow::bail!("Telegram session is not authorized; run `tgbridge login` first");
    }

    let state = AppState {
        transport: Arc::new(bridge),
        store: Arc::new(FileConfigStore::new(config_path)),
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, "bridge listening");

    axum::serve(listener, http::router(state))
        .await
        .context("server terminated")?;

    Ok(())
}
