use clipboard_x_host::clipboard::{self, ClipboardBackend, MemoryClipboard};
use clipboard_x_host::config::{BackendKind, HostConfig};
use clipboard_x_host::{server, HostState};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // If there is no config file yet, write the defaults
    match HostConfig::save_defaults_if_missing() {
        Ok(true) => info!("First run detected, saved default configuration"),
        Ok(false) => {}
        Err(e) => error!("Failed to save default config: {}", e),
    }

    let config = HostConfig::load()?;

    let backend: Arc<dyn ClipboardBackend> = match config.backend {
        BackendKind::Platform => clipboard::platform()?,
        BackendKind::Memory => Arc::new(MemoryClipboard::new()),
    };
    info!("Using {:?} clipboard backend", config.backend);
    info!("Saving clipboard images to {}", config.image_dir().display());

    let state = HostState::new(backend, config.image_dir(), config.poll_interval());
    let (addr, serve) = server::bind(state.clone(), config.listen)?;

    info!("Starting clipboard host on ws://{}/ws", addr);
    tokio::select! {
        _ = serve => {}
        _ = tokio::signal::ctrl_c() => info!("Shutting down"),
    }
    state.stop_watching().await;

    Ok(())
}
