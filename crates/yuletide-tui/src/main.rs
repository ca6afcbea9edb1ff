// Yuletide entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Build the HTTP backend
// 4. Mount the page (spawns every effect)
// 5. Run the TUI until the user quits
// 6. Unmount the page, cancelling every effect

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{error, info};

use yuletide_core::api::HttpBackend;
use yuletide_core::config;
use yuletide_core::page::Page;
use yuletide_tui::tui;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("Yuletide starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!("Config loaded: backend={}", config.backend.base_url);

    // 3. Build the HTTP backend
    let backend = Arc::new(HttpBackend::from_config(&config));

    // 4. Mount the page
    let mut page = Page::mount(backend, config.effect_settings());

    // 5. Run the TUI (blocks until the user quits)
    let result = tui::run(&mut page, config.frame_interval()).await;
    if let Err(e) = &result {
        error!("TUI error: {}", e);
    }

    // 6. Unmount
    page.unmount(Duration::from_secs(2)).await;

    info!("Yuletide shut down cleanly");
    result
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("yuletide.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("yuletide_core=info,yuletide_tui=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
