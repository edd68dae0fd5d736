use backend::dashboards::d410_marketing_tests::{host, DataLoader, MarketingDashboard};
use backend::shared::config;
use backend::system;
use std::io;

/// Reads one JSON interaction per stdin line and answers with one JSON
/// frame per stdout line.
fn main() -> anyhow::Result<()> {
    let cfg = config::load_config()?;
    system::tracing::initialize(&cfg.logging)?;
    match config::locate_config() {
        Some(path) => tracing::info!("Loaded config from: {}", path.display()),
        None => tracing::info!("Using default embedded configuration"),
    }

    let loader = DataLoader::new(config::get_data_path(&cfg));
    let table = loader.load().map_err(|e| {
        tracing::error!("Dashboard unavailable: {}", e);
        e
    })?;

    let mut dashboard = MarketingDashboard::new(table);
    host::run_session(&mut dashboard, io::stdin().lock(), io::stdout().lock())
}
