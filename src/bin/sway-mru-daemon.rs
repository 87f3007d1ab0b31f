use anyhow::{Context, Result};
use clap::Parser;
use sway_mru::config::{log_level, DaemonArgs};
use sway_mru::daemon::Daemon;
use sway_mru::pause::PauseSignal;
use sway_mru::state_store::StateStore;
use tracing::info;

fn main() -> Result<()> {
    let args = DaemonArgs::parse();

    tracing_subscriber::fmt()
        .with_max_level(log_level(args.verbose, tracing::Level::INFO))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting sway-mru daemon");

    // Events are handled strictly in order, so one thread is enough
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;

    let daemon = Daemon::new(StateStore::default_location(), PauseSignal::default_location());
    rt.block_on(daemon.run())?;

    info!("Daemon exited normally");
    Ok(())
}
