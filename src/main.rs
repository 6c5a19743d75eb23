//! xstat
//!
//! Prints the class, instance and pid of every newly active window on
//! stdout, and how long the previous window held focus on stderr.

use anyhow::{Context, Result};
use tracing::{debug, info};
use xstat::config::Config;
use xstat::report::WriterSink;
use xstat::{ActiveWindowTracker, X11Session, event_loop, logging};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    logging::init(config.log_filter.as_deref());

    // An optional first argument is accepted and ignored
    if let Some(arg) = std::env::args().nth(1) {
        debug!("Ignoring argument {:?}", arg);
    }

    info!("Starting xstat");

    let session = X11Session::connect(config.display.as_deref())
        .context("Couldn't connect to X server")?;
    session
        .subscribe_property_changes()
        .context("Failed to watch root windows")?;

    let mut tracker = ActiveWindowTracker::from_system(&session);
    let mut sink = WriterSink::stdio();

    // Handle SIGTERM and SIGINT
    use tokio::signal::unix::{SignalKind, signal};
    let mut sigterm = signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;
    let mut sigint = signal(SignalKind::interrupt()).context("Failed to install SIGINT handler")?;
    let shutdown = async move {
        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down gracefully"),
            _ = sigint.recv() => info!("Received SIGINT, shutting down gracefully"),
        }
    };

    event_loop::run(&session, &mut tracker, &mut sink, shutdown)
        .await
        .context("Event loop failed")?;

    drop(session);
    info!("Disconnected from X server");
    Ok(())
}
