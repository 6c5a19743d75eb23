//! xstat-stacking
//!
//! Prints the class, instance and pid of every client in
//! `_NET_CLIENT_LIST_STACKING`, once per screen, then exits.

use anyhow::{Context, Result};
use tracing::{debug, info};
use xstat::config::Config;
use xstat::report::WriterSink;
use xstat::{X11Session, logging, stacking};

fn main() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    logging::init(config.log_filter.as_deref());

    if let Some(arg) = std::env::args().nth(1) {
        debug!("Ignoring argument {:?}", arg);
    }

    let session = X11Session::connect(config.display.as_deref())
        .context("Couldn't connect to X server")?;

    let mut sink = WriterSink::stdio();
    let printed = stacking::dump_all(&session, &mut sink);
    info!("Printed {} stacked window(s)", printed);

    Ok(())
}
