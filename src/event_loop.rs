//! Event Loop
//!
//! Drains pending X11 events, hands PropertyNotify to the tracker and sleeps
//! on the socket until more arrive or shutdown is requested.

use std::future::Future;

use tracing::{info, trace, warn};
use x11rb::errors::ConnectionError;
use x11rb::protocol::Event;

use crate::error::{XstatError, XstatResult};
use crate::report::ReportSink;
use crate::session::{WindowSystem, X11Session};
use crate::tracker::{self, ActiveWindowTracker};
use crate::x11_async::X11EventStream;

/// Route one event; everything except PropertyNotify is ignored
pub fn dispatch_event<S, R>(
    system: &S,
    tracker: &mut ActiveWindowTracker,
    event: &Event,
    sink: &mut R,
) where
    S: WindowSystem + ?Sized,
    R: ReportSink + ?Sized,
{
    match event {
        Event::PropertyNotify(notify) => {
            tracker::handle_property_notify(system, tracker, notify, sink);
        }
        Event::Error(err) => {
            warn!("Couldn't fetch event, error code {}: {:?}", err.error_code, err);
        }
        other => trace!("Ignoring event {:?}", other),
    }
}

fn is_fatal(err: &ConnectionError) -> bool {
    matches!(
        err,
        ConnectionError::IoError(_) | ConnectionError::InsufficientMemory
    )
}

/// Dispatch every queued event until `next` reports an empty queue
///
/// Non-fatal retrieval errors are logged and draining continues.
pub fn drain_events<N, S, R>(
    mut next: N,
    system: &S,
    tracker: &mut ActiveWindowTracker,
    sink: &mut R,
) -> Result<(), ConnectionError>
where
    N: FnMut() -> Result<Option<Event>, ConnectionError>,
    S: WindowSystem + ?Sized,
    R: ReportSink + ?Sized,
{
    loop {
        match next() {
            Ok(Some(event)) => dispatch_event(system, tracker, &event, sink),
            Ok(None) => return Ok(()),
            Err(e) if is_fatal(&e) => return Err(e),
            Err(e) => warn!("Couldn't fetch event: {}", e),
        }
    }
}

/// Run until `shutdown` resolves or the connection breaks
pub async fn run<R, F>(
    session: &X11Session,
    tracker: &mut ActiveWindowTracker,
    sink: &mut R,
    shutdown: F,
) -> XstatResult<()>
where
    R: ReportSink + ?Sized,
    F: Future<Output = ()>,
{
    let stream =
        X11EventStream::new(session.connection().clone()).map_err(XstatError::EventStream)?;
    tokio::pin!(shutdown);

    info!("Watching _NET_ACTIVE_WINDOW on {} screen(s)", session.roots().len());

    loop {
        stream.flush()?;

        drain_events(|| stream.poll_next_event(), session, tracker, sink)?;

        tokio::select! {
            () = stream.wait_readable() => {}
            () = &mut shutdown => {
                info!("Shutdown requested, leaving event loop");
                return Ok(());
            }
        }
    }
}
