//! X11 Async Event Stream
//!
//! Waits for the X11 socket to become readable without spinning. A mio poller
//! on a blocking thread wakes the async loop, which then drains queued events.

use std::os::unix::io::AsRawFd;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Notify, oneshot};
use tracing::{debug, warn};
use x11rb::connection::Connection;
use x11rb::errors::ConnectionError;
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;

/// Poll timeout of the socket thread; bounds how long it outlives the stream
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Readiness notifications for the X11 socket
///
/// The poller thread holds a `oneshot::Sender` whose receiver lives in the
/// stream. Dropping the stream closes the channel and the thread exits on its
/// next poll timeout.
pub struct X11EventStream {
    conn: Arc<RustConnection>,
    notify: Arc<Notify>,
    _task_guard: oneshot::Receiver<()>,
}

impl X11EventStream {
    /// Register the connection's socket and start the poller thread
    ///
    /// The socket is registered with mio for READABLE interest and polled on a
    /// `spawn_blocking` thread, which calls `notify_one` on every readiness
    /// event. Must be called from within a tokio runtime.
    ///
    /// Fails if the mio `Poll` cannot be created or the fd cannot be
    /// registered.
    pub fn new(conn: Arc<RustConnection>) -> std::io::Result<Self> {
        let fd = conn.stream().as_raw_fd();
        let notify = Arc::new(Notify::new());
        let task_notify = notify.clone();

        let (guard, task_guard) = oneshot::channel::<()>();
        let mut poll = mio::Poll::new()?;
        let mut events = mio::Events::with_capacity(1);

        poll.registry().register(
            &mut mio::unix::SourceFd(&fd),
            mio::Token(0),
            mio::Interest::READABLE,
        )?;

        tokio::task::spawn_blocking(move || {
            loop {
                if guard.is_closed() {
                    debug!("X11 socket polling thread shutting down");
                    return;
                }

                if let Err(err) = poll.poll(&mut events, Some(POLL_TIMEOUT)) {
                    warn!("X11 socket poll failed: {:?}", err);
                    continue;
                }

                events
                    .iter()
                    .filter(|event| event.token() == mio::Token(0))
                    .for_each(|_| task_notify.notify_one());
            }
        });

        Ok(Self {
            conn,
            notify,
            _task_guard: task_guard,
        })
    }

    /// Next already-received event, without blocking
    ///
    /// Returns `Ok(None)` once x11rb's internal queue is empty. Callers drain
    /// until then before waiting again, since replies read while answering a
    /// request can pull events off the socket without waking the poller.
    pub fn poll_next_event(&self) -> Result<Option<Event>, ConnectionError> {
        self.conn.poll_for_event()
    }

    /// Resolves once the socket has data to read
    ///
    /// A readiness signal that fired while nobody was waiting is kept as a
    /// `Notify` permit, so it is not lost between drain and wait.
    pub async fn wait_readable(&self) {
        self.notify.notified().await;
    }

    /// Flush pending X11 requests
    ///
    /// Called at the top of each loop iteration so property reads issued by
    /// the tracker reach the server before the next wait.
    pub fn flush(&self) -> Result<(), ConnectionError> {
        self.conn.flush()
    }
}
