//! Windowing-system connector
//!
//! Owns the X11 connection, the root window of every screen and the interned
//! atoms. The `WindowSystem` trait is the surface the tracker and the
//! stacking dumper use, so both can run against an in-memory fake.

use std::sync::Arc;

use tracing::{debug, info, warn};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    Atom, ChangeWindowAttributesAux, ConnectionExt, EventMask, Timestamp, Window,
};
use x11rb::rust_connection::RustConnection;
use x11rb::{CURRENT_TIME, NONE};

use crate::atoms::Atoms;
use crate::error::{XstatError, XstatResult};
use crate::metadata::{self, WindowMetadata};
use crate::property::{self, UserTime, WindowList, WindowRef};

/// Queries xstat needs from the windowing system
pub trait WindowSystem {
    fn atoms(&self) -> &Atoms;

    /// Root windows of every screen, in screen order
    fn roots(&self) -> &[Window];

    /// `_NET_ACTIVE_WINDOW` of `root`, `None` if unset or zero
    fn active_window(&self, root: Window) -> Option<Window>;

    /// `_NET_WM_USER_TIME` of `window`, `CURRENT_TIME` if unknown
    fn user_time(&self, window: Window) -> Timestamp;

    fn metadata(&self, window: Window) -> WindowMetadata;

    /// `_NET_CLIENT_LIST_STACKING` of `root` in server order
    fn stacking(&self, root: Window) -> Vec<Window>;
}

/// Live connection to an X server
pub struct X11Session {
    conn: Arc<RustConnection>,
    roots: Vec<Window>,
    atoms: Atoms,
}

impl X11Session {
    /// Connect to `display`, or to `$DISPLAY` when `None`
    pub fn connect(display: Option<&str>) -> XstatResult<Self> {
        let (conn, screen_num) = x11rb::connect(display).map_err(|source| XstatError::Connect {
            display: display
                .map(str::to_owned)
                .or_else(|| std::env::var("DISPLAY").ok())
                .unwrap_or_default(),
            source,
        })?;

        let roots: Vec<Window> = conn.setup().roots.iter().map(|screen| screen.root).collect();
        info!(
            "Connected to X server, default screen {}, {} screen(s)",
            screen_num,
            roots.len()
        );

        let atoms = Atoms::new(&conn)?;
        debug!("Atoms: {:?}", atoms);

        Ok(Self {
            conn: Arc::new(conn),
            roots,
            atoms,
        })
    }

    pub fn connection(&self) -> &Arc<RustConnection> {
        &self.conn
    }

    /// Select PropertyChange events on every root window
    ///
    /// A screen that refuses the subscription is logged and skipped.
    pub fn subscribe_property_changes(&self) -> XstatResult<()> {
        let attrs = ChangeWindowAttributesAux::new().event_mask(EventMask::PROPERTY_CHANGE);
        for (index, &root) in self.roots.iter().enumerate() {
            let result = self
                .conn
                .change_window_attributes(root, &attrs)?
                .check();
            match result {
                Ok(()) => debug!("Watching property changes on root {} (screen {})", root, index),
                Err(e) => warn!("Failed to attach handler to window #{}: {}", index, e),
            }
        }
        self.conn.flush()?;
        Ok(())
    }
}

impl WindowSystem for X11Session {
    fn atoms(&self) -> &Atoms {
        &self.atoms
    }

    fn roots(&self) -> &[Window] {
        &self.roots
    }

    fn active_window(&self, root: Window) -> Option<Window> {
        active_window_from(property::read_typed(
            self.conn.as_ref(),
            root,
            self.atoms.net_active_window,
        ))
    }

    fn user_time(&self, window: Window) -> Timestamp {
        user_time_from(property::read_typed(
            self.conn.as_ref(),
            window,
            self.atoms.net_wm_user_time,
        ))
    }

    fn metadata(&self, window: Window) -> WindowMetadata {
        metadata::resolve_metadata(self.conn.as_ref(), &self.atoms, window)
    }

    fn stacking(&self, root: Window) -> Vec<Window> {
        property::read_typed::<_, WindowList>(
            self.conn.as_ref(),
            root,
            self.atoms.net_client_list_stacking,
        )
        .map(|WindowList(windows)| windows)
        .unwrap_or_default()
    }
}

/// `None` for an unset or zero `_NET_ACTIVE_WINDOW`
pub fn active_window_from(value: Option<WindowRef>) -> Option<Window> {
    value
        .map(|WindowRef(window)| window)
        .filter(|&window| window != NONE)
}

/// `CURRENT_TIME` for an unset `_NET_WM_USER_TIME`
pub fn user_time_from(value: Option<UserTime>) -> Timestamp {
    value.map(|UserTime(time)| time).unwrap_or(CURRENT_TIME)
}

/// True if `atom` is the watched `_NET_ACTIVE_WINDOW`
pub fn is_active_window_atom<S: WindowSystem + ?Sized>(system: &S, atom: Atom) -> bool {
    atom == system.atoms().net_active_window
}
