//! EWMH atoms consulted by xstat
//!
//! Interned once per connection and never re-resolved.

use x11rb::connection::Connection;
use x11rb::protocol::xproto::{Atom, ConnectionExt};

use crate::error::{XstatError, XstatResult};

/// Holds all interned EWMH atoms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Atoms {
    pub net_active_window: Atom,
    pub net_wm_user_time: Atom,
    pub net_wm_pid: Atom,
    pub net_client_list_stacking: Atom,
}

impl Atoms {
    /// Intern all required atoms
    pub fn new<C: Connection>(conn: &C) -> XstatResult<Self> {
        let intern = |name: &'static str| -> XstatResult<Atom> {
            let reply = conn
                .intern_atom(false, name.as_bytes())
                .map_err(XstatError::ConnectionLost)?
                .reply()
                .map_err(|source| XstatError::Intern { name, source })?;
            Ok(reply.atom)
        };

        Ok(Self {
            net_active_window: intern("_NET_ACTIVE_WINDOW")?,
            net_wm_user_time: intern("_NET_WM_USER_TIME")?,
            net_wm_pid: intern("_NET_WM_PID")?,
            net_client_list_stacking: intern("_NET_CLIENT_LIST_STACKING")?,
        })
    }
}
