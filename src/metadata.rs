//! Window Metadata Resolver
//!
//! Class name, instance name and owning process of a window. Missing pieces
//! degrade to empty values, never to errors.

use std::fmt;

use tracing::warn;
use x11rb::connection::Connection;
use x11rb::properties::WmClass;
use x11rb::protocol::xproto::Window;

use crate::atoms::Atoms;
use crate::property::{self, ProcessId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowMetadata {
    pub class_name: Option<String>,
    pub instance_name: Option<String>,
    /// `0` when the window does not advertise `_NET_WM_PID`
    pub process_id: u32,
}

/// Formats as `"<class>", "<instance>", <pid>`
impl fmt::Display for WindowMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\", \"{}\", {}",
            self.class_name.as_deref().unwrap_or_default(),
            self.instance_name.as_deref().unwrap_or_default(),
            self.process_id
        )
    }
}

fn non_empty(bytes: &[u8]) -> Option<String> {
    if bytes.is_empty() {
        None
    } else {
        Some(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// `(class, instance)` with empty strings treated as unset
pub fn class_hint_from(class: &[u8], instance: &[u8]) -> (Option<String>, Option<String>) {
    (non_empty(class), non_empty(instance))
}

/// Returns `(class, instance)` from `WM_CLASS`
pub fn read_class_hint<C: Connection>(conn: &C, window: Window) -> (Option<String>, Option<String>) {
    let reply = WmClass::get(conn, window).map(|cookie| cookie.reply());
    match reply {
        Ok(Ok(Some(class))) => class_hint_from(class.class(), class.instance()),
        Ok(Ok(None)) => (None, None),
        Ok(Err(e)) => {
            warn!("couldn't get property WM_CLASS of window {}: {}", window, e);
            (None, None)
        }
        Err(e) => {
            warn!("couldn't get property WM_CLASS of window {}: {}", window, e);
            (None, None)
        }
    }
}

pub fn resolve_metadata<C: Connection>(conn: &C, atoms: &Atoms, window: Window) -> WindowMetadata {
    let class_hint = read_class_hint(conn, window);
    let pid = property::read_typed::<_, ProcessId>(conn, window, atoms.net_wm_pid);
    metadata_from(class_hint, pid)
}

/// Combine already-read parts; a missing pid becomes `0`
pub fn metadata_from(
    (class_name, instance_name): (Option<String>, Option<String>),
    pid: Option<ProcessId>,
) -> WindowMetadata {
    WindowMetadata {
        class_name,
        instance_name,
        process_id: pid.map(|ProcessId(pid)| pid).unwrap_or(0),
    }
}
