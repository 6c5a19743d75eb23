//! In-memory `WindowSystem` for unit tests

use std::collections::HashMap;

use x11rb::CURRENT_TIME;
use x11rb::protocol::xproto::{
    Atom, PROPERTY_NOTIFY_EVENT, Property, PropertyNotifyEvent, Timestamp, Window,
};

use crate::atoms::Atoms;
use crate::metadata::WindowMetadata;
use crate::session::WindowSystem;

pub struct FakeSystem {
    atoms: Atoms,
    roots: Vec<Window>,
    active: HashMap<Window, Window>,
    user_times: HashMap<Window, Timestamp>,
    metadata: HashMap<Window, WindowMetadata>,
    stacking: HashMap<Window, Vec<Window>>,
}

impl FakeSystem {
    pub fn with_roots(roots: &[Window]) -> Self {
        Self {
            atoms: Atoms {
                net_active_window: 301,
                net_wm_user_time: 302,
                net_wm_pid: 303,
                net_client_list_stacking: 304,
            },
            roots: roots.to_vec(),
            active: HashMap::new(),
            user_times: HashMap::new(),
            metadata: HashMap::new(),
            stacking: HashMap::new(),
        }
    }

    pub fn single_screen(root: Window) -> Self {
        Self::with_roots(&[root])
    }

    pub fn set_active(&mut self, root: Window, window: Option<Window>) {
        match window {
            Some(window) => self.active.insert(root, window),
            None => self.active.remove(&root),
        };
    }

    pub fn set_user_time(&mut self, window: Window, time: Timestamp) {
        self.user_times.insert(window, time);
    }

    pub fn set_metadata(&mut self, window: Window, metadata: WindowMetadata) {
        self.metadata.insert(window, metadata);
    }

    pub fn set_stacking(&mut self, root: Window, windows: Vec<Window>) {
        self.stacking.insert(root, windows);
    }
}

impl WindowSystem for FakeSystem {
    fn atoms(&self) -> &Atoms {
        &self.atoms
    }

    fn roots(&self) -> &[Window] {
        &self.roots
    }

    fn active_window(&self, root: Window) -> Option<Window> {
        self.active.get(&root).copied().filter(|&window| window != 0)
    }

    fn user_time(&self, window: Window) -> Timestamp {
        self.user_times.get(&window).copied().unwrap_or(CURRENT_TIME)
    }

    fn metadata(&self, window: Window) -> WindowMetadata {
        self.metadata.get(&window).cloned().unwrap_or_default()
    }

    fn stacking(&self, root: Window) -> Vec<Window> {
        self.stacking.get(&root).cloned().unwrap_or_default()
    }
}

pub fn property_notify(window: Window, atom: Atom, time: Timestamp) -> PropertyNotifyEvent {
    PropertyNotifyEvent {
        response_type: PROPERTY_NOTIFY_EVENT,
        sequence: 0,
        window,
        atom,
        time,
        state: Property::NEW_VALUE,
    }
}
