//! Active-Window Tracker
//!
//! Remembers the last active window and when it became active. A
//! notification naming the same window again is a no-op.

use tracing::{debug, trace};
use x11rb::CURRENT_TIME;
use x11rb::protocol::xproto::{PropertyNotifyEvent, Timestamp, Window};

use crate::report::ReportSink;
use crate::session::{self, WindowSystem};

/// A newly activated window and how long the previous one held focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusChange {
    pub window: Window,
    /// Milliseconds of server time since the previous activation
    pub elapsed: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveWindowTracker {
    active_window: Option<Window>,
    activation_time: Timestamp,
}

impl Default for ActiveWindowTracker {
    fn default() -> Self {
        Self::new(None, CURRENT_TIME)
    }
}

impl ActiveWindowTracker {
    pub fn new(active_window: Option<Window>, activation_time: Timestamp) -> Self {
        Self {
            active_window,
            activation_time,
        }
    }

    /// Seed from the first screen that reports an active window
    pub fn from_system<S: WindowSystem + ?Sized>(system: &S) -> Self {
        // First screen wins; later screens only matter once they notify
        let active_window = system
            .roots()
            .iter()
            .find_map(|&root| system.active_window(root));

        let activation_time = match active_window {
            Some(window) => system.user_time(window),
            None => CURRENT_TIME,
        };

        debug!(
            "Initial active window {:?}, activation time {}",
            active_window, activation_time
        );
        Self::new(active_window, activation_time)
    }

    pub fn active_window(&self) -> Option<Window> {
        self.active_window
    }

    pub fn activation_time(&self) -> Timestamp {
        self.activation_time
    }

    /// Record that `new_window` was reported active at `time`
    pub fn observe(&mut self, new_window: Option<Window>, time: Timestamp) -> Option<FocusChange> {
        let window = new_window?;
        if Some(window) == self.active_window {
            trace!("Window {} re-activated, ignoring", window);
            return None;
        }

        let change = FocusChange {
            window,
            elapsed: time.wrapping_sub(self.activation_time),
        };
        self.active_window = Some(window);
        self.activation_time = time;
        Some(change)
    }
}

/// Dispatch a PropertyNotify to the tracker
///
/// Only `_NET_ACTIVE_WINDOW` changes are considered. The active window is
/// re-read from the window that raised the event, so every screen's root is
/// handled the same way.
pub fn handle_property_notify<S, R>(
    system: &S,
    tracker: &mut ActiveWindowTracker,
    event: &PropertyNotifyEvent,
    sink: &mut R,
) -> Option<FocusChange>
where
    S: WindowSystem + ?Sized,
    R: ReportSink + ?Sized,
{
    if !session::is_active_window_atom(system, event.atom) {
        return None;
    }

    let new_window = system.active_window(event.window);
    let change = tracker.observe(new_window, event.time)?;

    debug!(
        "Focus moved to window {} after {}ms",
        change.window, change.elapsed
    );
    sink.record(&system.metadata(change.window));
    sink.duration(change.elapsed);
    Some(change)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::WindowMetadata;
    use crate::report::WriterSink;
    use crate::testing::{FakeSystem, property_notify};

    fn output(sink: WriterSink<Vec<u8>, Vec<u8>>) -> (String, String) {
        let (out, err) = sink.into_inner();
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn test_observe_ignores_none_and_same_window() {
        let mut tracker = ActiveWindowTracker::new(Some(0x10), 100);
        assert_eq!(tracker.observe(None, 200), None);
        assert_eq!(tracker.observe(Some(0x10), 300), None);
        assert_eq!(tracker.active_window(), Some(0x10));
        assert_eq!(tracker.activation_time(), 100);
    }

    #[test]
    fn test_observe_elapsed_handles_clock_wrap() {
        let mut tracker = ActiveWindowTracker::new(Some(1), u32::MAX - 9);
        let change = tracker.observe(Some(2), 20).unwrap();
        assert_eq!(change.elapsed, 30);
    }

    #[test]
    fn test_redundant_activation_prints_nothing() {
        let mut system = FakeSystem::single_screen(0x1);
        system.set_active(0x1, Some(0x50));
        let mut tracker = ActiveWindowTracker::from_system(&system);
        let mut sink = WriterSink::new(Vec::new(), Vec::new());

        for time in [1000, 2000, 3000] {
            let event = property_notify(0x1, system.atoms().net_active_window, time);
            assert_eq!(handle_property_notify(&system, &mut tracker, &event, &mut sink), None);
        }

        assert_eq!(output(sink), (String::new(), String::new()));
    }

    #[test]
    fn test_three_distinct_windows_give_two_durations() {
        let mut system = FakeSystem::single_screen(0x1);
        for (window, class) in [(0xa, "A"), (0xb, "B"), (0xc, "C")] {
            system.set_metadata(
                window,
                WindowMetadata {
                    class_name: Some(class.into()),
                    instance_name: Some(class.to_lowercase()),
                    process_id: window,
                },
            );
        }
        system.set_active(0x1, Some(0xa));
        system.set_user_time(0xa, 500);
        let mut tracker = ActiveWindowTracker::from_system(&system);
        let mut sink = WriterSink::new(Vec::new(), Vec::new());
        let atom = system.atoms().net_active_window;

        system.set_active(0x1, Some(0xb));
        handle_property_notify(&system, &mut tracker, &property_notify(0x1, atom, 1500), &mut sink);
        system.set_active(0x1, Some(0xc));
        handle_property_notify(&system, &mut tracker, &property_notify(0x1, atom, 4000), &mut sink);

        let (out, err) = output(sink);
        assert_eq!(out, "\"B\", \"b\", 11\n\"C\", \"c\", 12\n");
        assert_eq!(err, "Duration 1000\nDuration 2500\n");
        assert_eq!(tracker.active_window(), Some(0xc));
        assert_eq!(tracker.activation_time(), 4000);
    }

    #[test]
    fn test_other_property_changes_are_ignored() {
        let mut system = FakeSystem::single_screen(0x1);
        system.set_active(0x1, Some(0x20));
        let mut tracker = ActiveWindowTracker::default();
        let mut sink = WriterSink::new(Vec::new(), Vec::new());

        let event = property_notify(0x1, system.atoms().net_wm_pid, 10);
        assert_eq!(handle_property_notify(&system, &mut tracker, &event, &mut sink), None);
        assert_eq!(tracker.active_window(), None);
    }

    #[test]
    fn test_absent_active_window_at_startup() {
        let mut system = FakeSystem::single_screen(0x1);
        let mut tracker = ActiveWindowTracker::from_system(&system);
        assert_eq!(tracker.active_window(), None);
        assert_eq!(tracker.activation_time(), CURRENT_TIME);

        system.set_metadata(
            0x123,
            WindowMetadata {
                class_name: Some("Emacs".into()),
                instance_name: Some("emacs".into()),
                process_id: 900,
            },
        );
        system.set_active(0x1, Some(0x123));
        let mut sink = WriterSink::new(Vec::new(), Vec::new());
        let event = property_notify(0x1, system.atoms().net_active_window, 7000);
        let change = handle_property_notify(&system, &mut tracker, &event, &mut sink);

        assert_eq!(
            change,
            Some(FocusChange {
                window: 0x123,
                elapsed: 7000
            })
        );
        assert_eq!(
            output(sink),
            ("\"Emacs\", \"emacs\", 900\n".to_string(), "Duration 7000\n".to_string())
        );
    }

    #[test]
    fn test_two_screens_handled_identically() {
        let mut system = FakeSystem::with_roots(&[0x1, 0x2]);
        system.set_active(0x2, Some(0x77));
        let mut tracker = ActiveWindowTracker::from_system(&system);
        assert_eq!(tracker.active_window(), Some(0x77));

        let atom = system.atoms().net_active_window;
        let mut sink = WriterSink::new(Vec::new(), Vec::new());

        system.set_active(0x1, Some(0x88));
        let first = handle_property_notify(&system, &mut tracker, &property_notify(0x1, atom, 50), &mut sink);
        system.set_active(0x2, Some(0x99));
        let second = handle_property_notify(&system, &mut tracker, &property_notify(0x2, atom, 80), &mut sink);

        assert_eq!(first.map(|c| c.window), Some(0x88));
        assert_eq!(second.map(|c| c.window), Some(0x99));
        assert_eq!(second.map(|c| c.elapsed), Some(30));
    }

    #[test]
    fn test_seed_prefers_first_screen() {
        let mut system = FakeSystem::with_roots(&[0x1, 0x2]);
        system.set_active(0x1, Some(0x11));
        system.set_active(0x2, Some(0x22));
        system.set_user_time(0x11, 400);
        system.set_user_time(0x22, 900);

        let tracker = ActiveWindowTracker::from_system(&system);
        assert_eq!(tracker.active_window(), Some(0x11));
        assert_eq!(tracker.activation_time(), 400);
    }

    #[test]
    fn test_class_present_pid_absent() {
        let mut system = FakeSystem::single_screen(0x1);
        system.set_metadata(
            0x5,
            WindowMetadata {
                class_name: Some("Gimp".into()),
                instance_name: Some("gimp".into()),
                process_id: 0,
            },
        );
        system.set_active(0x1, Some(0x5));
        let mut tracker = ActiveWindowTracker::default();
        let mut sink = WriterSink::new(Vec::new(), Vec::new());
        let event = property_notify(0x1, system.atoms().net_active_window, 10);
        handle_property_notify(&system, &mut tracker, &event, &mut sink);

        let (out, _) = output(sink);
        assert_eq!(out, "\"Gimp\", \"gimp\", 0\n");
    }
}
