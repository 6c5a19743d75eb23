//! XStat
//!
//! Watches the X11 active window and reports which application held focus
//! and for how long. Shared by the `xstat` watcher and the one-shot
//! `xstat-stacking` dumper.

pub mod atoms;
pub mod config;
pub mod error;
pub mod event_loop;
pub mod logging;
pub mod metadata;
pub mod property;
pub mod report;
pub mod session;
pub mod stacking;
pub mod tracker;
pub mod x11_async;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{XstatError, XstatResult};
pub use metadata::WindowMetadata;
pub use session::{WindowSystem, X11Session};
pub use tracker::ActiveWindowTracker;
