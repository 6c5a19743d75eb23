//! Stacking-List Dumper
//!
//! Prints one record per window of `_NET_CLIENT_LIST_STACKING`, in the order
//! the server returns them.

use tracing::debug;
use x11rb::protocol::xproto::Window;

use crate::report::ReportSink;
use crate::session::WindowSystem;

/// Dump the stacking list of `root`, returning the number of records written
pub fn dump_stacking<S, R>(system: &S, root: Window, sink: &mut R) -> usize
where
    S: WindowSystem + ?Sized,
    R: ReportSink + ?Sized,
{
    let windows = system.stacking(root);
    debug!("Root {} stacks {} client(s)", root, windows.len());

    for &window in &windows {
        sink.record(&system.metadata(window));
    }
    windows.len()
}

/// Dump the stacking list of every screen
pub fn dump_all<S, R>(system: &S, sink: &mut R) -> usize
where
    S: WindowSystem + ?Sized,
    R: ReportSink + ?Sized,
{
    system
        .roots()
        .iter()
        .map(|&root| dump_stacking(system, root, sink))
        .sum()
}
