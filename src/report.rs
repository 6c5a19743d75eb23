//! Output of focus changes and stacking records
//!
//! Records go to stdout as `"<class>", "<instance>", <pid>`. Focus durations
//! go to stderr as `Duration <ms>`.

use std::io::{self, Write};

use tracing::warn;

use crate::metadata::WindowMetadata;

pub trait ReportSink {
    fn record(&mut self, metadata: &WindowMetadata);
    fn duration(&mut self, elapsed: u32);
}

/// Line-oriented sink over a pair of writers
pub struct WriterSink<O: Write, E: Write> {
    out: O,
    err: E,
}

impl WriterSink<io::Stdout, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> WriterSink<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

fn write_line<W: Write>(writer: &mut W, line: std::fmt::Arguments<'_>) {
    let result = writer
        .write_fmt(line)
        .and_then(|()| writer.write_all(b"\n"))
        .and_then(|()| writer.flush());
    if let Err(e) = result {
        warn!("Failed to write report line: {}", e);
    }
}

impl<O: Write, E: Write> ReportSink for WriterSink<O, E> {
    fn record(&mut self, metadata: &WindowMetadata) {
        write_line(&mut self.out, format_args!("{}", metadata));
    }

    fn duration(&mut self, elapsed: u32) {
        write_line(&mut self.err, format_args!("Duration {}", elapsed));
    }
}
