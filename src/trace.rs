//! Observation of a running simulation.
//!
//! The engine reports its progress through the [`TraceSink`] trait: one
//! [`Snapshot`] after every processed event, the final [`Report`] when the
//! run completes, and the [`Error`] if the run aborts. Implementations
//! decide what to do with each record. [`NullSink`] discards everything,
//! [`MemorySink`] retains it for inspection, and [`WriterSink`] renders
//! the classic line-per-event trace to any [`Write`] destination.

use crate::calendar::EventKind;
use crate::error::Error;
use crate::queueing::ServerStatus;
use crate::report::Report;
use std::io::{self, Write};

/// Full state of the simulation immediately after one event was processed.
///
/// The engine emits one snapshot per handled event, plus one for the
/// initial state before any event fires. In the initial snapshot `event`
/// is `None`; in every later snapshot it names the event whose handler
/// just ran.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Event whose handling produced this state, or `None` for the
    /// initial state.
    pub event: Option<EventKind>,
    /// Simulation clock at the time of the snapshot.
    pub clock: f64,
    /// Whether the server is idle or busy.
    pub server: ServerStatus,
    /// Number of customers in the waiting room, excluding any in service.
    pub queue_length: usize,
    /// Time of the next scheduled arrival, if one is pending.
    pub next_arrival: Option<f64>,
    /// Time of the next scheduled departure, if a customer is in service.
    pub next_departure: Option<f64>,
    /// Customers whose delay has been recorded so far.
    pub customers_delayed: u64,
    /// Sum of all recorded delays.
    pub total_delay: f64,
    /// Time integral of the queue length.
    pub area_queue_length: f64,
    /// Time integral of the server-busy indicator.
    pub area_server_busy: f64,
}

/// Receiver for the engine's progress reports.
///
/// All methods default to doing nothing, so implementations override only
/// the records they care about.
pub trait TraceSink {
    /// Called once after each processed event, and once for the initial
    /// state before the first event.
    fn on_snapshot(&mut self, _snapshot: &Snapshot) {}

    /// Called once when the run reaches its target and produces a report.
    fn on_report(&mut self, _report: &Report) {}

    /// Called once if the run aborts with a fatal error.
    fn on_fatal(&mut self, _error: &Error) {}
}

/// Sink that ignores every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TraceSink for NullSink {}

/// Sink that retains every record in memory.
///
/// Intended for tests and programmatic inspection of a finished run.
#[derive(Debug, Default)]
pub struct MemorySink {
    snapshots: Vec<Snapshot>,
    reports: Vec<Report>,
    fatals: Vec<Error>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All snapshots received so far, in arrival order.
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// All reports received so far.
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// All fatal errors received so far.
    pub fn fatals(&self) -> &[Error] {
        &self.fatals
    }
}

impl TraceSink for MemorySink {
    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        self.snapshots.push(snapshot.clone());
    }

    fn on_report(&mut self, report: &Report) {
        self.reports.push(report.clone());
    }

    fn on_fatal(&mut self, error: &Error) {
        self.fatals.push(error.clone());
    }
}

/// Sink that renders records as text to any [`Write`] destination.
///
/// Snapshots become one `key=value` line each, the report renders as its
/// [`Display`](std::fmt::Display) block, and a fatal error becomes a
/// single `fatal:` line. Write failures do not interrupt the simulation:
/// the sink stores the first [`io::Error`] it encounters, suppresses all
/// further output, and surfaces the error through [`io_error`] when the
/// run is over.
///
/// [`io_error`]: WriterSink::io_error
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
    log_snapshots: bool,
    error: Option<io::Error>,
}

impl<W: Write> WriterSink<W> {
    /// Creates a sink that writes both per-event lines and the final
    /// report to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            log_snapshots: true,
            error: None,
        }
    }

    /// Creates a sink that suppresses per-event lines and writes only the
    /// final report or fatal error.
    pub fn report_only(writer: W) -> Self {
        Self {
            writer,
            log_snapshots: false,
            error: None,
        }
    }

    /// First write failure observed, if any.
    pub fn io_error(&self) -> Option<&io::Error> {
        self.error.as_ref()
    }

    /// Consumes the sink, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Consumes the sink, returning the writer if every record was
    /// written successfully.
    ///
    /// # Errors
    ///
    /// Returns the first write failure the sink swallowed while the
    /// simulation was running.
    pub fn finish(self) -> io::Result<W> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.writer),
        }
    }

    fn emit(&mut self, write: impl FnOnce(&mut W) -> io::Result<()>) {
        if self.error.is_none() {
            if let Err(error) = write(&mut self.writer) {
                self.error = Some(error);
            }
        }
    }
}

impl<W: Write> TraceSink for WriterSink<W> {
    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        if !self.log_snapshots {
            return;
        }
        let event = match snapshot.event {
            Some(kind) => kind.to_string(),
            None => String::from("init"),
        };
        let next_arrival = slot(snapshot.next_arrival);
        let next_departure = slot(snapshot.next_departure);
        self.emit(|writer| {
            writeln!(
                writer,
                "t={:.3} event={} server={} in_queue={} next_arrival={} \
                 next_departure={} delayed={} total_delay={:.3} area_q={:.3} area_b={:.3}",
                snapshot.clock,
                event,
                snapshot.server,
                snapshot.queue_length,
                next_arrival,
                next_departure,
                snapshot.customers_delayed,
                snapshot.total_delay,
                snapshot.area_queue_length,
                snapshot.area_server_busy,
            )
        });
    }

    fn on_report(&mut self, report: &Report) {
        self.emit(|writer| writeln!(writer, "\n{report}"));
    }

    fn on_fatal(&mut self, error: &Error) {
        self.emit(|writer| writeln!(writer, "\nfatal: {error}"));
    }
}

fn slot(time: Option<f64>) -> String {
    match time {
        Some(time) => format!("{time:.3}"),
        None => String::from("-"),
    }
}
