use thiserror::Error;

/// Errors that may be encountered while configuring or
/// executing a simulation.
///
/// The [`EmptyCalendar`] and [`WaitingRoomOverflow`] variants are
/// the run's two fatal conditions: each aborts the run immediately,
/// with no retry and no partial report, and carries the simulation
/// clock value at the moment of failure so that the failure can be
/// placed on the event timeline.
///
/// [`EmptyCalendar`] is a likely indicator of a logical bug at the
/// call site: the next arrival is rescheduled on every arrival, so a
/// correctly initialized run can never empty the calendar.
///
/// [`WaitingRoomOverflow`] is a hard limit, not a backpressure
/// signal: the model has no policy for shedding or rejecting
/// arrivals, so exceeding the waiting room's capacity ends the run.
///
/// The remaining variants originate from parameter validation and
/// never occur once a run is underway.
///
/// [`EmptyCalendar`]: Error::EmptyCalendar
/// [`WaitingRoomOverflow`]: Error::WaitingRoomOverflow
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Both calendar slots were unscheduled when the engine asked
    /// for the next event.
    #[error("event calendar is empty at time {clock:.3}")]
    EmptyCalendar {
        /// Simulation clock at the moment of failure.
        clock: f64,
    },
    /// An arrival attempted to join a waiting room that was already
    /// at capacity.
    #[error("waiting room overflow at time {clock:.3} (capacity {capacity})")]
    WaitingRoomOverflow {
        /// Simulation clock at the moment of failure.
        clock: f64,
        /// The fixed capacity that the insert would have exceeded.
        capacity: usize,
    },
    /// A mean duration parameter was zero, negative, or non-finite.
    #[error("mean {name} time must be positive and finite, got {value}")]
    InvalidMean {
        /// Which parameter failed validation.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A parameter line could not be parsed into the three expected
    /// values.
    #[error("malformed parameter line: {0}")]
    MalformedParameters(String),
}

/// [`std::result::Result`] specialized to [`enum@Error`].
///
/// A type alias that simplifies the signatures of various functions
/// in this crate.
pub type Result<T> = std::result::Result<T, Error>;
