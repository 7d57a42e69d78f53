//! # Overview
//!
//! mm1sim is a discrete-event simulation of the classic single-server
//! queueing system: one stream of arriving customers, one server, and a
//! bounded first-in-first-out waiting room. A run advances by the
//! next-event method until a target number of customers have completed
//! their wait, then reports the time-averaged performance measures of the
//! system: mean delay in queue, mean queue length, and server utilization.
//! The pieces are small and composable:
//!
//! * [`Parameters`] carries the three validated model inputs: mean
//!   interarrival time, mean service time, and the number of delays to
//!   record before stopping.
//! * The [`UniformSource`] trait decouples variate generation from any
//!   particular random-number generator. [`Pcg64`] is the intended
//!   production source, while [`ScriptedSource`] replays a fixed sequence
//!   of draws so tests can steer a run onto an exact event path.
//! * [`Simulation`] owns everything belonging to one replication: the
//!   clock, the [`EventCalendar`], the server and waiting-room state, and
//!   the running [`StatsAccumulator`]. Replications never share state, so
//!   independently seeded instances are fully isolated from each other.
//! * The [`TraceSink`] trait observes a run from outside: a [`Snapshot`]
//!   after every event, the final [`Report`] on completion, and the
//!   [`Error`] if the run aborts. Sinks for discarding, buffering, and
//!   rendering records are provided.
//!
//! Reproducibility is a first-class concern: given the same parameters
//! and an identically seeded source, two runs produce bit-identical event
//! sequences and reports.
//!
//! [`Pcg64`]: rand_pcg::Pcg64

mod calendar;
mod error;
mod params;
mod queueing;
mod report;
mod simulation;
mod stats;
mod trace;
mod variates;

pub use calendar::{EventCalendar, EventKind};
pub use error::{Error, Result};
pub use params::Parameters;
pub use queueing::{ServerStatus, WaitingRoom, WAITING_ROOM_CAPACITY};
pub use report::Report;
pub use simulation::{Phase, Simulation};
pub use stats::StatsAccumulator;
pub use trace::{MemorySink, NullSink, Snapshot, TraceSink, WriterSink};
pub use variates::{exponential, ScriptedSource, UniformSource};
