use crate::calendar::{EventCalendar, EventKind};
use crate::error::{Error, Result};
use crate::params::Parameters;
use crate::queueing::{ServerStatus, WaitingRoom, WAITING_ROOM_CAPACITY};
use crate::report::Report;
use crate::stats::StatsAccumulator;
use crate::trace::{Snapshot, TraceSink};
use crate::variates::{exponential, UniformSource};

/// Lifecycle of a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Events are still being processed.
    Running,
    /// The required number of delays was recorded and a report was produced.
    Completed,
    /// A fatal error stopped the run before it reached its target.
    Aborted,
}

/// A single-server queueing simulation.
///
/// Owns everything a run needs: the validated [`Parameters`], the uniform
/// stream that feeds the exponential variate generator, the clock, the
/// [`EventCalendar`], the server and waiting-room state, and the running
/// [`StatsAccumulator`]. The expected workflow is:
///
/// 1. Build [`Parameters`] and a seeded uniform source.
/// 2. Pass both to [`new()`], which schedules the first arrival.
/// 3. Call [`run()`] with a [`TraceSink`] and handle any error it returns.
/// 4. Use the returned [`Report`] (or the [`stats()`] accessor) to finish
///    processing the results.
///
/// Clients that want finer control can drive the simulation one event at a
/// time with [`step()`] instead of calling [`run()`].
///
/// [`new()`]: Simulation::new
/// [`run()`]: Simulation::run
/// [`step()`]: Simulation::step
/// [`stats()`]: Simulation::stats
#[derive(Debug)]
pub struct Simulation<Source> {
    parameters: Parameters,
    /// Uniform stream consumed by the exponential variate generator.
    source: Source,
    /// Current simulated time, in the same unit as the parameter means.
    clock: f64,
    /// The two named event slots this model schedules into.
    calendar: EventCalendar,
    server: ServerStatus,
    waiting_room: WaitingRoom,
    stats: StatsAccumulator,
    phase: Phase,
    /// Events handled so far, counting both arrivals and departures.
    events_processed: u64,
}

impl<Source> Simulation<Source>
where
    Source: UniformSource,
{
    /// Initialize a simulation at clock zero with an idle server, an empty
    /// waiting room, and the first arrival already scheduled.
    ///
    /// Consumes one draw from `source` for the first interarrival time.
    pub fn new(parameters: Parameters, mut source: Source) -> Self {
        let first_arrival = exponential(&mut source, parameters.mean_interarrival());
        Self {
            parameters,
            source,
            clock: 0.0,
            calendar: EventCalendar::new(first_arrival),
            server: ServerStatus::Idle,
            waiting_room: WaitingRoom::new(WAITING_ROOM_CAPACITY),
            stats: StatsAccumulator::new(),
            phase: Phase::Running,
            events_processed: 0,
        }
    }

    /// Execute events in chronological order until enough customers have
    /// had their delay recorded, then produce the final [`Report`].
    ///
    /// Follows this loop:
    ///
    /// 1. Has `customers_delayed` reached the required count? If so, mark
    ///    the run [`Completed`], hand the report to
    ///    [`sink.on_report()`], and return it.
    /// 2. Otherwise call [`step()`]. On an error, hand it to
    ///    [`sink.on_fatal()`] and forward it to the caller.
    ///
    /// The sink also receives one [`Snapshot`] of the initial state before
    /// the first event executes.
    ///
    /// # Errors
    ///
    /// 1. [`Error::EmptyCalendar`] means neither event slot was scheduled,
    ///    so simulated time could never advance again. With this model's
    ///    arrival handler always rescheduling the next arrival, hitting
    ///    this in practice indicates a logical bug at the call site.
    /// 2. [`Error::WaitingRoomOverflow`] means an arrival found the
    ///    waiting room already holding its full capacity.
    ///
    /// Either way the run is marked [`Aborted`] and no report is produced.
    ///
    /// [`Completed`]: Phase::Completed
    /// [`Aborted`]: Phase::Aborted
    /// [`step()`]: Simulation::step
    /// [`sink.on_report()`]: TraceSink::on_report
    /// [`sink.on_fatal()`]: TraceSink::on_fatal
    pub fn run(&mut self, sink: &mut impl TraceSink) -> Result<Report> {
        if self.events_processed == 0 {
            sink.on_snapshot(&self.snapshot(None));
        }

        while self.stats.customers_delayed() < self.parameters.delays_required() {
            if let Err(error) = self.step(sink) {
                sink.on_fatal(&error);
                return Err(error);
            }
        }

        self.phase = Phase::Completed;
        let report = Report::from_run(&self.stats, self.clock);
        log::debug!(
            "run complete: {} delays recorded by time {:.3} over {} events",
            report.customers_delayed(),
            self.clock,
            self.events_processed,
        );
        sink.on_report(&report);
        Ok(report)
    }

    /// Execute the single next event: advance the clock to it, weight the
    /// time-averaged statistics by the interval just elapsed, and dispatch
    /// to the arrival or departure handler.
    ///
    /// Statistics are updated *before* the handler runs, so each interval
    /// between events is weighted by the state that actually held during
    /// it. When both slots hold the same time the arrival is dispatched
    /// first. After the handler returns, `sink` receives a [`Snapshot`] of
    /// the post-event state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCalendar`] if no event is scheduled, or
    /// [`Error::WaitingRoomOverflow`] if an arrival finds the waiting room
    /// full. Both are fatal: the run transitions to [`Phase::Aborted`] and
    /// the simulation should not be stepped again.
    pub fn step(&mut self, sink: &mut impl TraceSink) -> Result<()> {
        let (kind, time) = match self.calendar.peek_next() {
            Some(next) => next,
            None => {
                self.phase = Phase::Aborted;
                let error = Error::EmptyCalendar { clock: self.clock };
                log::error!("{error}");
                return Err(error);
            }
        };

        self.clock = time;
        self.stats
            .advance_to(self.clock, self.waiting_room.len(), self.server.is_busy());

        let outcome = match kind {
            EventKind::Arrival => self.handle_arrival(),
            EventKind::Departure => {
                self.handle_departure();
                Ok(())
            }
        };
        if let Err(error) = outcome {
            self.phase = Phase::Aborted;
            log::error!("{error}");
            return Err(error);
        }

        self.events_processed += 1;
        log::debug!(
            "{kind} at {:.3}: {} waiting, server {}, {} of {} delays recorded",
            self.clock,
            self.waiting_room.len(),
            self.server,
            self.stats.customers_delayed(),
            self.parameters.delays_required(),
        );
        sink.on_snapshot(&self.snapshot(Some(kind)));
        Ok(())
    }

    /// A customer arrives. The next arrival is always rescheduled first;
    /// then the customer either joins the waiting room (server busy) or
    /// enters service immediately with a delay of zero (server idle).
    fn handle_arrival(&mut self) -> Result<()> {
        let next = self.clock + exponential(&mut self.source, self.parameters.mean_interarrival());
        self.calendar.schedule_arrival(next);

        if self.server.is_busy() {
            self.waiting_room.join(self.clock)?;
        } else {
            self.stats.record_delay(0.0);
            self.start_service();
        }
        Ok(())
    }

    /// The customer in service departs. The longest-waiting customer (if
    /// any) enters service and has its delay recorded; otherwise the
    /// server goes idle and the departure slot is cleared.
    fn handle_departure(&mut self) {
        match self.waiting_room.take_next() {
            Some(arrived_at) => {
                self.stats.record_delay(self.clock - arrived_at);
                self.start_service();
            }
            None => {
                self.server = ServerStatus::Idle;
                self.calendar.clear_departure();
            }
        }
    }

    /// Put a customer into service now, scheduling its departure.
    ///
    /// Consumes one draw from the uniform source for the service time.
    fn start_service(&mut self) {
        self.server = ServerStatus::Busy;
        let completes = self.clock + exponential(&mut self.source, self.parameters.mean_service());
        self.calendar.schedule_departure(completes);
    }

    fn snapshot(&self, event: Option<EventKind>) -> Snapshot {
        Snapshot {
            event,
            clock: self.clock,
            server: self.server,
            queue_length: self.waiting_room.len(),
            next_arrival: self.calendar.next_arrival(),
            next_departure: self.calendar.next_departure(),
            customers_delayed: self.stats.customers_delayed(),
            total_delay: self.stats.total_delay(),
            area_queue_length: self.stats.area_queue_length(),
            area_server_busy: self.stats.area_server_busy(),
        }
    }

    /// Current simulated time.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Where the run currently is in its lifecycle.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True once the run has recorded every required delay and produced
    /// its report.
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Completed
    }

    /// Whether the server is currently serving a customer.
    pub fn server_status(&self) -> ServerStatus {
        self.server
    }

    /// Number of customers currently in the waiting room.
    pub fn queue_length(&self) -> usize {
        self.waiting_room.len()
    }

    /// Read access to the running statistics.
    pub fn stats(&self) -> &StatsAccumulator {
        &self.stats
    }

    /// The parameters this run was built with.
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Events handled so far.
    pub fn events_processed(&self) -> u64 {
        self.events_processed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{MemorySink, NullSink};
    use crate::variates::ScriptedSource;

    fn parameters(mean_interarrival: f64, mean_service: f64, delays: u64) -> Parameters {
        Parameters::new(mean_interarrival, mean_service, delays).unwrap()
    }

    #[test]
    fn first_event_is_the_initial_arrival() {
        let source = ScriptedSource::new(vec![0.5, 0.5, 0.5]);
        let mut sim = Simulation::new(parameters(1.0, 0.5, 10), source);
        let expected_arrival = -1.0 * 0.5f64.ln();
        assert_eq!(Some(expected_arrival), sim.calendar.next_arrival());
        assert_eq!(None, sim.calendar.next_departure());

        sim.step(&mut NullSink).unwrap();

        assert_eq!(expected_arrival, sim.clock());
        assert_eq!(ServerStatus::Busy, sim.server_status());
        assert_eq!(0, sim.queue_length());
        assert_eq!(1, sim.stats().customers_delayed());
        assert_eq!(1, sim.events_processed());
    }

    #[test]
    fn empty_calendar_aborts_the_run() {
        let source = ScriptedSource::new(vec![0.5]);
        let mut sim = Simulation::new(parameters(1.0, 1.0, 5), source);
        sim.calendar = EventCalendar::default();

        let mut sink = MemorySink::new();
        let result = sim.run(&mut sink);

        assert_eq!(Err(Error::EmptyCalendar { clock: 0.0 }), result);
        assert_eq!(Phase::Aborted, sim.phase());
        assert_eq!(sink.fatals(), [Error::EmptyCalendar { clock: 0.0 }]);
        assert!(sink.reports().is_empty());
    }

    #[test]
    fn simultaneous_events_dispatch_the_arrival_first() {
        // Equal draws with equal means put the second arrival and the
        // first departure at bit-identical times.
        let source = ScriptedSource::new(vec![0.5, 0.5, 0.5, 0.5]);
        let mut sim = Simulation::new(parameters(1.0, 1.0, 5), source);

        sim.step(&mut NullSink).unwrap();
        assert_eq!(sim.calendar.next_arrival(), sim.calendar.next_departure());

        sim.step(&mut NullSink).unwrap();

        // The tied event went to the arrival handler: the customer joined
        // the waiting room and the departure slot still holds that time.
        assert_eq!(1, sim.queue_length());
        assert_eq!(ServerStatus::Busy, sim.server_status());
        assert_eq!(Some(sim.clock()), sim.calendar.next_departure());
    }

    #[test]
    fn target_of_zero_completes_without_stepping() {
        let source = ScriptedSource::new(vec![0.5]);
        let mut sim = Simulation::new(parameters(1.0, 0.5, 0), source);

        let mut sink = MemorySink::new();
        let report = sim.run(&mut sink).unwrap();

        assert_eq!(Phase::Completed, sim.phase());
        assert!(sim.is_complete());
        assert_eq!(0, sim.events_processed());
        assert_eq!(0.0, report.end_time());
        assert_eq!(None, report.mean_delay());
        assert_eq!(None, report.server_utilization());
        assert_eq!(1, sink.snapshots().len());
        assert_eq!(None, sink.snapshots()[0].event);
        assert_eq!(sink.reports(), [report]);
    }

    #[test]
    fn single_delay_run_reports_all_zero_metrics() {
        // One arrival into an idle server records a zero delay and stops
        // the run before any service time accrues.
        let source = ScriptedSource::new(vec![0.5, 0.9, 0.9]);
        let mut sim = Simulation::new(parameters(1.0, 0.5, 1), source);

        let mut sink = MemorySink::new();
        let report = sim.run(&mut sink).unwrap();

        let expected_end = -1.0 * 0.5f64.ln();
        assert_eq!(expected_end, report.end_time());
        assert_eq!(Some(0.0), report.mean_delay());
        assert_eq!(Some(0.0), report.mean_queue_length());
        assert_eq!(Some(0.0), report.server_utilization());
        assert_eq!(1, report.customers_delayed());

        assert_eq!(2, sink.snapshots().len());
        assert_eq!(None, sink.snapshots()[0].event);
        assert_eq!(Some(EventKind::Arrival), sink.snapshots()[1].event);
        assert_eq!(Phase::Completed, sim.phase());
    }

    #[test]
    fn departure_into_empty_room_idles_the_server() {
        // Arrival at ln 2, service over at ln 2 + 0.5 ln 2, next arrival
        // not until 3 ln 2. The departure finds nobody waiting.
        let source = ScriptedSource::new(vec![0.5, 0.25, 0.5, 0.5]);
        let mut sim = Simulation::new(parameters(1.0, 0.5, 5), source);

        sim.step(&mut NullSink).unwrap();
        sim.step(&mut NullSink).unwrap();

        assert_eq!(ServerStatus::Idle, sim.server_status());
        assert_eq!(None, sim.calendar.next_departure());
        assert!(sim.calendar.next_arrival().is_some());
        assert_eq!(1, sim.stats().customers_delayed());
    }

    #[test]
    fn waiting_customer_delay_spans_arrival_to_service_start() {
        // Draws of e^-x turn into exponential outcomes of about x: the
        // first service runs about 3 units while the second customer
        // arrives about 2 units in, so it waits about 1 unit.
        let source = ScriptedSource::new(vec![
            (-1.0f64).exp(),
            (-2.0f64).exp(),
            (-3.0f64).exp(),
            (-2.0f64).exp(),
            (-1.0f64).exp(),
        ]);
        let mut sim = Simulation::new(parameters(1.0, 1.0, 5), source);

        sim.step(&mut NullSink).unwrap(); // arrival, straight into service
        sim.step(&mut NullSink).unwrap(); // second arrival, waits
        let waited_from = sim.clock();
        sim.step(&mut NullSink).unwrap(); // departure, head enters service

        assert_eq!(2, sim.stats().customers_delayed());
        assert_eq!(sim.clock() - waited_from, sim.stats().total_delay());
        assert!(sim.stats().total_delay() > 0.9);
        assert_eq!(ServerStatus::Busy, sim.server_status());
        assert_eq!(0, sim.queue_length());
    }
}
