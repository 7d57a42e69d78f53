/// Running statistics accumulated over a run.
///
/// Two kinds live here: time-weighted integrals (area under the
/// queue-length curve and under the server's busy indicator), and the
/// per-customer delay tally. All fields are monotonically
/// non-decreasing across a run and reset only by constructing a new
/// accumulator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsAccumulator {
    area_queue_length: f64,
    area_server_busy: f64,
    total_delay: f64,
    customers_delayed: u64,
    time_of_last_event: f64,
}

impl StatsAccumulator {
    /// A zeroed accumulator with its last-event time at clock 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Weight the interval since the previous update by the state that
    /// held during it, then mark `now` as the new last-event time.
    ///
    /// The engine calls this after choosing the next event but before
    /// dispatching its handler: `queue_length` and `server_busy` must
    /// describe the state throughout `[last event, now)`, not the
    /// state after the transition.
    pub fn advance_to(&mut self, now: f64, queue_length: usize, server_busy: bool) {
        debug_assert!(
            now >= self.time_of_last_event,
            "statistics clock moved backwards: {now} < {}",
            self.time_of_last_event
        );
        let elapsed = now - self.time_of_last_event;
        self.time_of_last_event = now;
        self.area_queue_length += queue_length as f64 * elapsed;
        if server_busy {
            self.area_server_busy += elapsed;
        }
    }

    /// Record one completed wait of the given length.
    pub fn record_delay(&mut self, delay: f64) {
        self.total_delay += delay;
        self.customers_delayed += 1;
    }

    /// Integral of queue length over simulated time so far.
    pub fn area_queue_length(&self) -> f64 {
        self.area_queue_length
    }

    /// Integral of the busy indicator over simulated time so far.
    pub fn area_server_busy(&self) -> f64 {
        self.area_server_busy
    }

    /// Sum of all completed customer delays.
    pub fn total_delay(&self) -> f64 {
        self.total_delay
    }

    /// Number of customers whose delay has completed (zero-delay
    /// customers included).
    pub fn customers_delayed(&self) -> u64 {
        self.customers_delayed
    }

    /// Clock value of the most recent update.
    pub fn time_of_last_event(&self) -> f64 {
        self.time_of_last_event
    }
}
