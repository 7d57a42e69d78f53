use ordered_float::OrderedFloat;
use std::fmt;

/// The sentinel time held by a slot whose event class is currently
/// unscheduled. Scheduled times are always finite, so infinity sorts
/// an empty slot after every real event.
const UNSCHEDULED: OrderedFloat<f64> = OrderedFloat(f64::INFINITY);

/// The two classes of event this model can schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A customer arrives at the system.
    Arrival,
    /// The customer in service completes and leaves.
    Departure,
}

impl fmt::Display for EventKind {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EventKind::Arrival => write!(formatter, "arrival"),
            EventKind::Departure => write!(formatter, "departure"),
        }
    }
}

/// Calendar of scheduled events, held as two named slots.
///
/// The model has exactly one arrival stream and one server, so at any
/// moment there is at most one pending arrival and at most one pending
/// departure. Two named slots represent that directly; a general
/// priority queue would only be warranted if the model grew more event
/// classes (more servers, say), in which case this struct is the seam
/// to replace with a min-ordered queue keyed by time and a stable
/// insertion sequence.
///
/// Slot times are kept as [`OrderedFloat`] so that comparisons are
/// total and the "unscheduled" sentinel of positive infinity orders
/// after every real event time.
///
/// # Tie-break
///
/// When the pending arrival and departure fall on the exact same
/// simulated time, [`peek_next()`] reports the **arrival** first. The
/// policy is stable, not a byproduct of storage order: the arriving
/// customer joins the waiting room before the departing one frees the
/// server.
///
/// [`peek_next()`]: EventCalendar::peek_next
#[derive(Debug, Clone, PartialEq)]
pub struct EventCalendar {
    next_arrival: OrderedFloat<f64>,
    next_departure: OrderedFloat<f64>,
}

impl Default for EventCalendar {
    /// A calendar with no scheduled events. [`peek_next()`] on this
    /// state yields `None`, the condition the engine reports as
    /// [`Error::EmptyCalendar`].
    ///
    /// [`peek_next()`]: EventCalendar::peek_next
    /// [`Error::EmptyCalendar`]: crate::Error::EmptyCalendar
    fn default() -> Self {
        Self {
            next_arrival: UNSCHEDULED,
            next_departure: UNSCHEDULED,
        }
    }
}

impl EventCalendar {
    /// Construct a calendar holding the run's first arrival, with no
    /// departure pending (the server starts idle).
    pub fn new(first_arrival: f64) -> Self {
        let mut calendar = Self::default();
        calendar.schedule_arrival(first_arrival);
        calendar
    }

    /// Replace the pending arrival time.
    pub fn schedule_arrival(&mut self, at: f64) {
        debug_assert!(at.is_finite(), "scheduled arrival time must be finite, got {at}");
        self.next_arrival = OrderedFloat(at);
    }

    /// Replace the pending departure time.
    pub fn schedule_departure(&mut self, at: f64) {
        debug_assert!(at.is_finite(), "scheduled departure time must be finite, got {at}");
        self.next_departure = OrderedFloat(at);
    }

    /// Mark the departure slot unscheduled; used when the server goes
    /// idle with nobody left to serve.
    pub fn clear_departure(&mut self) {
        self.next_departure = UNSCHEDULED;
    }

    /// Time of the pending arrival, if one is scheduled.
    pub fn next_arrival(&self) -> Option<f64> {
        scheduled(self.next_arrival)
    }

    /// Time of the pending departure, if one is scheduled.
    pub fn next_departure(&self) -> Option<f64> {
        scheduled(self.next_departure)
    }

    /// The next event to occur and its scheduled time, or `None` when
    /// both slots are unscheduled (a malformed state the engine treats
    /// as fatal). Ties resolve to [`EventKind::Arrival`]; see the
    /// struct-level tie-break note.
    pub fn peek_next(&self) -> Option<(EventKind, f64)> {
        if self.next_arrival == UNSCHEDULED && self.next_departure == UNSCHEDULED {
            return None;
        }
        if self.next_arrival <= self.next_departure {
            Some((EventKind::Arrival, self.next_arrival.0))
        } else {
            Some((EventKind::Departure, self.next_departure.0))
        }
    }
}

fn scheduled(slot: OrderedFloat<f64>) -> Option<f64> {
    if slot == UNSCHEDULED {
        None
    } else {
        Some(slot.0)
    }
}

impl fmt::Display for EventCalendar {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        let render = |slot: Option<f64>| match slot {
            Some(time) => format!("{time:.3}"),
            None => "unscheduled".into(),
        };
        write!(
            formatter,
            "EventCalendar with next arrival at {} and next departure at {}",
            render(self.next_arrival()),
            render(self.next_departure()),
        )
    }
}
