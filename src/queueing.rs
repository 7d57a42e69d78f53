use crate::error::{Error, Result};
use std::collections::VecDeque;
use std::fmt;

/// Fixed capacity of the waiting room.
///
/// A hard operational limit carried over from the model: the system
/// has no policy for shedding or rejecting arrivals, so an arrival
/// that would exceed this count is fatal rather than recoverable.
pub const WAITING_ROOM_CAPACITY: usize = 100;

/// Whether the server is attending a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerStatus {
    /// No customer in service; the departure slot is unscheduled.
    Idle,
    /// A customer is in service.
    Busy,
}

impl ServerStatus {
    /// True when a customer is in service.
    pub fn is_busy(self) -> bool {
        matches!(self, ServerStatus::Busy)
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ServerStatus::Idle => write!(formatter, "idle"),
            ServerStatus::Busy => write!(formatter, "busy"),
        }
    }
}

/// FIFO record of the arrival timestamps of customers currently
/// waiting for service.
///
/// Ring-buffer backed: joining appends at the tail, the departure
/// handler takes from the head, and insertion order is service order.
/// The length of this record is the queue-length statistic.
#[derive(Debug, Clone)]
pub struct WaitingRoom {
    arrivals: VecDeque<f64>,
    capacity: usize,
}

impl WaitingRoom {
    /// An empty waiting room with the given hard capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            arrivals: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a customer joining the line at `arrival_time`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WaitingRoomOverflow`] when the room is already
    /// at capacity, leaving the room unchanged. `arrival_time` is the
    /// current clock at the insert, so it doubles as the failure
    /// timestamp.
    pub fn join(&mut self, arrival_time: f64) -> Result<()> {
        if self.arrivals.len() == self.capacity {
            return Err(Error::WaitingRoomOverflow {
                clock: arrival_time,
                capacity: self.capacity,
            });
        }
        self.arrivals.push_back(arrival_time);
        Ok(())
    }

    /// Remove and return the arrival timestamp of the longest-waiting
    /// customer, or `None` if nobody is waiting.
    pub fn take_next(&mut self) -> Option<f64> {
        self.arrivals.pop_front()
    }

    /// Number of customers currently waiting.
    pub fn len(&self) -> usize {
        self.arrivals.len()
    }

    /// True when nobody is waiting.
    pub fn is_empty(&self) -> bool {
        self.arrivals.is_empty()
    }

    /// The hard capacity this room was built with.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
