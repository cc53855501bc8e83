//! Core types for the simulation engine

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// What happens when an event fires
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// A new job reaches the load balancer
    Arrival,
    /// A server finishes the job it is serving
    Departure {
        server: usize,
        /// When the completing job entered the system
        arrival_time: f64,
    },
}

/// Simulation event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub time: f64,
    pub kind: EventKind,
}

impl Event {
    pub fn arrival(time: f64) -> Self {
        Event {
            time,
            kind: EventKind::Arrival,
        }
    }

    pub fn departure(time: f64, server: usize, arrival_time: f64) -> Self {
        Event {
            time,
            kind: EventKind::Departure {
                server,
                arrival_time,
            },
        }
    }

    pub fn is_arrival(&self) -> bool {
        matches!(self.kind, EventKind::Arrival)
    }

    /// Server the event belongs to (departures only)
    pub fn server(&self) -> Option<usize> {
        match self.kind {
            EventKind::Departure { server, .. } => Some(server),
            EventKind::Arrival => None,
        }
    }

    /// Rank used to break timestamp ties: departures fire before arrivals,
    /// lower server indices first.
    fn tie_rank(&self) -> (u8, usize) {
        match self.kind {
            EventKind::Departure { server, .. } => (0, server),
            EventKind::Arrival => (1, 0),
        }
    }

    /// Scheduling order: earliest time first, then departures before
    /// arrivals, then by server index.
    pub fn schedule_cmp(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then_with(|| self.tie_rank().cmp(&other.tie_rank()))
    }
}
