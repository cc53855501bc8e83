//! Per-server admission and service state machine
//!
//! A server is either idle with an empty buffer, or busy serving one job
//! with up to `capacity` jobs waiting behind it in FIFO order. The buffer
//! stores arrival timestamps so the queueing delay of each job is known
//! when its service starts.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};
use crate::random::RandomVariateSource;
use crate::types::Event;

/// Outcome of offering an arrival to a server
#[derive(Debug, Clone, PartialEq)]
pub enum Admission {
    /// Server was idle; service starts right away
    Started { departure: Event, service_time: f64 },
    /// Server busy; job waits in the buffer
    Queued,
    /// Server busy and buffer full
    Dropped,
}

/// Outcome of a service completion
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// The oldest waiting job moved into service
    NextStarted {
        departure: Event,
        wait: f64,
        service_time: f64,
    },
    /// Buffer was empty; server is now idle
    Idle,
}

/// Observable snapshot of a server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerStatus {
    Idle,
    Busy { waiting: usize },
}

/// State of one server
#[derive(Debug, Clone)]
pub struct ServerState {
    pub id: usize,
    pub service_rate: f64,
    pub capacity: usize,
    busy: bool,
    queue: VecDeque<f64>,
}

impl ServerState {
    pub fn new(id: usize, service_rate: f64, capacity: usize) -> Self {
        ServerState {
            id,
            service_rate,
            capacity,
            busy: false,
            queue: VecDeque::new(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn status(&self) -> ServerStatus {
        if self.busy {
            ServerStatus::Busy {
                waiting: self.queue.len(),
            }
        } else {
            ServerStatus::Idle
        }
    }

    /// Offer an arrival at `time`
    pub fn on_arrival<S: RandomVariateSource + ?Sized>(
        &mut self,
        time: f64,
        source: &mut S,
    ) -> Result<Admission> {
        let admission = if !self.busy {
            let service_time = source.exponential(self.service_rate)?;
            self.busy = true;
            Admission::Started {
                departure: Event::departure(time + service_time, self.id, time),
                service_time,
            }
        } else if self.queue.len() < self.capacity {
            self.queue.push_back(time);
            Admission::Queued
        } else {
            Admission::Dropped
        };

        self.check_invariants()?;
        Ok(admission)
    }

    /// Complete the job in service at `time` and pull the next waiting one
    pub fn on_departure<S: RandomVariateSource + ?Sized>(
        &mut self,
        time: f64,
        source: &mut S,
    ) -> Result<Completion> {
        if !self.busy {
            return Err(SimulationError::invariant(format!(
                "departure at {} for idle server {}",
                time, self.id
            )));
        }

        let completion = match self.queue.pop_front() {
            Some(arrival_time) => {
                let service_time = source.exponential(self.service_rate)?;
                Completion::NextStarted {
                    departure: Event::departure(time + service_time, self.id, arrival_time),
                    wait: time - arrival_time,
                    service_time,
                }
            }
            None => {
                self.busy = false;
                Completion::Idle
            }
        };

        self.check_invariants()?;
        Ok(completion)
    }

    fn check_invariants(&self) -> Result<()> {
        if self.queue.len() > self.capacity {
            return Err(SimulationError::invariant(format!(
                "server {} holds {} waiting jobs, capacity {}",
                self.id,
                self.queue.len(),
                self.capacity
            )));
        }
        if !self.busy && !self.queue.is_empty() {
            return Err(SimulationError::invariant(format!(
                "idle server {} has {} waiting jobs",
                self.id,
                self.queue.len()
            )));
        }
        Ok(())
    }
}
