//! Statistics accumulated over a run and the final report

use std::fmt;

use serde::{Deserialize, Serialize};

/// Result of a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub total_serviced: u64,
    pub total_dropped: u64,
    pub last_event_time: f64,
    pub average_wait_time: f64,
    pub average_service_time: f64,

    pub total_arrivals: u64,
    /// Mean time from arrival to departure over serviced jobs
    pub average_sojourn_time: f64,
    pub events_processed: u64,
    /// Seed of the random source, when known
    pub seed: Option<u64>,
    pub servers: Vec<ServerReport>,
}

/// Per-server breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerReport {
    pub server: usize,
    pub arrivals: u64,
    pub serviced: u64,
    pub dropped: u64,
    pub average_wait_time: f64,
    pub average_service_time: f64,
    pub peak_queue_len: usize,
    /// Fraction of `[0, last_event_time]` spent serving
    pub utilization: f64,
}

/// The one-line summary: `serviced dropped last_event avg_wait avg_service`
impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:.4} {:.4} {:.4}",
            self.total_serviced,
            self.total_dropped,
            self.last_event_time,
            self.average_wait_time,
            self.average_service_time
        )
    }
}

#[derive(Debug, Clone, Default)]
struct ServerCounters {
    arrivals: u64,
    serviced: u64,
    dropped: u64,
    sum_wait_time: f64,
    sum_service_time: f64,
    peak_queue_len: usize,
}

/// Running counts and sums, mutated by the engine only
#[derive(Debug, Clone)]
pub struct StatisticsCollector {
    total_arrivals: u64,
    total_serviced: u64,
    total_dropped: u64,
    sum_wait_time: f64,
    sum_service_time: f64,
    sum_sojourn_time: f64,
    last_event_time: f64,
    servers: Vec<ServerCounters>,
}

/// `sum / count`, or zero when nothing was counted
fn mean(sum: f64, count: u64) -> f64 {
    if count > 0 { sum / count as f64 } else { 0.0 }
}

impl StatisticsCollector {
    pub fn new(server_count: usize) -> Self {
        StatisticsCollector {
            total_arrivals: 0,
            total_serviced: 0,
            total_dropped: 0,
            sum_wait_time: 0.0,
            sum_service_time: 0.0,
            sum_sojourn_time: 0.0,
            last_event_time: 0.0,
            servers: vec![ServerCounters::default(); server_count],
        }
    }

    pub fn record_arrival(&mut self, server: usize) {
        self.total_arrivals += 1;
        self.servers[server].arrivals += 1;
    }

    pub fn record_drop(&mut self, server: usize) {
        self.total_dropped += 1;
        self.servers[server].dropped += 1;
    }

    pub fn record_service_start(&mut self, server: usize, service_time: f64) {
        self.sum_service_time += service_time;
        self.servers[server].sum_service_time += service_time;
    }

    pub fn record_wait(&mut self, server: usize, wait: f64) {
        self.sum_wait_time += wait;
        self.servers[server].sum_wait_time += wait;
    }

    pub fn record_departure(&mut self, server: usize, time: f64, sojourn: f64) {
        self.total_serviced += 1;
        self.last_event_time = time;
        self.sum_sojourn_time += sojourn;
        self.servers[server].serviced += 1;
    }

    pub fn observe_queue_len(&mut self, server: usize, len: usize) {
        let peak = &mut self.servers[server].peak_queue_len;
        *peak = (*peak).max(len);
    }

    /// Finalize sums into averages
    pub fn finish(self, events_processed: u64, seed: Option<u64>) -> RunReport {
        let last_event_time = self.last_event_time;
        let servers = self
            .servers
            .iter()
            .enumerate()
            .map(|(server, c)| ServerReport {
                server,
                arrivals: c.arrivals,
                serviced: c.serviced,
                dropped: c.dropped,
                average_wait_time: mean(c.sum_wait_time, c.serviced),
                average_service_time: mean(c.sum_service_time, c.serviced),
                peak_queue_len: c.peak_queue_len,
                utilization: if last_event_time > 0.0 {
                    c.sum_service_time / last_event_time
                } else {
                    0.0
                },
            })
            .collect();

        RunReport {
            total_serviced: self.total_serviced,
            total_dropped: self.total_dropped,
            last_event_time,
            average_wait_time: mean(self.sum_wait_time, self.total_serviced),
            average_service_time: mean(self.sum_service_time, self.total_serviced),
            total_arrivals: self.total_arrivals,
            average_sojourn_time: mean(self.sum_sojourn_time, self.total_serviced),
            events_processed,
            seed,
            servers,
        }
    }
}
