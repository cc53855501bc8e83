//! Discrete-event simulator for a probabilistic load balancer
//!
//! Arrivals are generated up to the horizon, routed by weight to one of the
//! servers, and either start service, wait in the server's buffer, or are
//! dropped. The run ends when no events remain, so work admitted before the
//! horizon drains after it.

use tracing::{debug, info, trace};

use crate::config::SimulationConfig;
use crate::error::{Result, SimulationError};
use crate::event_queue::EventQueue;
use crate::random::RandomVariateSource;
use crate::router::Router;
use crate::server::{Admission, Completion, ServerState};
use crate::stats::{RunReport, StatisticsCollector};
use crate::types::{Event, EventKind};

/// Discrete-event simulator
pub struct Simulator<S> {
    current_time: f64,
    horizon: f64,
    arrival_rate: f64,
    event_queue: EventQueue,
    servers: Vec<ServerState>,
    router: Router,
    source: S,
    stats: StatisticsCollector,
    events_processed: u64,
    seed: Option<u64>,
}

impl<S: RandomVariateSource> Simulator<S> {
    /// Create a simulator for `config` drawing from `source`
    pub fn new(config: &SimulationConfig, source: S) -> Result<Self> {
        config.validate()?;

        let servers = config
            .servers
            .iter()
            .enumerate()
            .map(|(id, s)| ServerState::new(id, s.service_rate, s.capacity))
            .collect();

        Ok(Simulator {
            current_time: 0.0,
            horizon: config.horizon,
            arrival_rate: config.arrival_rate,
            event_queue: EventQueue::new(),
            servers,
            router: Router::new(config.weights())?,
            source,
            stats: StatisticsCollector::new(config.server_count()),
            events_processed: 0,
            seed: None,
        })
    }

    /// Record the seed the source was built from, for the report
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Run until no events remain
    pub fn run(mut self) -> Result<RunReport> {
        info!(
            servers = self.servers.len(),
            horizon = self.horizon,
            arrival_rate = self.arrival_rate,
            "starting simulation"
        );

        let first = self.source.exponential(self.arrival_rate)?;
        if first <= self.horizon {
            self.event_queue.push(Event::arrival(first));
        }

        while let Some(event) = self.event_queue.pop_min() {
            if event.time < self.current_time {
                return Err(SimulationError::invariant(format!(
                    "event at {} scheduled before current time {}",
                    event.time, self.current_time
                )));
            }
            self.current_time = event.time;
            self.events_processed += 1;
            self.process_event(event)?;
        }

        let pending: usize = self.servers.iter().map(|s| s.queue_len()).sum();
        if pending > 0 || self.servers.iter().any(ServerState::is_busy) {
            return Err(SimulationError::invariant(format!(
                "event queue drained with {} jobs still waiting",
                pending
            )));
        }

        let report = self.stats.finish(self.events_processed, self.seed);
        info!(
            serviced = report.total_serviced,
            dropped = report.total_dropped,
            end_time = report.last_event_time,
            events = report.events_processed,
            "simulation complete"
        );
        Ok(report)
    }

    /// Process a single event
    fn process_event(&mut self, event: Event) -> Result<()> {
        trace!(time = event.time, kind = ?event.kind, "processing event");
        match event.kind {
            EventKind::Arrival => self.handle_arrival(),
            EventKind::Departure {
                server,
                arrival_time,
            } => self.handle_departure(server, arrival_time),
        }
    }

    /// Handle an arrival at the load balancer
    fn handle_arrival(&mut self) -> Result<()> {
        let now = self.current_time;

        // Arrival generation is the only place the horizon applies
        let next = now + self.source.exponential(self.arrival_rate)?;
        if next <= self.horizon {
            self.event_queue.push(Event::arrival(next));
        }

        let target = self.router.route(&mut self.source)?;
        let server = self.servers.get_mut(target).ok_or_else(|| {
            SimulationError::invariant(format!("router picked unknown server {}", target))
        })?;
        self.stats.record_arrival(target);

        match server.on_arrival(now, &mut self.source)? {
            Admission::Started {
                departure,
                service_time,
            } => {
                self.stats.record_service_start(target, service_time);
                self.event_queue.push(departure);
            }
            Admission::Queued => {
                self.stats.observe_queue_len(target, server.queue_len());
            }
            Admission::Dropped => {
                debug!(time = now, server = target, "arrival dropped, buffer full");
                self.stats.record_drop(target);
            }
        }
        Ok(())
    }

    /// Handle a service completion
    fn handle_departure(&mut self, target: usize, arrival_time: f64) -> Result<()> {
        let now = self.current_time;
        let server = self.servers.get_mut(target).ok_or_else(|| {
            SimulationError::invariant(format!("departure for unknown server {}", target))
        })?;

        let completion = server.on_departure(now, &mut self.source)?;
        self.stats.record_departure(target, now, now - arrival_time);

        if let Completion::NextStarted {
            departure,
            wait,
            service_time,
        } = completion
        {
            self.stats.record_wait(target, wait);
            self.stats.record_service_start(target, service_time);
            self.event_queue.push(departure);
        }
        Ok(())
    }
}
