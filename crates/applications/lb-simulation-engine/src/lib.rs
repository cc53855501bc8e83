//! Load-Balancer Simulation Engine
//!
//! Discrete-event simulator of a probabilistic load balancer: Poisson
//! arrivals are routed by weight to M servers, each with a bounded FIFO
//! buffer and exponential service. Arrivals that find a full buffer are
//! dropped.

pub mod config;
pub mod error;
pub mod event_queue;
pub mod random;
pub mod router;
pub mod server;
pub mod simulator;
pub mod stats;
pub mod types;

pub use config::{ServerConfig, SimulationConfig};
pub use error::{Result, SimulationError};
pub use random::{RandomVariateSource, RngSource};
pub use simulator::Simulator;
pub use stats::{RunReport, ServerReport};
