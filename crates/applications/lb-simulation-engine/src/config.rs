//! Run parameters and their validation
//!
//! Positional layout: `T M P_1 .. P_M lambda Q_1 .. Q_M mu_1 .. mu_M`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};
use crate::random::{check_rate, check_weights};

/// One server's parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Routing weight (not necessarily normalized)
    pub weight: f64,
    /// Waiting room size, excluding the job in service
    pub capacity: usize,
    pub service_rate: f64,
}

/// Parameters of a single run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// No arrivals are generated after this time
    pub horizon: f64,
    pub arrival_rate: f64,
    pub servers: Vec<ServerConfig>,
}

/// Cursor over positional values that names what it expected on failure
struct Positional<'a, S> {
    values: &'a [S],
    pos: usize,
}

impl<'a, S: AsRef<str>> Positional<'a, S> {
    fn next_raw(&mut self, name: &str) -> Result<&'a str> {
        let value = self
            .values
            .get(self.pos)
            .ok_or_else(|| SimulationError::MissingArgument(name.to_string()))?;
        self.pos += 1;
        Ok(value.as_ref())
    }

    fn next<T: FromStr>(&mut self, name: &str) -> Result<T> {
        let raw = self.next_raw(name)?;
        raw.trim()
            .parse()
            .map_err(|_| SimulationError::invalid_number(name, raw))
    }

    fn rest(&self) -> Vec<String> {
        self.values[self.pos..]
            .iter()
            .map(|v| v.as_ref().to_string())
            .collect()
    }
}

impl SimulationConfig {
    pub fn new(horizon: f64, arrival_rate: f64, servers: Vec<ServerConfig>) -> Result<Self> {
        let config = SimulationConfig {
            horizon,
            arrival_rate,
            servers,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate positional command-line values
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let mut values = Positional { values: args, pos: 0 };

        let horizon: f64 = values.next("T")?;
        let m: i64 = values.next("M")?;
        if m < 1 {
            return Err(SimulationError::InvalidServerCount(m));
        }
        let m = m as usize;

        let weights = (1..=m)
            .map(|i| values.next::<f64>(&format!("P_{}", i)))
            .collect::<Result<Vec<_>>>()?;
        let arrival_rate: f64 = values.next("lambda")?;
        let capacities = (1..=m)
            .map(|i| {
                let q: i64 = values.next(&format!("Q_{}", i))?;
                usize::try_from(q).map_err(|_| SimulationError::InvalidCapacity {
                    server: i,
                    value: q,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let service_rates = (1..=m)
            .map(|i| values.next::<f64>(&format!("mu_{}", i)))
            .collect::<Result<Vec<_>>>()?;

        let rest = values.rest();
        if !rest.is_empty() {
            return Err(SimulationError::TrailingArguments(rest));
        }

        let servers = weights
            .into_iter()
            .zip(capacities)
            .zip(service_rates)
            .map(|((weight, capacity), service_rate)| ServerConfig {
                weight,
                capacity,
                service_rate,
            })
            .collect();

        Self::new(horizon, arrival_rate, servers)
    }

    pub fn validate(&self) -> Result<()> {
        // A negative horizon is legal: no arrival is ever generated
        if !self.horizon.is_finite() {
            return Err(SimulationError::InvalidHorizon(self.horizon));
        }
        if self.servers.is_empty() {
            return Err(SimulationError::InvalidServerCount(0));
        }
        check_rate("lambda", self.arrival_rate)?;
        for (i, server) in self.servers.iter().enumerate() {
            check_rate(&format!("mu_{}", i + 1), server.service_rate)?;
        }
        check_weights(&self.weights())
    }

    pub fn server_count(&self) -> usize {
        self.servers.len()
    }

    pub fn weights(&self) -> Vec<f64> {
        self.servers.iter().map(|s| s.weight).collect()
    }
}
