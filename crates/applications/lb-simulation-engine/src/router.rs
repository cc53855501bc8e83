//! Weighted random routing of arrivals to servers

use crate::error::Result;
use crate::random::{check_weights, RandomVariateSource};

/// Routes each arrival to one server, proportionally to its weight.
///
/// Weights need not sum to one; they are validated once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Router {
    weights: Vec<f64>,
}

impl Router {
    pub fn new(weights: Vec<f64>) -> Result<Self> {
        check_weights(&weights)?;
        Ok(Router { weights })
    }

    /// Draw the target server for one arrival
    pub fn route<S: RandomVariateSource + ?Sized>(&self, source: &mut S) -> Result<usize> {
        source.categorical(&self.weights)
    }
}
