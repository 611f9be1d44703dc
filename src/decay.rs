use serde::{Deserialize, Serialize};

use crate::{
    ensure_interval,
    error::{Error, Result},
};

/// A hyperparameter that changes with the episode count, used to anneal epsilon
///
/// Serialized with an internal `kind` tag so it reads naturally in YAML config files:
/// ```yaml
/// epsilon:
///   kind: exponential
///   rate: 0.01
///   start: 1.0
///   end: 0.05
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Schedule {
    /// v(t) = value
    Constant { value: f64 },
    /// v(t) = end + (start - end) * e<sup>-rate * t</sup>
    Exponential { rate: f64, start: f64, end: f64 },
    /// v(t) = max(start - rate * t, end)
    Linear { rate: f64, start: f64, end: f64 },
}

impl Default for Schedule {
    fn default() -> Self {
        Self::Constant { value: 0.1 }
    }
}

impl Schedule {
    pub fn constant(value: f64) -> Self {
        Self::Constant { value }
    }

    /// Calculate value at time `t`
    pub fn evaluate(&self, t: f64) -> f64 {
        match *self {
            Self::Constant { value } => value,
            Self::Exponential { rate, start, end } => end + (start - end) * (-rate * t).exp(),
            Self::Linear { rate, start, end } => (start - rate * t).max(end),
        }
    }

    /// Check that every value the schedule can produce lies in `[0, 1]`
    ///
    /// Only decaying schedules are accepted: `rate` must be non-negative and `start` at least
    /// `end`, so values run from `start` down towards `end` and never leave the interval.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Constant { value } => {
                ensure_interval!(value, 0.0, 1.0);
            }
            Self::Exponential { rate, start, end } | Self::Linear { rate, start, end } => {
                ensure_interval!(start, 0.0, 1.0);
                ensure_interval!(end, 0.0, 1.0);
                if !(rate >= 0.0 && start >= end) {
                    return Err(Error::InvalidSchedule(format!(
                        "schedules must decay, got rate {rate} from {start} to {end}"
                    )));
                }
            }
        }
        Ok(())
    }
}
