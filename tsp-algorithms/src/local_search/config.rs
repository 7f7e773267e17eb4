use crate::utils::merge_hyperparameters;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How a sweep adopts improving neighbours.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Improvement {
    /// Adopt each improving neighbour as soon as it is seen and keep sweeping
    /// from the adopted route.
    #[default]
    Greedy,
    /// Scan the whole neighbourhood, then adopt the best improving neighbour.
    Steepest,
}

/// Which neighbourhood a sweep explores.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Move {
    /// Exchange the vertices at two positions.
    #[default]
    Swap,
    /// Reverse the segment between two positions (2-opt).
    Reverse,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub improvement: Improvement,

    #[serde(rename = "move")]
    pub neighbourhood: Move,

    /// Number of independent restart chains; only a single chain reproduces
    /// the same sequence of improvements for a given seed.
    pub num_workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            improvement: Improvement::default(),
            neighbourhood: Move::default(),
            num_workers: 1,
        }
    }
}

impl Config {
    pub fn initialize(hyperparameters: &Option<Map<String, Value>>) -> Result<Self> {
        let config = merge_hyperparameters(&Self::default(), hyperparameters)?;
        if config.num_workers == 0 {
            return Err(anyhow!("Invalid hyperparameters: num_workers must be at least 1"));
        }
        Ok(config)
    }
}
