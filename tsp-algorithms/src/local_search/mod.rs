//! Random-restart hill climbing.
//!
//! Each restart draws a uniformly random tour and descends through the swap
//! neighbourhood (exchange the vertices at two positions) until no single
//! exchange makes the tour shorter. Local optima are compared against the best
//! tour seen so far and every strict improvement is passed to `save_solution`.
//!
//! Hyperparameters (all optional):
//! * `improvement`: `"greedy"` (default) or `"steepest"`
//! * `move`: `"swap"` (default) or `"reverse"` for classical 2-opt
//! * `num_workers`: number of independent restart chains, default 1
mod config;
mod descent;
mod neighbourhood;
mod runner;

pub use config::{Config, Improvement, Move};
pub use descent::{descend, sweep, Descent};
pub use neighbourhood::{neighbours, pairs};
pub use runner::Solver;

use crate::StopCondition;
use anyhow::Result;
use serde_json::{Map, Value};
use tsp_challenges::travelling_salesman::*;

/// Runs until `save_solution` returns an error; use
/// [`solve_challenge_with_stop`] to bound the search.
pub fn solve_challenge(
    challenge: &Challenge,
    save_solution: &dyn Fn(&Solution) -> Result<()>,
    hyperparameters: &Option<Map<String, Value>>,
) -> Result<()> {
    solve_challenge_with_stop(challenge, save_solution, hyperparameters, &StopCondition::new())
}

pub fn solve_challenge_with_stop(
    challenge: &Challenge,
    save_solution: &dyn Fn(&Solution) -> Result<()>,
    hyperparameters: &Option<Map<String, Value>>,
    stop: &StopCondition,
) -> Result<()> {
    let config = Config::initialize(hyperparameters)?;
    Solver::new(challenge, config).run(save_solution, stop)?;
    Ok(())
}
