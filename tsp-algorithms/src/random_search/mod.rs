//! Baseline: score uniformly random tours and keep the best one.
use crate::{utils::score, StopCondition};
use anyhow::{anyhow, Result};
use log::{debug, info};
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::{Map, Value};
use tsp_challenges::{route::Route, travelling_salesman::*};

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
    if let Some(map) = hyperparameters.as_ref().filter(|map| !map.is_empty()) {
        return Err(anyhow!(
            "Invalid hyperparameters: random_search takes none, got {:?}",
            map.keys().collect::<Vec<_>>()
        ));
    }

    let graph = &challenge.graph;
    let budget = stop.start();
    let mut rng = SmallRng::from_seed(challenge.seed);
    let mut best_cost = f64::INFINITY;
    while let Some(iteration) = budget.next_restart() {
        let route = Route::random(graph.vertex_count(), &mut rng);
        let cost = score(graph, &route);
        if cost < best_cost {
            best_cost = cost;
            info!("New best {} on iteration {}", cost, iteration);
            save_solution(&Solution::from(route))?;
        }
    }
    debug!(
        "Random search stopped after {} iterations in {:.3}s",
        budget.restarts(),
        budget.elapsed().as_secs_f64()
    );
    Ok(())
}
