//! Ant system.
//!
//! Every round each ant builds a tour vertex by vertex, moving from `i` to an
//! unvisited `j` with probability proportional to
//! `pheromone(i, j)^alpha * distance(i, j)^-beta`. Trails then evaporate and
//! each ant lays `deposit / tour cost` on the edges it used. The cheapest tour
//! of a round is saved whenever it beats every earlier round. Ants of one
//! round are built in parallel; each draws from its own seed so a run is
//! reproducible for a given challenge seed.
//!
//! Hyperparameters (all optional):
//! * `num_ants`: tours built per round, default 100
//! * `initial_pheromone`: starting trail level, default 0.001
//! * `evaporation`: fraction of every trail lost per round, default 0.5
//! * `deposit`: pheromone spread over a tour, default 100
//! * `alpha`: weight of the trail, default 1
//! * `beta`: weight of the distance, default 5
//!
//! A round counts as one restart of the [`StopCondition`].
mod pheromone;

pub use pheromone::Pheromones;

use crate::{
    utils::{check_probability, merge_hyperparameters, score},
    StopCondition,
};
use anyhow::{anyhow, Result};
use log::{debug, info};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tsp_challenges::{graph::Graph, travelling_salesman::*};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub num_ants: usize,
    pub initial_pheromone: f64,
    pub evaporation: f64,
    pub deposit: f64,
    pub alpha: f64,
    pub beta: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_ants: 100,
            initial_pheromone: 0.001,
            evaporation: 0.5,
            deposit: 100.0,
            alpha: 1.0,
            beta: 5.0,
        }
    }
}

impl Config {
    pub fn initialize(hyperparameters: &Option<Map<String, Value>>) -> Result<Self> {
        let config: Self = merge_hyperparameters(&Self::default(), hyperparameters)?;
        if config.num_ants == 0 {
            return Err(anyhow!("Invalid hyperparameters: num_ants must be at least 1"));
        }
        check_probability("evaporation", config.evaporation)?;
        for (name, value) in [
            ("initial_pheromone", config.initial_pheromone),
            ("deposit", config.deposit),
            ("alpha", config.alpha),
            ("beta", config.beta),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(anyhow!(
                    "Invalid hyperparameters: {} must be a non-negative number, got {}",
                    name,
                    value
                ));
            }
        }
        Ok(config)
    }
}

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
    let graph = &challenge.graph;
    let budget = stop.start();
    let mut rng = SmallRng::from_seed(challenge.seed);
    let mut pheromones = Pheromones::new(graph.vertex_count(), config.initial_pheromone);
    let mut best_cost = f64::INFINITY;

    while let Some(round) = budget.next_restart() {
        let seeds: Vec<[u8; 32]> = (0..config.num_ants).map(|_| rng.gen()).collect();
        let ants: Vec<(Vec<usize>, f64)> = seeds
            .into_par_iter()
            .filter_map(|seed| {
                if budget.is_exhausted() {
                    return None;
                }
                let mut rng = SmallRng::from_seed(seed);
                let tour = construct_tour(graph, &pheromones, &config, &mut rng);
                let cost = score(graph, &tour);
                Some((tour, cost))
            })
            .collect();

        pheromones.evaporate(config.evaporation);
        for (tour, cost) in &ants {
            if cost.is_finite() && *cost > 0.0 {
                pheromones.deposit(tour, config.deposit / cost);
            }
        }

        if let Some((tour, cost)) = ants.iter().min_by(|a, b| a.1.total_cmp(&b.1)) {
            if *cost < best_cost {
                best_cost = *cost;
                info!("New best {} on round {}", cost, round);
                save_solution(&Solution {
                    route: tour.clone(),
                })?;
            }
        }
    }
    debug!(
        "Ant colony stopped after {} rounds in {:.3}s",
        budget.restarts(),
        budget.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Builds one ant's tour from a random starting vertex.
pub fn construct_tour<R: Rng + ?Sized>(
    graph: &Graph,
    pheromones: &Pheromones,
    config: &Config,
    rng: &mut R,
) -> Vec<usize> {
    let num_vertices = graph.vertex_count();
    let mut tour = Vec::with_capacity(num_vertices);
    if num_vertices == 0 {
        return tour;
    }
    let mut unvisited: Vec<usize> = (0..num_vertices).collect();
    let mut current = unvisited.swap_remove(rng.gen_range(0..num_vertices));
    tour.push(current);

    let mut desire = Vec::with_capacity(num_vertices);
    while !unvisited.is_empty() {
        desire.clear();
        desire.extend(
            unvisited
                .iter()
                .map(|&next| attractiveness(graph, pheromones, config, current, next)),
        );
        current = unvisited.swap_remove(roulette(&desire, rng));
        tour.push(current);
    }
    tour
}

// A missing edge is never chosen while any alternative has weight; a
// zero-length edge is always taken.
fn attractiveness(
    graph: &Graph,
    pheromones: &Pheromones,
    config: &Config,
    from: usize,
    to: usize,
) -> f64 {
    match graph.weight(from, to) {
        None => 0.0,
        Some(distance) if distance <= 0.0 => f64::INFINITY,
        Some(distance) => {
            pheromones.level(from, to).powf(config.alpha) * distance.powf(-config.beta)
        }
    }
}

/// Index drawn with probability proportional to its weight. An infinite
/// weight wins outright; if nothing carries weight the draw is uniform.
pub fn roulette<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> usize {
    if let Some(index) = weights.iter().position(|w| w.is_infinite()) {
        return index;
    }
    let total: f64 = weights.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        return rng.gen_range(0..weights.len());
    }
    let mut r = rng.gen::<f64>() * total;
    for (index, &weight) in weights.iter().enumerate() {
        if r < weight {
            return index;
        }
        r -= weight;
    }
    weights
        .iter()
        .rposition(|&weight| weight > 0.0)
        .unwrap_or(weights.len() - 1)
}
