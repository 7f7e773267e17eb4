//! Generational evolutionary search.
//!
//! Parents are picked by tournament, paired children come from order
//! crossover, and each child may be replaced by a fresh random tour or
//! mutated by swapping two of its vertices. The next population keeps the
//! `elite_size` cheapest tours of the current one and fills the rest with
//! children chosen at random.
//!
//! Hyperparameters (all optional):
//! * `population_size`: default 100, at least 2
//! * `tournament_size`: candidates per parent selection, default 2
//! * `elite_size`: tours carried over unchanged, default 10, below `population_size`
//! * `mutation_probability`: default 0.7
//! * `regeneration_probability`: chance a child is replaced by a random tour, default 0.05
//!
//! A generation counts as one restart of the [`StopCondition`].
use crate::{
    stop::Budget,
    utils::{check_probability, merge_hyperparameters, score},
    StopCondition,
};
use anyhow::{anyhow, Result};
use log::{debug, info};
use rand::{
    rngs::SmallRng,
    seq::{index, SliceRandom},
    Rng, SeedableRng,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tsp_challenges::{graph::Graph, travelling_salesman::*};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub population_size: usize,
    pub tournament_size: usize,
    pub elite_size: usize,
    pub mutation_probability: f64,
    pub regeneration_probability: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            population_size: 100,
            tournament_size: 2,
            elite_size: 10,
            mutation_probability: 0.7,
            regeneration_probability: 0.05,
        }
    }
}

impl Config {
    pub fn initialize(hyperparameters: &Option<Map<String, Value>>) -> Result<Self> {
        let config: Self = merge_hyperparameters(&Self::default(), hyperparameters)?;
        if config.population_size < 2 {
            return Err(anyhow!(
                "Invalid hyperparameters: population_size must be at least 2"
            ));
        }
        if config.tournament_size == 0 || config.tournament_size > config.population_size {
            return Err(anyhow!(
                "Invalid hyperparameters: tournament_size must be between 1 and population_size"
            ));
        }
        if config.elite_size >= config.population_size {
            return Err(anyhow!(
                "Invalid hyperparameters: elite_size must be below population_size"
            ));
        }
        check_probability("mutation_probability", config.mutation_probability)?;
        check_probability("regeneration_probability", config.regeneration_probability)?;
        Ok(config)
    }
}

#[derive(Debug, Clone)]
struct Individual {
    route: Vec<usize>,
    cost: f64,
}

impl Individual {
    fn new(graph: &Graph, route: Vec<usize>) -> Self {
        let cost = score(graph, &route);
        Self { route, cost }
    }

    fn random<R: Rng + ?Sized>(graph: &Graph, rng: &mut R) -> Self {
        let mut route: Vec<usize> = (0..graph.vertex_count()).collect();
        route.shuffle(rng);
        Self::new(graph, route)
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
    let mut population: Vec<Individual> = (0..config.population_size)
        .map(|_| Individual::random(graph, &mut rng))
        .collect();
    let mut best_cost = f64::INFINITY;

    while let Some(generation) = budget.next_restart() {
        let children = breed(graph, &population, &config, &budget, &mut rng);
        population = select_next(population, children, &config, &mut rng);

        if let Some(best) = population.iter().min_by(|a, b| a.cost.total_cmp(&b.cost)) {
            if best.cost < best_cost {
                best_cost = best.cost;
                info!("New best {} in generation {}", best.cost, generation);
                save_solution(&Solution {
                    route: best.route.clone(),
                })?;
            }
        }
    }
    debug!(
        "Evolution stopped after {} generations in {:.3}s",
        budget.restarts(),
        budget.elapsed().as_secs_f64()
    );
    Ok(())
}

fn breed<R: Rng + ?Sized>(
    graph: &Graph,
    population: &[Individual],
    config: &Config,
    budget: &Budget,
    rng: &mut R,
) -> Vec<Individual> {
    let num_vertices = graph.vertex_count();
    let mut children = Vec::with_capacity(config.population_size + 1);
    while children.len() < config.population_size && !budget.is_exhausted() {
        let first = tournament(population, config.tournament_size, rng);
        let second = tournament(population, config.tournament_size, rng);
        let start = rng.gen_range(0..num_vertices.max(1));
        let length = rng.gen_range(0..num_vertices.max(1));

        for (a, b) in [(first, second), (second, first)] {
            let mut route = order_crossover(&a.route, &b.route, start, length);
            if rng.gen_bool(config.regeneration_probability) {
                route.shuffle(rng);
            }
            if num_vertices > 1 && rng.gen_bool(config.mutation_probability) {
                let i = rng.gen_range(0..num_vertices);
                let j = rng.gen_range(0..num_vertices);
                route.swap(i, j);
            }
            children.push(Individual::new(graph, route));
        }
    }
    children.truncate(config.population_size);
    children
}

fn select_next<R: Rng + ?Sized>(
    mut population: Vec<Individual>,
    mut children: Vec<Individual>,
    config: &Config,
    rng: &mut R,
) -> Vec<Individual> {
    population.sort_by(|a, b| a.cost.total_cmp(&b.cost));
    let mut survivors = population.split_off(config.elite_size);
    let mut next = population;

    children.shuffle(rng);
    children.truncate(config.population_size - config.elite_size);
    next.append(&mut children);

    // Only short when breeding was cut off by the stop condition.
    let missing = config.population_size - next.len();
    survivors.truncate(missing);
    next.append(&mut survivors);
    next
}

/// Cheapest of `size` distinct members drawn at random.
fn tournament<'a, R: Rng + ?Sized>(
    population: &'a [Individual],
    size: usize,
    rng: &mut R,
) -> &'a Individual {
    index::sample(rng, population.len(), size)
        .iter()
        .map(|i| &population[i])
        .min_by(|a, b| a.cost.total_cmp(&b.cost))
        .unwrap_or(&population[0])
}

/// Order crossover (OX1) of two tours over the same vertices.
///
/// The child copies the `length` positions of `first` starting at `start`
/// (wrapping around the end), then fills the remaining positions in order,
/// starting right after the copied segment, with the vertices of `second` not
/// yet used, read from the same point onwards.
pub fn order_crossover(
    first: &[usize],
    second: &[usize],
    start: usize,
    length: usize,
) -> Vec<usize> {
    let n = first.len();
    if n == 0 {
        return Vec::new();
    }
    let length = length.min(n);
    let mut child = vec![0; n];
    let mut used = vec![false; n];
    for k in 0..length {
        let position = (start + k) % n;
        child[position] = first[position];
        used[first[position]] = true;
    }

    let mut position = (start + length) % n;
    for k in 0..n {
        let vertex = second[(start + length + k) % n];
        if !used[vertex] {
            used[vertex] = true;
            child[position] = vertex;
            position = (position + 1) % n;
        }
    }
    child
}
