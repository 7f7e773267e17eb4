use anyhow::Result;
use serde_json::{Map, Value};
use tsp_challenges::travelling_salesman::{Challenge, Solution};

pub mod ant_colony;
pub mod evolution;
pub mod local_search;
pub mod random_search;
mod stop;
pub use stop::StopCondition;
mod utils;
pub use utils::score;

pub type SolveFn = fn(
    &Challenge,
    &dyn Fn(&Solution) -> Result<()>,
    &Option<Map<String, Value>>,
    &StopCondition,
) -> Result<()>;

pub const ALGORITHMS: [&str; 4] = ["ant_colony", "evolution", "local_search", "random_search"];

pub fn get_algorithm(name: &str) -> Option<SolveFn> {
    match name {
        "ant_colony" => Some(ant_colony::solve_challenge_with_stop),
        "evolution" => Some(evolution::solve_challenge_with_stop),
        "local_search" => Some(local_search::solve_challenge_with_stop),
        "random_search" => Some(random_search::solve_challenge_with_stop),
        _ => None,
    }
}
