use super::{
    config::{Improvement, Move},
    neighbourhood::{apply, pairs},
};
use crate::utils::score;
use tsp_challenges::{graph::Graph, route::Route};

#[derive(Debug, Clone)]
pub struct Descent {
    pub route: Route,
    pub cost: f64,
    /// Sweeps run, counting the final one that found nothing.
    pub sweeps: usize,
    /// Set when the stop check fired before a local optimum was reached.
    pub interrupted: bool,
}

/// One pass over the neighbourhood of `route`. Returns the adopted route and
/// its cost, or `None` if no neighbour is strictly cheaper than `cost`.
///
/// `should_stop` is polled before each row of pairs sharing a first position;
/// once it fires the pass ends early with whatever was adopted so far.
pub fn sweep(
    graph: &Graph,
    route: &Route,
    cost: f64,
    improvement: Improvement,
    mv: Move,
    should_stop: &dyn Fn() -> bool,
) -> Option<(Route, f64)> {
    let mut adopted: Option<(Route, f64)> = None;
    for (i, j) in pairs(route.step_count()) {
        if j == i + 1 && should_stop() {
            break;
        }
        let (base, base_cost) = match (&adopted, improvement) {
            (Some((adopted_route, adopted_cost)), Improvement::Greedy) => {
                (adopted_route, *adopted_cost)
            }
            (Some((_, adopted_cost)), Improvement::Steepest) => (route, *adopted_cost),
            (None, _) => (route, cost),
        };
        let candidate = apply(base, mv, i, j);
        let candidate_cost = score(graph, &candidate);
        if candidate_cost < base_cost {
            adopted = Some((candidate, candidate_cost));
        }
    }
    adopted
}

/// Sweeps from `route` until a sweep adopts nothing or `should_stop` fires.
pub fn descend(
    graph: &Graph,
    route: Route,
    improvement: Improvement,
    mv: Move,
    should_stop: &dyn Fn() -> bool,
) -> Descent {
    let mut cost = score(graph, &route);
    let mut route = route;
    let mut sweeps = 0;
    loop {
        if should_stop() {
            return Descent {
                route,
                cost,
                sweeps,
                interrupted: true,
            };
        }
        sweeps += 1;
        match sweep(graph, &route, cost, improvement, mv, should_stop) {
            Some((next_route, next_cost)) => {
                route = next_route;
                cost = next_cost;
            }
            None => {
                return Descent {
                    route,
                    cost,
                    sweeps,
                    interrupted: should_stop(),
                }
            }
        }
    }
}
