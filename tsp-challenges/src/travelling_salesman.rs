use crate::{graph::Graph, loader::NodeInfo, route::Route, RouteError, RouteResult};
use anyhow::{anyhow, Result};
use logging_timer::time;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Serialize, Deserialize, Debug, Copy, Clone)]
pub struct Difficulty {
    pub size: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Solution {
    pub route: Vec<usize>,
}

impl Solution {
    pub fn new() -> Self {
        Self { route: Vec::new() }
    }
}

impl From<Route> for Solution {
    fn from(route: Route) -> Self {
        Self {
            route: route.into_steps(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Challenge {
    pub seed: [u8; 32],
    pub nodes: Vec<NodeInfo>,
    pub graph: Graph,
}

/// Expands a numeric seed into the 32-byte form challenges carry.
pub fn seed_from_u64(seed: u64) -> [u8; 32] {
    SmallRng::seed_from_u64(seed).gen()
}

impl Challenge {
    pub fn generate_instance(seed: &[u8; 32], difficulty: &Difficulty) -> Result<Self> {
        if difficulty.size < 1 {
            return Err(anyhow!("Size must be at least 1"));
        }
        let mut rng = SmallRng::from_seed(seed.clone());
        let num_nodes = difficulty.size;

        let mut nodes: Vec<NodeInfo> = Vec::with_capacity(num_nodes);
        let mut node_positions_set: HashSet<(i32, i32)> = HashSet::with_capacity(num_nodes);
        while nodes.len() < num_nodes {
            let pos: (i32, i32) = (rng.gen_range(0..=1000), rng.gen_range(0..=1000));
            if !node_positions_set.insert(pos) {
                continue;
            }
            nodes.push(NodeInfo {
                name: (nodes.len() + 1).to_string(),
                x: pos.0 as f64,
                y: pos.1 as f64,
            });
        }

        Self::from_nodes(seed, nodes)
    }

    #[time]
    pub fn from_nodes(seed: &[u8; 32], nodes: Vec<NodeInfo>) -> Result<Self> {
        let labels: Vec<String> = nodes.iter().map(|node| node.name.clone()).collect();
        let positions: Vec<(f64, f64)> = nodes.iter().map(|node| (node.x, node.y)).collect();
        let graph = Graph::from_positions(&labels, &positions)?;
        Ok(Self {
            seed: seed.clone(),
            nodes,
            graph,
        })
    }

    pub fn num_nodes(&self) -> usize {
        self.graph.vertex_count()
    }

    /// Closed-tour cost of `route` as given; duplicates are not checked here.
    pub fn evaluate(&self, route: &[usize]) -> RouteResult<f64> {
        cost_of_route(&self.graph, route)
    }

    pub fn calc_total_distance(&self, solution: &Solution) -> Result<f64> {
        let num_nodes = self.num_nodes();
        if let Some(&node) = solution.route.iter().find(|&&node| node >= num_nodes) {
            return Err(anyhow!("Route contains invalid node '{}'", node));
        }
        let route = Route::try_from(solution.route.clone())?;
        Ok(self.evaluate(route.steps())?)
    }

    /// Checks that `solution` is a complete tour and returns its cost.
    pub fn verify_solution(&self, solution: &Solution) -> Result<f64> {
        self.calc_total_distance(solution)
    }

    pub fn labels_of<'a>(&'a self, route: &'a [usize]) -> impl Iterator<Item = &'a str> + 'a {
        route
            .iter()
            .map(move |&alias| self.graph.label_of(alias).unwrap_or("?"))
    }

    pub fn solution_from_labels<S: AsRef<str>>(&self, labels: &[S]) -> Result<Solution> {
        let route = labels
            .iter()
            .map(|label| {
                self.graph
                    .alias_of(label.as_ref())
                    .ok_or_else(|| anyhow!("Unknown vertex '{}'", label.as_ref()))
            })
            .collect::<Result<Vec<usize>>>()?;
        Ok(Solution { route })
    }
}

/// Total weight of `route` read as a closed cycle, last step back to the first.
///
/// The route must visit every vertex of `graph`; an empty route over an empty
/// graph costs `0.0`.
pub fn cost_of_route(graph: &Graph, route: &[usize]) -> RouteResult<f64> {
    if route.len() != graph.vertex_count() {
        return Err(RouteError::IncompleteRoute {
            expected: graph.vertex_count(),
            actual: route.len(),
        });
    }
    let (first, last) = match (route.first(), route.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Ok(0.0),
    };
    let edge = |from: usize, to: usize| {
        graph
            .weight(from, to)
            .ok_or(RouteError::MissingEdge { from, to })
    };

    let mut total_distance = 0.0;
    for w in route.windows(2) {
        total_distance += edge(w[0], w[1])?;
    }
    Ok(total_distance + edge(last, first)?)
}
