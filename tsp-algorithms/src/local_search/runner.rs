use super::{config::Config, descent::descend};
use crate::stop::{Budget, StopCondition};
use anyhow::Result;
use log::{debug, info};
use rand::{rngs::SmallRng, SeedableRng};
use std::sync::mpsc::{self, Receiver, Sender};
use tsp_challenges::{
    route::Route,
    travelling_salesman::{Challenge, Solution},
};

struct LocalOptimum {
    worker: usize,
    restart: u64,
    route: Route,
    cost: f64,
}

pub struct Solver<'a> {
    challenge: &'a Challenge,
    config: Config,
}

impl<'a> Solver<'a> {
    pub fn new(challenge: &'a Challenge, config: Config) -> Self {
        Self { challenge, config }
    }

    /// Runs restart chains until `stop` fires and returns the best tour seen.
    ///
    /// Chains run on the rayon pool and only report their local optima; the
    /// calling thread owns the global best and calls `save_solution` for every
    /// strict improvement. An error from `save_solution` stops all chains and
    /// is returned.
    pub fn run(
        &self,
        save_solution: &dyn Fn(&Solution) -> Result<()>,
        stop: &StopCondition,
    ) -> Result<Option<(Solution, f64)>> {
        let budget = stop.start();
        let (sender, receiver) = mpsc::channel::<LocalOptimum>();

        rayon::in_place_scope(|s| {
            for worker in 0..self.config.num_workers {
                let sender = sender.clone();
                let budget = &budget;
                s.spawn(move |_| self.run_chain(worker, budget, sender));
            }
            drop(sender);
            self.collect(receiver, save_solution, &budget)
        })
    }

    fn collect(
        &self,
        receiver: Receiver<LocalOptimum>,
        save_solution: &dyn Fn(&Solution) -> Result<()>,
        budget: &Budget,
    ) -> Result<Option<(Solution, f64)>> {
        let mut best: Option<(Solution, f64)> = None;
        for optimum in receiver {
            let improved = optimum.cost.is_finite()
                && best
                    .as_ref()
                    .map_or(true, |(_, best_cost)| optimum.cost < *best_cost);
            if !improved {
                continue;
            }

            info!(
                "New best {} from worker {} on restart {} after {:.3}s",
                optimum.cost,
                optimum.worker,
                optimum.restart,
                budget.elapsed().as_secs_f64()
            );
            let solution = Solution::from(optimum.route);
            if let Err(e) = save_solution(&solution) {
                budget.abort();
                return Err(e);
            }
            best = Some((solution, optimum.cost));
        }

        debug!(
            "Search stopped after {} restarts in {:.3}s",
            budget.restarts(),
            budget.elapsed().as_secs_f64()
        );
        Ok(best)
    }

    fn run_chain(&self, worker: usize, budget: &Budget, sender: Sender<LocalOptimum>) {
        let graph = &self.challenge.graph;
        let mut rng = SmallRng::from_seed(worker_seed(&self.challenge.seed, worker));

        while let Some(restart) = budget.next_restart() {
            let initial = Route::random(graph.vertex_count(), &mut rng);
            let descent = descend(
                graph,
                initial,
                self.config.improvement,
                self.config.neighbourhood,
                &|| budget.is_exhausted(),
            );
            debug!(
                "Worker {} restart {}: cost {} after {} sweeps{}",
                worker,
                restart,
                descent.cost,
                descent.sweeps,
                if descent.interrupted { " (interrupted)" } else { "" }
            );

            let interrupted = descent.interrupted;
            let optimum = LocalOptimum {
                worker,
                restart,
                route: descent.route,
                cost: descent.cost,
            };
            if sender.send(optimum).is_err() || interrupted {
                break;
            }
        }
    }
}

// Worker 0 draws from the challenge seed itself.
fn worker_seed(seed: &[u8; 32], worker: usize) -> [u8; 32] {
    let mut seed = *seed;
    for (byte, w) in seed.iter_mut().zip((worker as u64).to_le_bytes()) {
        *byte ^= w;
    }
    seed
}
