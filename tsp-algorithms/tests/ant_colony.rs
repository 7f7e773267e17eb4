use anyhow::Result;
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::{json, Map, Value};
use std::{
    cell::RefCell,
    time::{Duration, Instant},
};
use tsp_algorithms::{
    ant_colony::{construct_tour, roulette, solve_challenge_with_stop, Config, Pheromones},
    StopCondition,
};
use tsp_challenges::{
    graph::{Edge, Graph},
    loader::NodeInfo,
    travelling_salesman::{seed_from_u64, Challenge, Difficulty, Solution},
};

fn hyperparameters(value: Value) -> Option<Map<String, Value>> {
    value.as_object().cloned()
}

fn record<'a>(saved: &'a RefCell<Vec<Solution>>) -> impl Fn(&Solution) -> Result<()> + 'a {
    move |solution: &Solution| {
        saved.borrow_mut().push(solution.clone());
        Ok(())
    }
}

fn instance(size: usize, seed: u64) -> Challenge {
    Challenge::generate_instance(&seed_from_u64(seed), &Difficulty { size }).unwrap()
}

fn sorted(mut route: Vec<usize>) -> Vec<usize> {
    route.sort();
    route
}

#[test]
fn test_pheromone_trails() {
    let mut pheromones = Pheromones::new(4, 1.0);
    pheromones.evaporate(0.25);
    assert_eq!(pheromones.level(0, 3), 0.75);

    pheromones.deposit(&[2, 0, 3, 1], 0.5);
    for (a, b) in [(2, 0), (0, 3), (3, 1), (1, 2)] {
        assert_eq!(pheromones.level(a, b), 1.25);
        assert_eq!(pheromones.level(b, a), 1.25);
    }
    assert_eq!(pheromones.level(0, 1), 0.75);
    assert_eq!(pheromones.level(2, 3), 0.75);

    pheromones.deposit(&[], 10.0);
    assert_eq!(pheromones.level(0, 1), 0.75);
}

#[test]
fn test_roulette() {
    let mut rng = SmallRng::seed_from_u64(3);
    for _ in 0..100 {
        assert_eq!(roulette(&[0.0, 2.0, 0.0], &mut rng), 1);
        assert_eq!(roulette(&[1.0, f64::INFINITY, 5.0], &mut rng), 1);
        assert!(roulette(&[0.0, 0.0], &mut rng) < 2);
    }

    let mut counts = [0; 2];
    for _ in 0..10_000 {
        counts[roulette(&[1.0, 3.0], &mut rng)] += 1;
    }
    assert!(counts[1] > 2 * counts[0], "{:?}", counts);
}

#[test]
fn test_tours_are_permutations() {
    let challenge = instance(30, 1);
    let pheromones = Pheromones::new(30, 0.001);
    let config = Config::default();
    let mut rng = SmallRng::seed_from_u64(4);
    for _ in 0..10 {
        let tour = construct_tour(&challenge.graph, &pheromones, &config, &mut rng);
        assert_eq!(sorted(tour), (0..30).collect::<Vec<_>>());
    }

    let empty = Graph::from_edges(Vec::new());
    let pheromones = Pheromones::new(0, 0.001);
    assert!(construct_tour(&empty, &pheromones, &config, &mut rng).is_empty());
}

#[test]
fn test_missing_edges_are_avoided() {
    // Only the cycle A-B-C-D-A exists.
    let graph = Graph::from_edges(
        [("A", "B"), ("B", "C"), ("C", "D"), ("D", "A")]
            .iter()
            .flat_map(|&(a, b)| vec![Edge::new(a, b, 1.0), Edge::new(b, a, 1.0)]),
    );
    let pheromones = Pheromones::new(4, 1.0);
    let config = Config::default();
    let mut rng = SmallRng::seed_from_u64(8);
    for _ in 0..20 {
        let tour = construct_tour(&graph, &pheromones, &config, &mut rng);
        for w in tour.windows(2) {
            assert!(graph.weight(w[0], w[1]).is_some(), "{:?}", tour);
        }
    }
}

#[test]
fn test_reports_strict_improvements() {
    let challenge = instance(20, 5);
    let saved = RefCell::new(Vec::new());
    let stop = StopCondition::new().with_max_restarts(15);
    let params = hyperparameters(json!({"num_ants": 10}));
    solve_challenge_with_stop(&challenge, &record(&saved), &params, &stop).unwrap();

    let saved = saved.into_inner();
    assert!(!saved.is_empty());
    let mut last = f64::INFINITY;
    for solution in &saved {
        let cost = challenge.verify_solution(solution).unwrap();
        assert!(cost < last);
        last = cost;
    }
}

#[test]
fn test_finds_small_optimum() {
    let nodes = vec![
        NodeInfo { name: "a".into(), x: 0.0, y: 0.0 },
        NodeInfo { name: "b".into(), x: 0.0, y: 0.0 },
        NodeInfo { name: "c".into(), x: 3.0, y: 4.0 },
        NodeInfo { name: "d".into(), x: 3.0, y: 0.0 },
    ];
    let challenge = Challenge::from_nodes(&seed_from_u64(2), nodes).unwrap();
    let saved = RefCell::new(Vec::new());
    let stop = StopCondition::new().with_max_restarts(10);
    let params = hyperparameters(json!({"num_ants": 10}));
    solve_challenge_with_stop(&challenge, &record(&saved), &params, &stop).unwrap();

    let best = saved.into_inner().pop().unwrap();
    assert_eq!(challenge.verify_solution(&best).unwrap(), 12.0);
}

#[test]
fn test_same_seed_same_run() {
    let challenge = instance(15, 9);
    let run = || {
        let saved = RefCell::new(Vec::new());
        let stop = StopCondition::new().with_max_restarts(8);
        let params = hyperparameters(json!({"num_ants": 12, "beta": 2.0}));
        solve_challenge_with_stop(&challenge, &record(&saved), &params, &stop).unwrap();
        saved.into_inner()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_timeout_ends_a_round() {
    let challenge = instance(400, 10);
    let saved = RefCell::new(Vec::new());
    let stop = StopCondition::new().with_timeout(Duration::from_millis(100));
    let started = Instant::now();
    solve_challenge_with_stop(&challenge, &record(&saved), &None, &stop).unwrap();
    let elapsed = started.elapsed();

    assert!(elapsed < Duration::from_secs(5), "took {:?}", elapsed);
    for solution in saved.borrow().iter() {
        assert!(challenge.verify_solution(solution).is_ok());
    }
}

#[test]
fn test_config_from_hyperparameters() {
    assert_eq!(Config::initialize(&None).unwrap(), Config::default());
    assert_eq!(Config::default().num_ants, 100);

    let config = Config::initialize(&hyperparameters(json!({
        "num_ants": 5,
        "evaporation": 0.1,
        "alpha": 2.0
    })))
    .unwrap();
    assert_eq!(config.num_ants, 5);
    assert_eq!(config.evaporation, 0.1);
    assert_eq!(config.alpha, 2.0);
    assert_eq!(config.beta, 5.0);

    assert!(Config::initialize(&hyperparameters(json!({"num_ants": 0}))).is_err());
    assert!(Config::initialize(&hyperparameters(json!({"evaporation": 1.5}))).is_err());
    assert!(Config::initialize(&hyperparameters(json!({"beta": -1.0}))).is_err());
    assert!(Config::initialize(&hyperparameters(json!({"ants": 5}))).is_err());
}
