use anyhow::Result;
use serde_json::json;
use std::cell::RefCell;
use tsp_algorithms::{get_algorithm, random_search, StopCondition, ALGORITHMS};
use tsp_challenges::travelling_salesman::{seed_from_u64, Challenge, Difficulty, Solution};

fn instance(size: usize, seed: u64) -> Challenge {
    Challenge::generate_instance(&seed_from_u64(seed), &Difficulty { size }).unwrap()
}

#[test]
fn test_random_search_reports_strict_improvements() {
    let challenge = instance(12, 21);
    let saved = RefCell::new(Vec::new());
    let save = |solution: &Solution| -> Result<()> {
        saved.borrow_mut().push(solution.clone());
        Ok(())
    };
    let stop = StopCondition::new().with_max_restarts(500);
    random_search::solve_challenge_with_stop(&challenge, &save, &None, &stop).unwrap();

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
fn test_random_search_rejects_hyperparameters() {
    let challenge = instance(5, 1);
    let save = |_: &Solution| -> Result<()> { Ok(()) };
    let params = json!({"num_workers": 2}).as_object().cloned();
    let stop = StopCondition::new().with_max_restarts(1);
    assert!(random_search::solve_challenge_with_stop(&challenge, &save, &params, &stop).is_err());
}

#[test]
fn test_registry() {
    assert_eq!(
        ALGORITHMS,
        ["ant_colony", "evolution", "local_search", "random_search"]
    );
    assert!(get_algorithm("simulated_annealing").is_none());

    let challenge = instance(8, 2);
    for name in ALGORITHMS {
        let solve = get_algorithm(name).unwrap();
        let saved = RefCell::new(Vec::new());
        let save = |solution: &Solution| -> Result<()> {
            saved.borrow_mut().push(solution.clone());
            Ok(())
        };
        let stop = StopCondition::new().with_max_restarts(3);
        solve(&challenge, &save, &None, &stop).unwrap();

        let saved = saved.into_inner();
        assert!(!saved.is_empty(), "{}", name);
        for solution in &saved {
            assert!(challenge.verify_solution(solution).is_ok(), "{}", name);
        }
    }
}
