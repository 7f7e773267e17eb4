use anyhow::{anyhow, Result};
use clap::{arg, Command};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{
    cell::RefCell,
    fs,
    io::Read,
    path::{Path, PathBuf},
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tsp_algorithms::{get_algorithm, StopCondition, ALGORITHMS};
use tsp_challenges::{
    loader::{read_nodes, DEFAULT_HEADER_LINES},
    travelling_salesman::{seed_from_u64, Challenge, Solution},
};

/// Tour as written to `--output` and read back by `verify_solution`.
#[derive(Serialize, Deserialize, Debug)]
struct LabelledRoute {
    #[serde(default, skip_deserializing)]
    cost: f64,
    route: Vec<String>,
}

fn cli() -> Command {
    Command::new("tsp-runtime")
        .about("Searches for or verifies closed tours over a set of 2D points")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("compute_solution")
                .about("Runs a search and prints every improvement")
                .arg(
                    arg!(<INPUT> "Path to a csv file of `label,x,y` records")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--algorithm [ALGORITHM] "Search algorithm")
                        .default_value("local_search")
                        .value_parser(clap::builder::PossibleValuesParser::new(ALGORITHMS)),
                )
                .arg(
                    arg!(--hyperparameters [HYPERPARAMETERS] "Hyperparameters json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--restarts [RESTARTS] "Maximum number of restarts, iterations, rounds or generations")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--timeout [SECONDS] "Wall clock limit in seconds")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    arg!(--seed [SEED] "Random seed (defaults to the current time)")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--headers [HEADERS] "Number of preamble lines to skip in INPUT (default 3)")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--output [OUTPUT_FILE] "If set, the best tour is saved to this file path as json")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("verify_solution")
                .about("Checks a tour and prints its cost")
                .arg(
                    arg!(<INPUT> "Path to a csv file of `label,x,y` records")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(<SOLUTION> "Solution json string, path to json file, or '-' for stdin")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--headers [HEADERS] "Number of preamble lines to skip in INPUT (default 3)")
                        .value_parser(clap::value_parser!(usize)),
                ),
        )
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("compute_solution", sub_m)) => compute_solution(
            sub_m.get_one::<PathBuf>("INPUT").unwrap().clone(),
            sub_m.get_one::<String>("algorithm").unwrap().clone(),
            sub_m.get_one::<String>("hyperparameters").cloned(),
            sub_m.get_one::<u64>("restarts").copied(),
            sub_m.get_one::<f64>("timeout").copied(),
            sub_m.get_one::<u64>("seed").copied(),
            sub_m
                .get_one::<usize>("headers")
                .copied()
                .unwrap_or(DEFAULT_HEADER_LINES),
            sub_m.get_one::<PathBuf>("output").cloned(),
        ),
        Some(("verify_solution", sub_m)) => verify_solution(
            sub_m.get_one::<PathBuf>("INPUT").unwrap().clone(),
            sub_m.get_one::<String>("SOLUTION").unwrap().clone(),
            sub_m
                .get_one::<usize>("headers")
                .copied()
                .unwrap_or(DEFAULT_HEADER_LINES),
        ),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

pub fn compute_solution(
    input: PathBuf,
    algorithm: String,
    hyperparameters: Option<String>,
    max_restarts: Option<u64>,
    timeout: Option<f64>,
    seed: Option<u64>,
    header_lines: usize,
    output_file: Option<PathBuf>,
) -> Result<()> {
    let solve_challenge = get_algorithm(&algorithm)
        .ok_or_else(|| anyhow!("Unknown algorithm '{}'", algorithm))?;
    let stop = stop_condition(max_restarts, timeout)?;
    let hyperparameters = hyperparameters
        .as_deref()
        .map(load_hyperparameters)
        .transpose()?;

    let seed = match seed {
        Some(seed) => seed,
        None => SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos() as u64,
    };
    info!("Using seed {}", seed);
    let challenge = load_challenge(&input, header_lines, seed)?;

    let best = RefCell::new(None::<(Solution, f64)>);
    let improvements = RefCell::new(0usize);
    let save_solution = |solution: &Solution| -> Result<()> {
        let cost = challenge.verify_solution(solution)?;
        *improvements.borrow_mut() += 1;
        println!(
            "{}: {} [{}]",
            improvements.borrow(),
            cost,
            challenge.labels_of(&solution.route).collect::<Vec<_>>().join(", ")
        );
        *best.borrow_mut() = Some((solution.clone(), cost));
        Ok(())
    };
    solve_challenge(&challenge, &save_solution, &hyperparameters, &stop)?;

    let (solution, cost) = best
        .into_inner()
        .ok_or_else(|| anyhow!("No solution found"))?;
    println!("Best: {}", cost);
    if let Some(path) = output_file {
        let output = LabelledRoute {
            cost,
            route: challenge
                .labels_of(&solution.route)
                .map(str::to_string)
                .collect(),
        };
        fs::write(&path, serde_json::to_string_pretty(&output)?)
            .map_err(|e| anyhow!("Failed to write '{}': {}", path.display(), e))?;
        println!("Solution written to: {:?}", path);
    }
    Ok(())
}

pub fn verify_solution(input: PathBuf, solution: String, header_lines: usize) -> Result<()> {
    let labelled = load_solution(&solution)?;
    let challenge = load_challenge(&input, header_lines, 0)?;
    let solution = challenge.solution_from_labels(&labelled.route)?;
    let cost = challenge.verify_solution(&solution)?;
    println!("Solution is valid. Cost: {}", cost);
    Ok(())
}

fn load_challenge(input: &Path, header_lines: usize, seed: u64) -> Result<Challenge> {
    let nodes = read_nodes(input, header_lines)?;
    debug!("Read {} vertices from {}", nodes.len(), input.display());
    Challenge::from_nodes(&seed_from_u64(seed), nodes)
}

fn stop_condition(max_restarts: Option<u64>, timeout: Option<f64>) -> Result<StopCondition> {
    if max_restarts.is_none() && timeout.is_none() {
        return Err(anyhow!("At least one of --restarts or --timeout is required"));
    }
    let mut stop = StopCondition::new();
    if let Some(max_restarts) = max_restarts {
        stop = stop.with_max_restarts(max_restarts);
    }
    if let Some(timeout) = timeout {
        let timeout = Duration::try_from_secs_f64(timeout)
            .map_err(|_| anyhow!("Invalid timeout '{}'", timeout))?;
        stop = stop.with_timeout(timeout);
    }
    Ok(stop)
}

fn read_argument(value: &str, what: &str) -> Result<String> {
    if value == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow!("Failed to read {} from stdin: {}", what, e))?;
        Ok(buffer)
    } else if value.ends_with(".json") {
        fs::read_to_string(value)
            .map_err(|e| anyhow!("Failed to read {} file '{}': {}", what, value, e))
    } else {
        Ok(value.to_string())
    }
}

fn load_hyperparameters(hyperparameters: &str) -> Result<Map<String, Value>> {
    let hyperparameters = read_argument(hyperparameters, "hyperparameters")?;
    serde_json::from_str(&hyperparameters)
        .map_err(|e| anyhow!("Failed to parse hyperparameters: {}", e))
}

fn load_solution(solution: &str) -> Result<LabelledRoute> {
    let solution = read_argument(solution, "solution")?;
    serde_json::from_str(&solution).map_err(|e| anyhow!("Failed to parse solution: {}", e))
}
