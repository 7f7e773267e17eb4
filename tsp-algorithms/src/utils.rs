use anyhow::{anyhow, Result};
use log::debug;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use tsp_challenges::{graph::Graph, travelling_salesman::cost_of_route};

/// Cost of `route` as a closed tour, or infinity if it is not a valid tour so
/// that it is never preferred over a valid one.
pub fn score<R: AsRef<[usize]> + ?Sized>(graph: &Graph, route: &R) -> f64 {
    match cost_of_route(graph, route.as_ref()) {
        Ok(cost) => cost,
        Err(e) => {
            debug!("Skipping candidate: {}", e);
            f64::INFINITY
        }
    }
}

/// Overlays `hyperparameters` on the serialised `defaults` and reads the
/// result back, so unknown keys and mistyped values surface as errors.
pub(crate) fn merge_hyperparameters<T>(
    defaults: &T,
    hyperparameters: &Option<Map<String, Value>>,
) -> Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let mut merged_params = serde_json::to_value(defaults)?;
    if let (Value::Object(ref mut obj), Some(map)) = (&mut merged_params, hyperparameters) {
        for (k, v) in map {
            obj.insert(k.clone(), v.clone());
        }
    }
    serde_json::from_value(merged_params).map_err(|e| anyhow!("Invalid hyperparameters: {}", e))
}

pub(crate) fn check_probability(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(anyhow!(
            "Invalid hyperparameters: {} must be between 0 and 1, got {}",
            name,
            value
        ))
    }
}
