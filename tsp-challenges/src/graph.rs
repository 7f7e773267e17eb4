use ahash::AHashMap;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub weight: f64,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, weight: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            weight,
        }
    }
}

/// Dense weight table over a fixed vertex set.
///
/// Every vertex label is given an alias in `0..vertex_count()` and weights are
/// stored row-major by alias. A cell that was never written holds `None`, so a
/// stored weight of `0.0` is a real zero-length edge rather than a missing one.
/// Symmetry is not enforced: the table holds exactly the ordered pairs it was
/// built from.
#[derive(Debug, Clone)]
pub struct Graph {
    labels: Vec<String>,
    aliases: AHashMap<String, usize>,
    weights: Vec<Option<f64>>,
}

impl Graph {
    /// Builds a graph from edge records. Labels get aliases in order of first
    /// appearance; a repeated ordered pair keeps the last weight seen.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = Edge>,
    {
        let mut labels: Vec<String> = Vec::new();
        let mut aliases: AHashMap<String, usize> = AHashMap::new();
        let mut alias_of = |label: String| -> usize {
            let next = labels.len();
            *aliases.entry(label).or_insert_with_key(|label| {
                labels.push(label.clone());
                next
            })
        };

        let resolved: Vec<(usize, usize, f64)> = edges
            .into_iter()
            .map(|edge| {
                let from = alias_of(edge.from);
                let to = alias_of(edge.to);
                (from, to, edge.weight)
            })
            .collect();

        let num_vertices = labels.len();
        let mut weights = vec![None; num_vertices * num_vertices];
        for (from, to, weight) in resolved {
            weights[from * num_vertices + to] = Some(weight);
        }

        Self {
            labels,
            aliases,
            weights,
        }
    }

    /// Builds the complete Euclidean graph over `positions`, self-pairs
    /// included. Aliases follow input order.
    pub fn from_positions(labels: &[String], positions: &[(f64, f64)]) -> Result<Self> {
        if labels.len() != positions.len() {
            return Err(anyhow!(
                "Number of labels ({}) does not match number of positions ({})",
                labels.len(),
                positions.len()
            ));
        }

        let mut aliases = AHashMap::with_capacity(labels.len());
        for (alias, label) in labels.iter().enumerate() {
            if aliases.insert(label.clone(), alias).is_some() {
                return Err(anyhow!("Vertex '{}' appears more than once", label));
            }
        }

        let weights = positions
            .iter()
            .flat_map(|&from| {
                positions.iter().map(move |&to| {
                    let dx = from.0 - to.0;
                    let dy = from.1 - to.1;
                    Some(dx.hypot(dy))
                })
            })
            .collect();

        Ok(Self {
            labels: labels.to_vec(),
            aliases,
            weights,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.labels.len()
    }

    pub fn vertices(&self) -> impl Iterator<Item = &str> + '_ {
        self.labels.iter().map(String::as_str)
    }

    pub fn alias_of(&self, label: &str) -> Option<usize> {
        self.aliases.get(label).copied()
    }

    pub fn label_of(&self, alias: usize) -> Option<&str> {
        self.labels.get(alias).map(String::as_str)
    }

    /// Weight of the ordered pair of aliases, `None` if there is no such edge.
    #[inline]
    pub fn weight(&self, from: usize, to: usize) -> Option<f64> {
        let n = self.labels.len();
        if from >= n || to >= n {
            return None;
        }
        self.weights[from * n + to]
    }

    pub fn weight_of_edge(&self, from: &str, to: &str) -> Option<f64> {
        self.weight(self.alias_of(from)?, self.alias_of(to)?)
    }
}
