use crate::{RouteError, RouteResult};
use rand::{seq::SliceRandom, Rng};

/// An open, duplicate-free sequence of vertex aliases.
///
/// `positions[v]` is the index of vertex `v` in `steps`, kept alongside the
/// sequence so membership checks are O(1).
#[derive(Debug, Clone, Default)]
pub struct Route {
    steps: Vec<usize>,
    positions: Vec<Option<usize>>,
}

impl Route {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(num_vertices: usize) -> Self {
        Self {
            steps: Vec::with_capacity(num_vertices),
            positions: vec![None; num_vertices],
        }
    }

    /// Uniformly random permutation of `0..num_vertices`.
    pub fn random<R: Rng + ?Sized>(num_vertices: usize, rng: &mut R) -> Self {
        let mut steps: Vec<usize> = (0..num_vertices).collect();
        steps.shuffle(rng);
        Self::from_permutation(steps)
    }

    /// Appends `vertex` unless it is already on the route.
    pub fn add_step(&mut self, vertex: usize) -> bool {
        if self.contains(vertex) {
            return false;
        }
        if vertex >= self.positions.len() {
            self.positions.resize(vertex + 1, None);
        }
        self.positions[vertex] = Some(self.steps.len());
        self.steps.push(vertex);
        true
    }

    pub fn contains(&self, vertex: usize) -> bool {
        matches!(self.positions.get(vertex), Some(Some(_)))
    }

    pub fn position_of(&self, vertex: usize) -> Option<usize> {
        self.positions.get(vertex).copied().flatten()
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn start_step(&self) -> Option<usize> {
        self.steps.first().copied()
    }

    pub fn end_step(&self) -> Option<usize> {
        self.steps.last().copied()
    }

    pub fn step_at(&self, position: usize) -> Option<usize> {
        self.steps.get(position).copied()
    }

    pub fn steps(&self) -> &[usize] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<usize> {
        self.steps
    }

    /// New route with the vertices at positions `i` and `j` exchanged.
    ///
    /// Panics if either position is out of range.
    pub fn swapped(&self, i: usize, j: usize) -> Self {
        let mut route = self.clone();
        route.steps.swap(i, j);
        route.positions[route.steps[i]] = Some(i);
        route.positions[route.steps[j]] = Some(j);
        route
    }

    /// New route with the segment `i..=j` reversed (the classical 2-opt move).
    ///
    /// Panics if `i > j` or `j` is out of range.
    pub fn reversed(&self, i: usize, j: usize) -> Self {
        let mut route = self.clone();
        route.steps[i..=j].reverse();
        for position in i..=j {
            route.positions[route.steps[position]] = Some(position);
        }
        route
    }

    // Caller guarantees `steps` holds no duplicates.
    fn from_permutation(steps: Vec<usize>) -> Self {
        let num_slots = steps.iter().max().map_or(0, |&max| max + 1);
        let mut positions = vec![None; num_slots];
        for (position, &vertex) in steps.iter().enumerate() {
            positions[vertex] = Some(position);
        }
        Self { steps, positions }
    }
}

impl PartialEq for Route {
    fn eq(&self, other: &Self) -> bool {
        self.steps == other.steps
    }
}

impl Eq for Route {}

impl AsRef<[usize]> for Route {
    fn as_ref(&self) -> &[usize] {
        &self.steps
    }
}

impl TryFrom<Vec<usize>> for Route {
    type Error = RouteError;

    fn try_from(steps: Vec<usize>) -> RouteResult<Self> {
        let mut route = Route::with_capacity(steps.len());
        for vertex in steps {
            if !route.add_step(vertex) {
                return Err(RouteError::DuplicateStep { vertex });
            }
        }
        Ok(route)
    }
}
