/// Trail levels on the edges of a complete graph, kept symmetric.
#[derive(Debug, Clone, PartialEq)]
pub struct Pheromones {
    num_vertices: usize,
    levels: Vec<f64>,
}

impl Pheromones {
    pub fn new(num_vertices: usize, initial: f64) -> Self {
        Self {
            num_vertices,
            levels: vec![initial; num_vertices * num_vertices],
        }
    }

    #[inline]
    pub fn level(&self, from: usize, to: usize) -> f64 {
        self.levels[from * self.num_vertices + to]
    }

    /// Removes `rate` of every trail.
    pub fn evaporate(&mut self, rate: f64) {
        let keep = 1.0 - rate;
        self.levels.iter_mut().for_each(|level| *level *= keep);
    }

    /// Adds `amount` to every edge of `tour` read as a closed cycle.
    pub fn deposit(&mut self, tour: &[usize], amount: f64) {
        let (first, last) = match (tour.first(), tour.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => return,
        };
        for w in tour.windows(2) {
            self.add(w[0], w[1], amount);
        }
        self.add(last, first, amount);
    }

    fn add(&mut self, a: usize, b: usize, amount: f64) {
        let n = self.num_vertices;
        self.levels[a * n + b] += amount;
        if a != b {
            self.levels[b * n + a] += amount;
        }
    }
}
