//! Shrinking heuristic for dual coordinate descent
//!
//! Variables sitting at the lower bound whose gradient exceeds the largest
//! projected gradient of the previous pass are unlikely to move, so they
//! are swapped out of the active range. When the active problem converges
//! every variable is reactivated and checked once more on the full problem.

/// Linear congruential generator used for reproducible coordinate order
pub(crate) fn rng_next(state: &mut u64) -> usize {
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    (*state >> 33) as usize
}

/// Active variable set with its shrinking bound
#[derive(Debug)]
pub struct ActiveSet {
    index: Vec<usize>,
    active_size: usize,
    pg_max_old: f64,
    rng_state: u64,
}

impl ActiveSet {
    /// Create an active set over `n` variables
    pub fn new(n: usize, seed: u64) -> Self {
        Self {
            index: (0..n).collect(),
            active_size: n,
            pg_max_old: f64::INFINITY,
            rng_state: seed,
        }
    }

    /// Number of variables currently active
    pub fn len(&self) -> usize {
        self.active_size
    }

    pub fn is_empty(&self) -> bool {
        self.active_size == 0
    }

    /// Whether no variable is currently shrunk
    pub fn is_full(&self) -> bool {
        self.active_size == self.index.len()
    }

    /// Variable at position `s` of the active range
    pub fn get(&self, s: usize) -> usize {
        self.index[s]
    }

    /// Randomly permute the active range
    pub fn shuffle(&mut self) {
        for i in 0..self.active_size {
            let j = i + rng_next(&mut self.rng_state) % (self.active_size - i);
            self.index.swap(i, j);
        }
    }

    /// Whether a variable at its lower bound with gradient `g` should be shrunk
    pub fn should_shrink(&self, g: f64) -> bool {
        g > self.pg_max_old
    }

    /// Remove the variable at position `s`; the last active variable takes its place
    pub fn shrink(&mut self, s: usize) {
        self.active_size -= 1;
        self.index.swap(s, self.active_size);
    }

    /// Record the largest projected gradient observed in the last pass
    pub fn update_bound(&mut self, pg_max: f64) {
        self.pg_max_old = if pg_max <= 0.0 { f64::INFINITY } else { pg_max };
    }

    /// Bring every shrunk variable back and reset the bounds
    pub fn reactivate(&mut self) {
        self.active_size = self.index.len();
        self.pg_max_old = f64::INFINITY;
    }
}
