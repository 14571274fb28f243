//! Sampled solutions of a network.

use nalgebra::DMatrix;

/// Species levels sampled on a time grid.
///
/// Stored as a `points x species` matrix, so each species' series is one
/// contiguous column.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    times: Vec<f64>,
    states: DMatrix<f64>,
}

impl Trajectory {
    /// Build from row-major samples (`rows[p * species + s]`).
    pub fn from_rows(times: Vec<f64>, species: usize, rows: &[f64]) -> Self {
        let states = DMatrix::from_row_slice(times.len(), species, rows);
        Self { times, states }
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn species(&self) -> usize {
        self.states.ncols()
    }

    /// Time series of one species.
    pub fn series(&self, species: usize) -> &[f64] {
        let n = self.states.nrows();
        &self.states.as_slice()[species * n..(species + 1) * n]
    }

    /// Levels of every species at sample `p`.
    pub fn state(&self, p: usize) -> Vec<f64> {
        self.states.row(p).iter().copied().collect()
    }

    /// Levels at the final sample.
    pub fn final_state(&self) -> Vec<f64> {
        match self.len() {
            0 => Vec::new(),
            n => self.state(n - 1),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.states.iter().all(|v| v.is_finite())
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.states
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let t = Trajectory::from_rows(vec![0.0, 1.0, 2.0], 2, &[1.0, 10.0, 2.0, 20.0, 3.0, 30.0]);
        assert_eq!(t.len(), 3);
        assert_eq!(t.species(), 2);
        assert_eq!(t.series(0), &[1.0, 2.0, 3.0]);
        assert_eq!(t.series(1), &[10.0, 20.0, 30.0]);
        assert_eq!(t.state(1), vec![2.0, 20.0]);
        assert_eq!(t.final_state(), vec![3.0, 30.0]);
        assert!(t.is_finite());
    }
}
