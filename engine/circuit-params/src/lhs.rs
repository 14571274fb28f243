//! Latin hypercube sampling on the unit cube.
//!
//! Each axis is cut into `points` equal strata. A random permutation assigns
//! every point its own stratum on that axis, and the point is jittered
//! uniformly inside it, so every projection onto one axis hits each stratum
//! exactly once.

use rand::seq::SliceRandom;
use rand::Rng;

/// Unit-cube design of `points` samples over `axes` dimensions.
#[derive(Debug, Clone)]
pub struct LatinHypercube {
    points: usize,
    axes: usize,
    /// Point-major: `values[p * axes + a]`.
    values: Vec<f64>,
}

impl LatinHypercube {
    /// Draw a design. Axes are filled in order, each from a fresh
    /// permutation followed by `points` jitter draws.
    pub fn sample<R: Rng>(points: usize, axes: usize, rng: &mut R) -> Self {
        let mut values = vec![0.0; points * axes];
        let mut strata: Vec<usize> = (0..points).collect();
        let scale = 1.0 / points as f64;
        for a in 0..axes {
            strata.shuffle(rng);
            for (p, &s) in strata.iter().enumerate() {
                let jitter: f64 = rng.gen();
                values[p * axes + a] = (s as f64 + jitter) * scale;
            }
        }
        Self {
            points,
            axes,
            values,
        }
    }

    pub fn points(&self) -> usize {
        self.points
    }

    pub fn axes(&self) -> usize {
        self.axes
    }

    /// Coordinates of point `p`.
    pub fn point(&self, p: usize) -> &[f64] {
        &self.values[p * self.axes..(p + 1) * self.axes]
    }

    /// Stratum of point `p` on axis `a`.
    pub fn stratum(&self, p: usize, a: usize) -> usize {
        let s = (self.values[p * self.axes + a] * self.points as f64).floor() as usize;
        s.min(self.points - 1)
    }
}
