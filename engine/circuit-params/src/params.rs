//! Kinetic parameter sets.
//!
//! A set for `m` species holds `k_cat` and `K_threshold`, each indexed by
//! `(direction, target, regulator)` with direction 0 for activation and 1
//! for inhibition. Both matrices are `(m+1) x (m+1)`; column `m` is the
//! environmental column used by the input channel and the basal terms.

use crate::error::ParamsError;
use circuit_core::Sign;
use nalgebra::DMatrix;

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    species: usize,
    k_cat: [DMatrix<f64>; 2],
    k_threshold: [DMatrix<f64>; 2],
}

impl ParameterSet {
    /// Build a set, checking shapes and that every entry is finite and positive.
    pub fn new(
        species: usize,
        k_cat: [DMatrix<f64>; 2],
        k_threshold: [DMatrix<f64>; 2],
    ) -> Result<Self, ParamsError> {
        let dim = species + 1;
        for m in k_cat.iter().chain(k_threshold.iter()) {
            if m.nrows() != dim || m.ncols() != dim {
                return Err(ParamsError::InvalidShape {
                    expected: dim,
                    rows: m.nrows(),
                    cols: m.ncols(),
                });
            }
            if let Some(&bad) = m.iter().find(|v| !(v.is_finite() && **v > 0.0)) {
                return Err(ParamsError::NonPositive(bad));
            }
        }
        Ok(Self {
            species,
            k_cat,
            k_threshold,
        })
    }

    /// Every entry set to the same rate and threshold.
    pub fn uniform(species: usize, rate: f64, threshold: f64) -> Self {
        let dim = species + 1;
        Self {
            species,
            k_cat: [
                DMatrix::from_element(dim, dim, rate),
                DMatrix::from_element(dim, dim, rate),
            ],
            k_threshold: [
                DMatrix::from_element(dim, dim, threshold),
                DMatrix::from_element(dim, dim, threshold),
            ],
        }
    }

    /// Override one `(sign, target, regulator)` entry.
    pub fn with_entry(
        mut self,
        sign: Sign,
        target: usize,
        regulator: usize,
        rate: f64,
        threshold: f64,
    ) -> Self {
        let d = sign.direction();
        self.k_cat[d][(target, regulator)] = rate;
        self.k_threshold[d][(target, regulator)] = threshold;
        self
    }

    /// Number of species the set was drawn for.
    #[inline]
    pub fn species(&self) -> usize {
        self.species
    }

    /// Matrix side length (`species + 1`).
    #[inline]
    pub fn dim(&self) -> usize {
        self.species + 1
    }

    /// Index of the environmental column.
    #[inline]
    pub fn environment(&self) -> usize {
        self.species
    }

    #[inline]
    pub fn rate(&self, sign: Sign, target: usize, regulator: usize) -> f64 {
        self.k_cat[sign.direction()][(target, regulator)]
    }

    #[inline]
    pub fn threshold(&self, sign: Sign, target: usize, regulator: usize) -> f64 {
        self.k_threshold[sign.direction()][(target, regulator)]
    }

    pub fn k_cat(&self) -> &[DMatrix<f64>; 2] {
        &self.k_cat
    }

    pub fn k_threshold(&self) -> &[DMatrix<f64>; 2] {
        &self.k_threshold
    }
}
