//! Pre-drawn parameter pools, one per species count.

use crate::config::SamplingConfig;
use crate::error::ParamsError;
use crate::lhs::LatinHypercube;
use crate::params::ParameterSet;
use crate::seeds::{stream_rng, Domain};
use nalgebra::DMatrix;
use tracing::{debug, info};

/// `pool_size` parameter sets for networks of one size.
#[derive(Debug, Clone)]
pub struct ParameterPool {
    species: usize,
    sets: Vec<ParameterSet>,
}

impl ParameterPool {
    /// Draw a pool for `species` species.
    ///
    /// One hypercube covers every matrix entry: `2 kinds x 2 directions x
    /// (species+1)^2` axes. Kind 0 is `k_cat`, kind 1 is `K_threshold`.
    pub fn generate(
        species: usize,
        config: &SamplingConfig,
        seed: u64,
    ) -> Result<Self, ParamsError> {
        config.validate()?;
        let dim = species + 1;
        let per_matrix = dim * dim;
        let axes = 4 * per_matrix;

        let mut rng = stream_rng(seed, Domain::ParameterPool, species as u64);
        let design = LatinHypercube::sample(config.pool_size, axes, &mut rng);

        let to_log = |u: f64, [lo, hi]: [f64; 2]| 10f64.powf(lo + u * (hi - lo));
        let mut sets = Vec::with_capacity(config.pool_size);
        for p in 0..design.points() {
            let point = design.point(p);
            // nalgebra is column-major; axes are laid out (target, regulator) row-major.
            let matrix = |block: usize, range: [f64; 2]| {
                let base = block * per_matrix;
                DMatrix::from_fn(dim, dim, |i, j| to_log(point[base + i * dim + j], range))
            };
            let k_cat = [
                matrix(0, config.rate_log_range),
                matrix(1, config.rate_log_range),
            ];
            let k_threshold = [
                matrix(2, config.threshold_log_range),
                matrix(3, config.threshold_log_range),
            ];
            sets.push(ParameterSet::new(species, k_cat, k_threshold)?);
        }

        debug!(species, axes, points = sets.len(), "Drew parameter pool");
        Ok(Self { species, sets })
    }

    pub fn species(&self) -> usize {
        self.species
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn get(&self, slot: usize) -> Result<&ParameterSet, ParamsError> {
        self.sets.get(slot).ok_or(ParamsError::SlotOutOfRange {
            slot,
            pool_size: self.sets.len(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParameterSet> {
        self.sets.iter()
    }
}

/// Pools for every species count `1..=max_species`.
#[derive(Debug, Clone)]
pub struct ParameterPools {
    pools: Vec<ParameterPool>,
}

impl ParameterPools {
    pub fn generate(
        max_species: usize,
        config: &SamplingConfig,
        seed: u64,
    ) -> Result<Self, ParamsError> {
        let pools = (1..=max_species)
            .map(|m| ParameterPool::generate(m, config, seed))
            .collect::<Result<Vec<_>, _>>()?;
        info!(
            max_species,
            pool_size = config.pool_size,
            seed,
            "Generated parameter pools"
        );
        Ok(Self { pools })
    }

    /// Largest species count covered.
    pub fn max_species(&self) -> usize {
        self.pools.len()
    }

    /// Pool for networks of `species` species.
    pub fn pool(&self, species: usize) -> Result<&ParameterPool, ParamsError> {
        species
            .checked_sub(1)
            .and_then(|i| self.pools.get(i))
            .ok_or(ParamsError::NoPool {
                species,
                max: self.pools.len(),
            })
    }

    /// Parameter set at `slot` of the `species` pool.
    pub fn get(&self, species: usize, slot: usize) -> Result<&ParameterSet, ParamsError> {
        self.pool(species)?.get(slot)
    }
}
