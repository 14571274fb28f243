//! Compilation of a topology into per-species regulator lists.

use crate::error::DynamicsError;
use circuit_core::{Sign, SpeciesMap, Topology};
use circuit_params::ParameterSet;

/// A topology in local species numbering, ready for simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct RegulatoryNetwork {
    species: SpeciesMap,
    /// `activators[target]` lists local regulator indices.
    activators: Vec<Vec<usize>>,
    inhibitors: Vec<Vec<usize>>,
    input: Option<usize>,
    output: Option<usize>,
}

impl RegulatoryNetwork {
    /// Compile `topology` over the species selected by `species`.
    pub fn compile(topology: &Topology, species: SpeciesMap) -> Result<Self, DynamicsError> {
        let n = species.len();
        let mut activators = vec![Vec::new(); n];
        let mut inhibitors = vec![Vec::new(); n];
        for e in topology.edges() {
            let local = |global: usize| {
                species
                    .local(global)
                    .ok_or(DynamicsError::UnmappedSpecies(topology.component(global)))
            };
            let (src, dst) = (local(e.source)?, local(e.target)?);
            match e.sign {
                Sign::Activates => activators[dst].push(src),
                Sign::Inhibits => inhibitors[dst].push(src),
            }
        }
        let input = species.local(topology.input());
        let output = species.local(topology.output());
        Ok(Self {
            species,
            activators,
            inhibitors,
            input,
            output,
        })
    }

    /// Simulate only the components that appear in edges.
    pub fn growing(topology: &Topology) -> Result<Self, DynamicsError> {
        Self::compile(topology, SpeciesMap::active(topology))
    }

    /// Simulate every declared component.
    pub fn fixed(topology: &Topology) -> Result<Self, DynamicsError> {
        Self::compile(topology, SpeciesMap::full(topology))
    }

    /// Number of simulated species.
    pub fn species_count(&self) -> usize {
        self.species.len()
    }

    pub fn species(&self) -> &SpeciesMap {
        &self.species
    }

    /// Local index of the input species, if simulated.
    pub fn input(&self) -> Option<usize> {
        self.input
    }

    /// Local index of the output species, if simulated.
    pub fn output(&self) -> Option<usize> {
        self.output
    }

    pub fn activators(&self, target: usize) -> &[usize] {
        &self.activators[target]
    }

    pub fn inhibitors(&self, target: usize) -> &[usize] {
        &self.inhibitors[target]
    }

    /// Check that `params` was drawn for this many species and that every
    /// regulator addresses a simulated species.
    pub fn check(&self, params: &ParameterSet) -> Result<(), DynamicsError> {
        let n = self.species_count();
        if params.species() != n {
            return Err(DynamicsError::DimensionMismatch {
                network: n,
                params: params.species(),
            });
        }
        let lists = self.activators.iter().enumerate();
        for (target, regs) in lists.chain(self.inhibitors.iter().enumerate()) {
            if let Some(&regulator) = regs.iter().find(|&&r| r >= n) {
                return Err(DynamicsError::RegulatorOutOfRange {
                    target,
                    regulator,
                    species: n,
                });
            }
        }
        Ok(())
    }
}
