//! Local species numbering of a network.
//!
//! Global slots are positions in the grammar's component list. A network
//! only simulates some of them: the growing model keeps the components that
//! appear in edges, the fixed-size model keeps all of them. Local indices
//! follow global order, so the input species, when present, is local 0.

use crate::topology::Topology;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesMap {
    /// `globals[local] = global`, strictly increasing.
    globals: Vec<usize>,
    /// `locals[global] = Some(local)` for simulated species.
    locals: Vec<Option<usize>>,
}

impl SpeciesMap {
    fn from_mask(mask: &[bool]) -> Self {
        let globals: Vec<usize> = (0..mask.len()).filter(|&g| mask[g]).collect();
        let mut locals = vec![None; mask.len()];
        for (local, &global) in globals.iter().enumerate() {
            locals[global] = Some(local);
        }
        Self { globals, locals }
    }

    /// Species that appear in at least one edge.
    pub fn active(topology: &Topology) -> Self {
        let mut mask = vec![false; topology.components().len()];
        for e in topology.edges() {
            mask[e.source] = true;
            mask[e.target] = true;
        }
        Self::from_mask(&mask)
    }

    /// Every declared component.
    pub fn full(topology: &Topology) -> Self {
        Self::from_mask(&vec![true; topology.components().len()])
    }

    /// Number of simulated species.
    pub fn len(&self) -> usize {
        self.globals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.globals.is_empty()
    }

    /// Number of global slots.
    pub fn slots(&self) -> usize {
        self.locals.len()
    }

    #[inline]
    pub fn global(&self, local: usize) -> usize {
        self.globals[local]
    }

    #[inline]
    pub fn local(&self, global: usize) -> Option<usize> {
        self.locals.get(global).copied().flatten()
    }

    pub fn contains(&self, global: usize) -> bool {
        self.local(global).is_some()
    }

    /// Global slots in local order.
    pub fn globals(&self) -> &[usize] {
        &self.globals
    }
}
