//! Exhaustive enumeration of the topology space.
//!
//! Every ordered component pair takes one action from `[none, alphabet..]`.
//! Assignments are visited in mixed-radix order (last pair varies fastest),
//! and an assignment is kept when its edges form one weakly connected graph.
//! The empty topology is appended last as an always-valid member.

use crate::error::TopologyError;
use crate::grammar::Grammar;
use crate::topology::{EdgeKey, Interaction, Topology};
use std::collections::HashMap;
use tracing::info;

/// Dense index of a member of a [`TopologySet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TopologyId(pub u32);

impl TopologyId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The immutable set of admissible topologies for one grammar.
#[derive(Debug, Clone)]
pub struct TopologySet {
    grammar: Grammar,
    members: Vec<Topology>,
    pub(crate) index: HashMap<EdgeKey, TopologyId>,
}

impl TopologySet {
    /// Enumerate every weakly connected topology of `grammar`.
    pub fn enumerate(grammar: Grammar) -> Result<Self, TopologyError> {
        let pairs = grammar.ordered_pairs();
        let radix = grammar.alphabet().len() + 1;
        let total = u32::try_from(pairs.len())
            .ok()
            .and_then(|p| (radix as u64).checked_pow(p))
            .filter(|&t| t <= u32::MAX as u64)
            .ok_or(TopologyError::EnumerationTooLarge {
                components: grammar.len(),
            })?;

        let mut members = Vec::new();
        let mut digits = vec![0usize; pairs.len()];
        for _ in 0..total {
            let edges: Vec<Interaction> = pairs
                .iter()
                .zip(&digits)
                .filter(|(_, &d)| d > 0)
                .map(|(&(source, target), &d)| Interaction {
                    source,
                    target,
                    sign: grammar.alphabet()[d - 1],
                })
                .collect();
            let topology = Topology::new(grammar.components().to_vec(), edges);
            if topology.is_weakly_connected() {
                members.push(topology);
            }
            advance(&mut digits, radix);
        }
        members.push(Topology::empty(grammar.components().to_vec()));

        let index = members
            .iter()
            .enumerate()
            .map(|(i, t)| (t.edge_key(), TopologyId(i as u32)))
            .collect();

        info!(
            components = grammar.len(),
            raw = total,
            members = members.len(),
            "Enumerated topology set"
        );

        Ok(Self {
            grammar,
            members,
            index,
        })
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Number of members, including the empty topology.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Look up a member by id.
    pub fn get(&self, id: TopologyId) -> Option<&Topology> {
        self.members.get(id.index())
    }

    /// Id of the empty topology.
    pub fn empty_id(&self) -> TopologyId {
        TopologyId(self.members.len() as u32 - 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TopologyId, &Topology)> {
        self.members
            .iter()
            .enumerate()
            .map(|(i, t)| (TopologyId(i as u32), t))
    }
}

/// Increment a little-endian-at-the-back mixed-radix counter.
fn advance(digits: &mut [usize], radix: usize) {
    for d in digits.iter_mut().rev() {
        *d += 1;
        if *d < radix {
            return;
        }
        *d = 0;
    }
}
