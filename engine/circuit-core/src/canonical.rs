//! Mapping engine states onto members of the enumerated set.
//!
//! Two states name the same topology when they declare the same components
//! and the same edge multiset; token order and component-prefix order are
//! irrelevant. Component identity is kept, since the first and last
//! components carry the input and output roles.

use crate::enumerate::{TopologyId, TopologySet};
use crate::error::TopologyError;
use crate::topology::Topology;

/// A state resolved to a member of a [`TopologySet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canonical {
    pub id: TopologyId,
    /// Whether the state carried the terminal marker.
    pub terminal: bool,
}

impl TopologySet {
    /// Resolve an already parsed topology.
    pub fn lookup(&self, topology: &Topology) -> Result<TopologyId, TopologyError> {
        let expected = self.grammar_set();
        let found = topology.component_set();
        if expected != found {
            return Err(TopologyError::ComponentMismatch { expected, found });
        }
        self.index
            .get(&topology.edge_key())
            .copied()
            .ok_or_else(|| TopologyError::CanonicalizationMiss(topology.to_string()))
    }

    /// Parse a state string and resolve it to its canonical member.
    pub fn canonicalize(&self, state: &str) -> Result<Canonical, TopologyError> {
        let topology: Topology = state.parse()?;
        let id = self.lookup(&topology)?;
        Ok(Canonical {
            id,
            terminal: topology.is_terminal(),
        })
    }

    /// The canonical string of a member.
    pub fn canonical_string(&self, id: TopologyId) -> Option<String> {
        self.get(id).map(Topology::to_string)
    }

    fn grammar_set(&self) -> String {
        let mut names = self.grammar().components().to_vec();
        names.sort_unstable();
        names.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Grammar, TopologyError, TopologySet};

    fn set() -> TopologySet {
        let g = Grammar::new(
            vec!['A', 'O'],
            vec![crate::Sign::Activates, crate::Sign::Inhibits],
        )
        .unwrap();
        TopologySet::enumerate(g).unwrap()
    }

    #[test]
    fn test_order_independent() {
        let set = set();
        let a = set.canonicalize("AO::AOa_OAi").unwrap();
        let b = set.canonicalize("OA::OAi_AOa").unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(set.canonical_string(a.id).unwrap(), "AO::AOa_OAi");
    }

    #[test]
    fn test_idempotent() {
        let set = set();
        for (id, member) in set.iter() {
            let again = set.canonicalize(&member.to_string()).unwrap();
            assert_eq!(again.id, id);
        }
    }

    #[test]
    fn test_terminal_flag_is_reported() {
        let set = set();
        let c = set.canonicalize("*AO::AOa").unwrap();
        assert!(c.terminal);
        assert_eq!(c.id, set.canonicalize("AO::AOa").unwrap().id);
    }

    #[test]
    fn test_miss_is_an_error() {
        let set = set();
        // Two signs on the same pair never appear in the set.
        assert!(matches!(
            set.canonicalize("AO::AOa_AOi"),
            Err(TopologyError::CanonicalizationMiss(_))
        ));
    }

    #[test]
    fn test_component_mismatch() {
        let set = set();
        assert_eq!(
            set.canonicalize("ABO::AOa").err(),
            Some(TopologyError::ComponentMismatch {
                expected: "AO".into(),
                found: "ABO".into()
            })
        );
    }

    #[test]
    fn test_empty_state_resolves() {
        let set = set();
        assert_eq!(set.canonicalize("AO::").unwrap().id, set.empty_id());
    }
}
