//! Component names and the interaction alphabet of a search space.

use crate::error::TopologyError;
use crate::topology::Sign;

/// The fixed vocabulary topologies are built from.
///
/// The first component is the input species and the last is the output
/// species. `none` is always an implicit member of the alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    components: Vec<char>,
    alphabet: Vec<Sign>,
}

impl Grammar {
    pub fn new(components: Vec<char>, alphabet: Vec<Sign>) -> Result<Self, TopologyError> {
        if components.is_empty() {
            return Err(TopologyError::EmptyComponents);
        }
        for (i, &c) in components.iter().enumerate() {
            if !c.is_ascii_uppercase() {
                return Err(TopologyError::InvalidComponent(c));
            }
            if components[..i].contains(&c) {
                return Err(TopologyError::DuplicateComponent(c));
            }
        }
        if alphabet.is_empty() {
            return Err(TopologyError::EmptyAlphabet);
        }
        let mut alphabet = alphabet;
        alphabet.sort_unstable();
        alphabet.dedup();
        Ok(Self {
            components,
            alphabet,
        })
    }

    /// Build from configured names such as `["A", "B", "O"]` and
    /// `["activates", "inhibits"]`.
    pub fn from_names<S: AsRef<str>>(
        components: &[S],
        interactions: &[S],
    ) -> Result<Self, TopologyError> {
        let mut names = Vec::with_capacity(components.len());
        for name in components {
            let name = name.as_ref();
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => names.push(c),
                _ => return Err(TopologyError::InvalidComponent(name.chars().next().unwrap_or(' '))),
            }
        }
        let alphabet = interactions
            .iter()
            .map(|s| Sign::from_name(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(names, alphabet)
    }

    /// The three-component `{A, B, O}` grammar with both signs.
    pub fn three_node() -> Self {
        Self {
            components: vec!['A', 'B', 'O'],
            alphabet: vec![Sign::Activates, Sign::Inhibits],
        }
    }

    pub fn components(&self) -> &[char] {
        &self.components
    }

    pub fn alphabet(&self) -> &[Sign] {
        &self.alphabet
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Ordered component pairs an edge may join: every `(src, dst)` with
    /// `src != dst` in lexicographic order, then the self-pairs.
    pub fn ordered_pairs(&self) -> Vec<(usize, usize)> {
        let n = self.components.len();
        let mut pairs = Vec::with_capacity(n * n);
        for src in 0..n {
            for dst in 0..n {
                if src != dst {
                    pairs.push((src, dst));
                }
            }
        }
        pairs.extend((0..n).map(|i| (i, i)));
        pairs
    }
}
