//! The signed regulatory graph and its string form.
//!
//! A topology is written `<components>::<tokens>`, for example
//! `ABO::AOa_OBa_BOi`. Each token is `<source><target><sign>` where the sign
//! is `a` (activates) or `i` (inhibits). A leading `*` marks the topology as
//! terminal. Parsing and `Display` are the only string handling in the crate.

use crate::error::TopologyError;
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

/// Regulation sign of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sign {
    Activates,
    Inhibits,
}

impl Sign {
    /// Token character used in the string form.
    pub fn code(self) -> char {
        match self {
            Sign::Activates => 'a',
            Sign::Inhibits => 'i',
        }
    }

    pub fn from_code(c: char) -> Option<Self> {
        match c {
            'a' => Some(Sign::Activates),
            'i' => Some(Sign::Inhibits),
            _ => None,
        }
    }

    /// Parse a configured interaction name.
    pub fn from_name(name: &str) -> Result<Self, TopologyError> {
        match name {
            "activates" => Ok(Sign::Activates),
            "inhibits" => Ok(Sign::Inhibits),
            other => Err(TopologyError::UnknownInteraction(other.to_string())),
        }
    }

    /// Direction index into the parameter matrices (0 activation, 1 inhibition).
    #[inline]
    pub fn direction(self) -> usize {
        match self {
            Sign::Activates => 0,
            Sign::Inhibits => 1,
        }
    }
}

/// A directed, signed edge between two declared components.
///
/// `source` and `target` index into [`Topology::components`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interaction {
    pub source: usize,
    pub target: usize,
    pub sign: Sign,
}

/// A regulatory network topology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    components: Vec<char>,
    edges: Vec<Interaction>,
    terminal: bool,
}

/// Order-independent identity of a topology's edge multiset.
pub type EdgeKey = Vec<(char, char, char)>;

impl Topology {
    /// Build a topology from validated parts.
    ///
    /// Every edge endpoint must index into `components`.
    pub fn new(components: Vec<char>, edges: Vec<Interaction>) -> Self {
        debug_assert!(edges
            .iter()
            .all(|e| e.source < components.len() && e.target < components.len()));
        Self {
            components,
            edges,
            terminal: false,
        }
    }

    /// The topology with no edges over `components`.
    pub fn empty(components: Vec<char>) -> Self {
        Self::new(components, Vec::new())
    }

    pub fn components(&self) -> &[char] {
        &self.components
    }

    pub fn edges(&self) -> &[Interaction] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn with_terminal(mut self, terminal: bool) -> Self {
        self.terminal = terminal;
        self
    }

    /// Name of component `index`.
    #[inline]
    pub fn component(&self, index: usize) -> char {
        self.components[index]
    }

    /// Position of a named component.
    pub fn index_of(&self, name: char) -> Option<usize> {
        self.components.iter().position(|&c| c == name)
    }

    /// The input species is the first declared component.
    pub fn input(&self) -> usize {
        0
    }

    /// The output species is the last declared component.
    pub fn output(&self) -> usize {
        self.components.len().saturating_sub(1)
    }

    /// Sorted edge tokens; equal for two topologies with the same edge
    /// multiset regardless of token or prefix order.
    pub fn edge_key(&self) -> EdgeKey {
        let mut key: EdgeKey = self
            .edges
            .iter()
            .map(|e| {
                (
                    self.components[e.source],
                    self.components[e.target],
                    e.sign.code(),
                )
            })
            .collect();
        key.sort_unstable();
        key
    }

    /// Declared components in sorted order, for comparing component sets.
    pub fn component_set(&self) -> String {
        let mut names = self.components.clone();
        names.sort_unstable();
        names.into_iter().collect()
    }

    /// Whether a directed path leads from `from` to `to`.
    ///
    /// A component reaches itself only through a cycle or self-loop.
    pub fn has_path(&self, from: usize, to: usize) -> bool {
        let n = self.components.len();
        if from >= n || to >= n {
            return false;
        }
        let mut seen = vec![false; n];
        let mut queue = VecDeque::new();
        queue.push_back(from);
        while let Some(node) = queue.pop_front() {
            for e in self.edges.iter().filter(|e| e.source == node) {
                if e.target == to {
                    return true;
                }
                if !seen[e.target] {
                    seen[e.target] = true;
                    queue.push_back(e.target);
                }
            }
        }
        false
    }

    /// Whether the input signal can reach the output species.
    pub fn has_signal_path(&self) -> bool {
        !self.edges.is_empty() && self.has_path(self.input(), self.output())
    }

    /// Whether every edge of `motif` (matched by component name and sign)
    /// also appears in this topology.
    pub fn contains_motif(&self, motif: &Topology) -> bool {
        let mut available = self.edge_key();
        for edge in motif.edge_key() {
            match available.iter().position(|e| *e == edge) {
                Some(i) => {
                    available.swap_remove(i);
                }
                None => return false,
            }
        }
        true
    }

    /// Whether the edges form one weakly connected graph over the components
    /// they touch. The empty topology is not connected.
    pub fn is_weakly_connected(&self) -> bool {
        let n = self.components.len();
        let mut parent: Vec<usize> = (0..n).collect();
        fn find(parent: &mut [usize], mut x: usize) -> usize {
            while parent[x] != x {
                parent[x] = parent[parent[x]];
                x = parent[x];
            }
            x
        }

        let mut used = vec![false; n];
        for e in &self.edges {
            used[e.source] = true;
            used[e.target] = true;
            let a = find(&mut parent, e.source);
            let b = find(&mut parent, e.target);
            if a != b {
                parent[a] = b;
            }
        }

        let mut roots = (0..n).filter(|&i| used[i]).map(|i| find(&mut parent, i));
        match roots.next() {
            Some(first) => roots.all(|r| r == first),
            None => false,
        }
    }
}

impl FromStr for Topology {
    type Err = TopologyError;

    fn from_str(state: &str) -> Result<Self, Self::Err> {
        let (terminal, body) = match state.strip_prefix('*') {
            Some(rest) => (true, rest),
            None => (false, state),
        };
        let (prefix, tokens) = body
            .split_once("::")
            .ok_or_else(|| TopologyError::MissingSeparator(state.to_string()))?;

        let mut components = Vec::with_capacity(prefix.len());
        for c in prefix.chars() {
            if !c.is_ascii_uppercase() {
                return Err(TopologyError::InvalidComponent(c));
            }
            if components.contains(&c) {
                return Err(TopologyError::DuplicateComponent(c));
            }
            components.push(c);
        }
        if components.is_empty() {
            return Err(TopologyError::EmptyComponents);
        }

        let mut edges = Vec::new();
        if !tokens.is_empty() {
            for token in tokens.split('_') {
                let chars: Vec<char> = token.chars().collect();
                let [src, dst, sign] = chars[..] else {
                    return Err(TopologyError::TokenLength(token.to_string()));
                };
                let lookup = |c: char| {
                    components
                        .iter()
                        .position(|&n| n == c)
                        .ok_or_else(|| TopologyError::UnknownComponent {
                            token: token.to_string(),
                            component: c,
                        })
                };
                let source = lookup(src)?;
                let target = lookup(dst)?;
                let sign = Sign::from_code(sign).ok_or_else(|| TopologyError::UnknownSign {
                    token: token.to_string(),
                    sign,
                })?;
                edges.push(Interaction {
                    source,
                    target,
                    sign,
                });
            }
        }

        Ok(Topology {
            components,
            edges,
            terminal,
        })
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terminal {
            f.write_str("*")?;
        }
        for c in &self.components {
            write!(f, "{c}")?;
        }
        f.write_str("::")?;
        for (i, e) in self.edges.iter().enumerate() {
            if i > 0 {
                f.write_str("_")?;
            }
            write!(
                f,
                "{}{}{}",
                self.components[e.source],
                self.components[e.target],
                e.sign.code()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let t: Topology = "ABO::AOa_OBa_BOi".parse().unwrap();
        assert_eq!(t.components(), &['A', 'B', 'O']);
        assert_eq!(t.edges().len(), 3);
        assert_eq!(
            t.edges()[2],
            Interaction {
                source: 1,
                target: 2,
                sign: Sign::Inhibits
            }
        );
        assert!(!t.is_terminal());
        assert_eq!(t.to_string(), "ABO::AOa_OBa_BOi");
    }

    #[test]
    fn test_terminal_marker() {
        let t: Topology = "*ABO::AOa".parse().unwrap();
        assert!(t.is_terminal());
        assert_eq!(t.to_string(), "*ABO::AOa");
        assert_eq!(t.with_terminal(false).to_string(), "ABO::AOa");
    }

    #[test]
    fn test_empty_edges() {
        let t: Topology = "ABO::".parse().unwrap();
        assert!(t.is_empty());
        assert!(!t.has_signal_path());
        assert!(!t.is_weakly_connected());
        assert_eq!(t.to_string(), "ABO::");
    }

    #[test]
    fn test_malformed_states() {
        assert!(matches!(
            "ABO:AOa".parse::<Topology>(),
            Err(TopologyError::MissingSeparator(_))
        ));
        assert!(matches!(
            "ABO::AO".parse::<Topology>(),
            Err(TopologyError::TokenLength(_))
        ));
        assert!(matches!(
            "ABO::AOa__BOi".parse::<Topology>(),
            Err(TopologyError::TokenLength(_))
        ));
        assert_eq!(
            "ABO::AXa".parse::<Topology>(),
            Err(TopologyError::UnknownComponent {
                token: "AXa".into(),
                component: 'X'
            })
        );
        assert_eq!(
            "ABO::AOz".parse::<Topology>(),
            Err(TopologyError::UnknownSign {
                token: "AOz".into(),
                sign: 'z'
            })
        );
        assert_eq!(
            "AbO::AOa".parse::<Topology>(),
            Err(TopologyError::InvalidComponent('b'))
        );
        assert_eq!(
            "AAO::AOa".parse::<Topology>(),
            Err(TopologyError::DuplicateComponent('A'))
        );
        assert_eq!("::".parse::<Topology>(), Err(TopologyError::EmptyComponents));
    }

    #[test]
    fn test_edge_key_ignores_order() {
        let a: Topology = "ABO::AOa_OBa_BOi".parse().unwrap();
        let b: Topology = "OBA::BOi_AOa_OBa".parse().unwrap();
        assert_eq!(a.edge_key(), b.edge_key());
        assert_eq!(a.component_set(), b.component_set());
    }

    #[test]
    fn test_signal_path() {
        let direct: Topology = "ABO::AOa".parse().unwrap();
        assert!(direct.has_signal_path());

        let relay: Topology = "ABO::ABa_BOi".parse().unwrap();
        assert!(relay.has_signal_path());

        let backwards: Topology = "ABO::OAa_BBi".parse().unwrap();
        assert!(!backwards.has_signal_path());

        let self_loop: Topology = "ABO::AAa".parse().unwrap();
        assert!(self_loop.has_path(0, 0));
        assert!(!self_loop.has_path(1, 1));
    }

    #[test]
    fn test_contains_motif() {
        let t: Topology = "ABO::AOa_OBa_BOi_AAi".parse().unwrap();
        let feedback: Topology = "ABO::OBa_BOi".parse().unwrap();
        let feedforward: Topology = "ABO::ABa_BOi".parse().unwrap();
        assert!(t.contains_motif(&feedback));
        assert!(!t.contains_motif(&feedforward));
        assert!(t.contains_motif(&Topology::empty(vec!['A', 'B', 'O'])));
    }

    #[test]
    fn test_weak_connectivity() {
        let linked: Topology = "ABO::ABa_OBi".parse().unwrap();
        assert!(linked.is_weakly_connected());

        let split: Topology = "ABO::AAa_BOi".parse().unwrap();
        assert!(!split.is_weakly_connected());

        // Unused components do not break connectivity.
        let partial: Topology = "ABO::AOa".parse().unwrap();
        assert!(partial.is_weakly_connected());
    }

    #[test]
    fn test_sign_names() {
        assert_eq!(Sign::from_name("activates"), Ok(Sign::Activates));
        assert_eq!(Sign::from_name("inhibits"), Ok(Sign::Inhibits));
        assert!(Sign::from_name("represses").is_err());
        assert_eq!(Sign::Inhibits.direction(), 1);
    }
}
