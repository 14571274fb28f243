//! Per-topology permutations of pool slots.
//!
//! Row `t` is a Fisher-Yates shuffle of `0..pool_size` driven by the master
//! seed on ChaCha stream `t`. Rows are independent of each other, so they are
//! built on first use and the table stays a pure function of the seed no
//! matter which rows are touched, or in what order.

use crate::error::ParamsError;
use crate::seeds::{stream_rng, Domain};
use circuit_core::TopologyId;
use once_cell::sync::OnceCell;
use rand::seq::SliceRandom;
use tracing::trace;

#[derive(Debug)]
pub struct IndexTable {
    seed: u64,
    pool_size: usize,
    rows: Vec<OnceCell<Box<[u32]>>>,
}

impl IndexTable {
    pub fn new(topologies: usize, pool_size: usize, seed: u64) -> Result<Self, ParamsError> {
        if pool_size == 0 || pool_size > u32::MAX as usize {
            return Err(ParamsError::InvalidPoolSize(pool_size));
        }
        Ok(Self {
            seed,
            pool_size,
            rows: (0..topologies).map(|_| OnceCell::new()).collect(),
        })
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Number of topology rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The full permutation for `id`, building it if needed.
    pub fn row(&self, id: TopologyId) -> Result<&[u32], ParamsError> {
        let cell = self
            .rows
            .get(id.index())
            .ok_or(ParamsError::UnknownTopology(id))?;
        Ok(cell.get_or_init(|| self.build_row(id)))
    }

    /// Pool slot for the `visit`-th evaluation of `id`; wraps past the pool.
    pub fn slot(&self, id: TopologyId, visit: u64) -> Result<usize, ParamsError> {
        let row = self.row(id)?;
        let position = (visit % self.pool_size as u64) as usize;
        Ok(row[position] as usize)
    }

    /// Build every row now.
    pub fn materialize_all(&self) {
        for (i, cell) in self.rows.iter().enumerate() {
            cell.get_or_init(|| self.build_row(TopologyId(i as u32)));
        }
    }

    /// Rows built so far.
    pub fn materialized(&self) -> usize {
        self.rows.iter().filter(|c| c.get().is_some()).count()
    }

    fn build_row(&self, id: TopologyId) -> Box<[u32]> {
        let mut rng = stream_rng(self.seed, Domain::IndexTable, id.0 as u64);
        let mut row: Vec<u32> = (0..self.pool_size as u32).collect();
        row.shuffle(&mut rng);
        trace!(topology = id.0, "Materialized index row");
        row.into_boxed_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_rows() {
        let a = IndexTable::new(10, 100, 42).unwrap();
        let b = IndexTable::new(10, 100, 42).unwrap();
        // Touch rows in opposite orders.
        for i in 0..10 {
            a.row(TopologyId(i)).unwrap();
            b.row(TopologyId(9 - i)).unwrap();
        }
        for i in 0..10 {
            assert_eq!(a.row(TopologyId(i)).unwrap(), b.row(TopologyId(i)).unwrap());
        }
    }

    #[test]
    fn test_different_seed_or_row_differs() {
        let a = IndexTable::new(2, 100, 1).unwrap();
        let b = IndexTable::new(2, 100, 2).unwrap();
        assert_ne!(a.row(TopologyId(0)).unwrap(), b.row(TopologyId(0)).unwrap());
        assert_ne!(a.row(TopologyId(0)).unwrap(), a.row(TopologyId(1)).unwrap());
    }

    #[test]
    fn test_exhaustion_coverage() {
        let table = IndexTable::new(3, 250, 9).unwrap();
        let id = TopologyId(2);
        let mut seen = vec![false; 250];
        for visit in 0..250 {
            let slot = table.slot(id, visit).unwrap();
            assert!(!seen[slot], "slot {slot} repeated before exhaustion");
            seen[slot] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_visits_wrap() {
        let table = IndexTable::new(1, 50, 0).unwrap();
        let id = TopologyId(0);
        for visit in 0..50 {
            assert_eq!(table.slot(id, visit).unwrap(), table.slot(id, visit + 50).unwrap());
            assert_eq!(
                table.slot(id, visit).unwrap(),
                table.slot(id, visit + 50 * 1_000_000).unwrap()
            );
        }
    }

    #[test]
    fn test_lazy_materialization() {
        let table = IndexTable::new(5, 10, 0).unwrap();
        assert_eq!(table.materialized(), 0);
        table.slot(TopologyId(3), 0).unwrap();
        assert_eq!(table.materialized(), 1);
        table.materialize_all();
        assert_eq!(table.materialized(), 5);
    }

    #[test]
    fn test_unknown_topology() {
        let table = IndexTable::new(2, 10, 0).unwrap();
        assert_eq!(
            table.slot(TopologyId(2), 0),
            Err(ParamsError::UnknownTopology(TopologyId(2)))
        );
        assert_eq!(
            IndexTable::new(2, 0, 0).err(),
            Some(ParamsError::InvalidPoolSize(0))
        );
    }
}
