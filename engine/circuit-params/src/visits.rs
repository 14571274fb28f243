//! Lock-free per-topology visit counters.

use crate::error::ParamsError;
use circuit_core::TopologyId;
use std::sync::atomic::{AtomicU64, Ordering};

/// One counter per topology; `next` hands out 0, 1, 2, ... to concurrent callers.
#[derive(Debug)]
pub struct VisitCounter {
    counts: Vec<AtomicU64>,
}

impl VisitCounter {
    pub fn new(topologies: usize) -> Self {
        Self {
            counts: (0..topologies).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    /// Claim the next visit number of `id`.
    pub fn next(&self, id: TopologyId) -> Result<u64, ParamsError> {
        self.counter(id).map(|c| c.fetch_add(1, Ordering::Relaxed))
    }

    /// Visits claimed so far for `id`.
    pub fn get(&self, id: TopologyId) -> Result<u64, ParamsError> {
        self.counter(id).map(|c| c.load(Ordering::Relaxed))
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|c| c.load(Ordering::Relaxed)).sum()
    }

    fn counter(&self, id: TopologyId) -> Result<&AtomicU64, ParamsError> {
        self.counts
            .get(id.index())
            .ok_or(ParamsError::UnknownTopology(id))
    }
}
