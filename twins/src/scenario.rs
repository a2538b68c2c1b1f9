//! Composition of partitions with leaders into scenarios, and of scenarios into testcases.
//!
//! The testcase space is astronomically large for realistic configurations, so it is never
//! materialized. Both spaces are index-addressable instead: a global index maps to a concrete
//! testcase by repeated division and modulo against the scenario count. This makes sharding a
//! pure arithmetic exercise and re-iteration free.

use crate::{partition::Partition, shard::Shard};
use anyhow::Context as _;

/// One round's choice of leader and partitioning. The leader is always drawn from the target
/// nodes; when it leads, its twin leads as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scenario<'a> {
    /// Index of the leading target node.
    pub leader: usize,
    /// How the nodes are partitioned in this round.
    pub partition: &'a Partition,
}

/// An ordered sequence of scenarios, one per round, describing one adversarial run of the
/// protocol. Identified structurally by its position in the enumeration order.
pub type Testcase<'a> = Vec<Scenario<'a>>;

/// The sequence of all `(leader, partition)` pairs: partitions in enumeration order, and for
/// each partition the target nodes in ascending index order.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioSpace<'a> {
    partitions: &'a [Partition],
    num_leaders: usize,
}

impl<'a> ScenarioSpace<'a> {
    /// Creates the view over the enumerated partitions; `num_leaders` is the number of target
    /// nodes, which are indices `0..num_leaders`.
    pub fn new(partitions: &'a [Partition], num_leaders: usize) -> Self {
        Self {
            partitions,
            num_leaders,
        }
    }

    /// Number of scenarios.
    pub fn len(&self) -> u128 {
        self.partitions.len() as u128 * self.num_leaders as u128
    }

    /// The scenario at the given position.
    ///
    /// Panics if the index is out of bounds.
    pub fn get(&self, index: u128) -> Scenario<'a> {
        assert!(index < self.len(), "scenario index {index} out of bounds");
        Scenario {
            leader: (index % self.num_leaders as u128) as usize,
            partition: &self.partitions[(index / self.num_leaders as u128) as usize],
        }
    }
}

/// The Cartesian power of the scenario space over the configured number of rounds, in
/// lexicographic order with round 0 as the most significant position.
#[derive(Debug, Clone, Copy)]
pub struct TestcaseSpace<'a> {
    scenarios: ScenarioSpace<'a>,
    num_rounds: usize,
    len: u128,
}

impl<'a> TestcaseSpace<'a> {
    /// Composes the scenario space with the number of rounds.
    ///
    /// Fails if the total does not fit in the `u128` index space; such a corpus could not be
    /// written out within the lifetime of the universe anyway.
    pub fn new(
        partitions: &'a [Partition],
        num_leaders: usize,
        num_rounds: usize,
    ) -> anyhow::Result<Self> {
        let scenarios = ScenarioSpace::new(partitions, num_leaders);
        let len = scenarios
            .len()
            .checked_pow(num_rounds as u32)
            .with_context(|| {
                format!(
                    "testcase space {}^{num_rounds} does not fit in u128",
                    scenarios.len()
                )
            })?;
        Ok(Self {
            scenarios,
            num_rounds,
            len,
        })
    }

    /// Total number of testcases.
    pub fn len(&self) -> u128 {
        self.len
    }

    /// Decodes a global index into a testcase, treating the index as a `num_rounds`-digit
    /// number in base `scenarios.len()`, most significant digit first.
    ///
    /// Panics if the index is out of bounds.
    pub fn get(&self, index: u128) -> Testcase<'a> {
        assert!(index < self.len, "testcase index {index} out of bounds");
        let base = self.scenarios.len();
        let mut rounds = Vec::with_capacity(self.num_rounds);
        let mut rem = index;
        for _ in 0..self.num_rounds {
            rounds.push(self.scenarios.get(rem % base));
            rem /= base;
        }
        rounds.reverse();
        rounds
    }

    /// Lazily walks the testcases belonging to one shard, in ascending index order.
    pub fn iter_shard(&self, shard: Shard) -> impl Iterator<Item = Testcase<'a>> + '_ {
        shard.indexes(self.len).map(|index| self.get(index))
    }
}
