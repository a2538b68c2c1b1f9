//! Node taxonomy: which node indices are targets, honest nodes and twins.

use crate::config::Config;
use std::ops::Range;

/// A cluster holds all the node indices taking part in the simulated protocol, some of which
/// are twins of others.
///
/// Indices follow a fixed ordering convention over the range `0..num_nodes()`:
///
/// ```text
/// |--------------+----------------------+----------------------------|
/// | target nodes |     honest nodes     |         twin nodes         |
/// |    0..f      |    f..num_replicas   | num_replicas..num_nodes    |
/// |--------------+----------------------+----------------------------|
/// ```
///
/// Target nodes are the up-to-`f` nodes that receive a twin; the twin of target node `i` sits at
/// index `num_replicas + i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    /// The number of original replicas, ie. the `n` in `n = 3 * f + 1`.
    num_replicas: usize,
    /// The number of faulty nodes the committee tolerates, ie. `f = (n - 1) / 3`.
    num_faulty: usize,
}

impl Cluster {
    /// Derives the taxonomy from the configured committee size.
    ///
    /// Fails if the committee plus its twins is too small to be split into the configured number
    /// of partitions.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let num_replicas = config.num_nodes;
        let num_faulty = (num_replicas - 1) / 3;
        anyhow::ensure!(
            num_replicas + num_faulty >= config.num_partitions,
            "there should be at least as many nodes as partitions; \
             got {} nodes and {} partitions",
            num_replicas + num_faulty,
            config.num_partitions
        );
        Ok(Self {
            num_replicas,
            num_faulty,
        })
    }

    /// The number of original replicas, ie. not twins.
    pub fn num_replicas(&self) -> usize {
        self.num_replicas
    }

    /// The number of faulty nodes the committee can tolerate, ie. `f = (n - 1) / 3`.
    pub fn num_faulty(&self) -> usize {
        self.num_faulty
    }

    /// The number of nodes in the cluster, both replicas and twins.
    pub fn num_nodes(&self) -> usize {
        self.num_replicas + self.num_faulty
    }

    /// Indices of the nodes that have a twin. Leaders are drawn from this range.
    pub fn target_nodes(&self) -> Range<usize> {
        0..self.num_faulty
    }

    /// Indices of the nodes that do not have a twin.
    pub fn honest_nodes(&self) -> Range<usize> {
        self.num_faulty..self.num_replicas
    }

    /// Indices of the twins, in the same order as [`Self::target_nodes`].
    pub fn twin_nodes(&self) -> Range<usize> {
        self.num_replicas..self.num_nodes()
    }

    /// Whether the node is in the target range, ie. has a twin.
    pub fn is_target(&self, node: usize) -> bool {
        self.target_nodes().contains(&node)
    }

    /// The index of the twin of a target node.
    ///
    /// Panics if `node` is not a target node.
    pub fn twin_of(&self, node: usize) -> usize {
        assert!(self.is_target(node), "node {node} has no twin");
        self.num_replicas + node
    }
}

#[cfg(test)]
mod tests {
    use super::Cluster;
    use crate::config::Config;

    fn cluster(num_nodes: usize, num_partitions: usize) -> anyhow::Result<Cluster> {
        Cluster::new(&Config::new(num_nodes, num_partitions, 1)?)
    }

    #[test]
    fn taxonomy_ranges() {
        let cluster = cluster(4, 2).unwrap();
        assert_eq!(cluster.num_faulty(), 1);
        assert_eq!(cluster.num_nodes(), 5);
        assert_eq!(cluster.target_nodes(), 0..1);
        assert_eq!(cluster.honest_nodes(), 1..4);
        assert_eq!(cluster.twin_nodes(), 4..5);

        let cluster = self::cluster(7, 3).unwrap();
        assert_eq!(cluster.num_faulty(), 2);
        assert_eq!(cluster.num_nodes(), 9);
        assert_eq!(cluster.target_nodes(), 0..2);
        assert_eq!(cluster.honest_nodes(), 2..7);
        assert_eq!(cluster.twin_nodes(), 7..9);
    }

    #[test]
    fn twin_of_target() {
        let cluster = cluster(7, 3).unwrap();
        assert_eq!(cluster.twin_of(0), 7);
        assert_eq!(cluster.twin_of(1), 8);
        assert!(cluster.is_target(1));
        assert!(!cluster.is_target(2));
    }

    #[test]
    #[should_panic(expected = "has no twin")]
    fn twin_of_honest_node_panics() {
        let cluster = cluster(4, 2).unwrap();
        let _ = cluster.twin_of(1);
    }

    #[test]
    fn not_enough_nodes_for_partitions() {
        // 2 nodes have no twins (f = 0), so they cannot fill 3 partitions.
        assert!(cluster(2, 3).is_err());
        // 4 nodes + 1 twin can fill 5 partitions, but not 6.
        assert!(cluster(4, 5).is_ok());
        assert!(cluster(4, 6).is_err());
    }
}
