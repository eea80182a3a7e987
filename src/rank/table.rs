/*
 * SPDX-FileCopyrightText: 2026 The logrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Partitioned tables of log-space masses.

use crate::graph::adjacency::AdjacencyStore;
use crate::logspace::{LinearSum, Reduction};
use crate::partition::Partitioner;
use crate::NodeId;
use rayon::prelude::*;

/// A node with the natural logarithm of its current probability mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankRecord {
    pub node: NodeId,
    pub log_mass: f64,
}

/// A partitioned map from nodes to log-space masses.
///
/// Each partition is sorted by node. Tables are never modified in place:
/// every [iteration](super::pagerank::iterate) builds a new table from the
/// previous one, which can then be dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct RankTable {
    partitioner: Partitioner,
    partitions: Box<[Box<[RankRecord]>]>,
}

impl RankTable {
    /// Returns a table assigning mass 1/`num_nodes` to every node in the
    /// domain of `adjacency`, co-partitioned with it.
    pub fn uniform(adjacency: &AdjacencyStore, num_nodes: usize) -> Self {
        let log_mass = -(num_nodes as f64).ln();
        let partitions = (0..adjacency.num_partitions())
            .into_par_iter()
            .map(|i| {
                adjacency
                    .domain_partition(i)
                    .iter()
                    .map(|&node| RankRecord { node, log_mass })
                    .collect::<Box<[_]>>()
            })
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self {
            partitioner: adjacency.partitioner(),
            partitions,
        }
    }

    /// Builds a table from a sequence of records.
    ///
    /// If a node appears more than once, only its first record is kept.
    pub fn from_records(
        records: impl IntoIterator<Item = RankRecord>,
        partitioner: Partitioner,
    ) -> Self {
        let mut partitions = vec![Vec::new(); partitioner.num_partitions()];
        for record in records {
            partitions[partitioner.partition_of(record.node)].push(record);
        }
        Self::from_unsorted(partitioner, partitions)
    }

    fn from_unsorted(partitioner: Partitioner, partitions: Vec<Vec<RankRecord>>) -> Self {
        let partitions = partitions
            .into_par_iter()
            .map(|mut partition| {
                partition.sort_by_key(|r| r.node);
                partition.dedup_by_key(|r| r.node);
                partition.into_boxed_slice()
            })
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self {
            partitioner,
            partitions,
        }
    }

    /// Wraps partitions that are already sorted and placed according to
    /// `partitioner`.
    pub(crate) fn from_partitions(
        partitioner: Partitioner,
        partitions: Box<[Box<[RankRecord]>]>,
    ) -> Self {
        debug_assert_eq!(partitioner.num_partitions(), partitions.len());
        debug_assert!(partitions.iter().enumerate().all(|(i, p)| {
            p.windows(2).all(|w| w[0].node < w[1].node)
                && p.iter().all(|r| partitioner.partition_of(r.node) == i)
        }));
        Self {
            partitioner,
            partitions,
        }
    }

    /// Returns a copy of this table distributed according to a different
    /// partitioner.
    pub fn repartition(&self, partitioner: Partitioner) -> Self {
        let mut partitions = vec![Vec::new(); partitioner.num_partitions()];
        for record in self.iter() {
            partitions[partitioner.partition_of(record.node)].push(*record);
        }
        Self::from_unsorted(partitioner, partitions)
    }

    /// Returns the partitioner of this table.
    #[inline(always)]
    pub fn partitioner(&self) -> Partitioner {
        self.partitioner
    }

    /// Returns the number of partitions.
    #[inline(always)]
    pub fn num_partitions(&self) -> usize {
        self.partitions.len()
    }

    /// Returns the records of a partition, sorted by node.
    #[inline(always)]
    pub fn partition(&self, index: usize) -> &[RankRecord] {
        &self.partitions[index]
    }

    /// Returns the number of nodes in the table.
    pub fn len(&self) -> usize {
        self.partitions.iter().map(|p| p.len()).sum()
    }

    /// Returns true if the table contains no nodes.
    pub fn is_empty(&self) -> bool {
        self.partitions.iter().all(|p| p.is_empty())
    }

    /// Returns an iterator over all records, partition by partition.
    pub fn iter(&self) -> impl Iterator<Item = &RankRecord> + '_ {
        self.partitions.iter().flat_map(|p| p.iter())
    }

    /// Returns the log-space mass of a node, if the node is in the table.
    pub fn log_mass(&self, node: NodeId) -> Option<f64> {
        let partition = &self.partitions[self.partitioner.partition_of(node)];
        partition
            .binary_search_by_key(&node, |r| r.node)
            .ok()
            .map(|pos| partition[pos].log_mass)
    }

    /// Returns all records sorted by node.
    pub fn to_sorted_vec(&self) -> Vec<RankRecord> {
        let mut records = self.iter().copied().collect::<Vec<_>>();
        records.par_sort_unstable_by_key(|r| r.node);
        records
    }

    /// Returns the sum of the masses in linear space.
    ///
    /// For a table produced by an iteration on a graph whose domain has as
    /// many nodes as declared in the [parameters](super::RankParams) this
    /// should be 1 up to rounding.
    pub fn total_mass(&self) -> f64 {
        LinearSum::finish(
            self.partitions
                .par_iter()
                .map(|p| {
                    p.iter()
                        .map(|r| r.log_mass.exp())
                        .fold(LinearSum::identity(), LinearSum::add)
                })
                .reduce(LinearSum::identity, LinearSum::merge),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<RankRecord> {
        (0..100)
            .map(|node| RankRecord {
                node: node * 3,
                log_mass: -(node as f64),
            })
            .collect()
    }

    #[test]
    fn test_from_records() {
        let table = RankTable::from_records(records(), Partitioner::new(5));
        assert_eq!(table.len(), 100);
        assert_eq!(table.num_partitions(), 5);
        assert_eq!(table.log_mass(9), Some(-3.0));
        assert_eq!(table.log_mass(10), None);
        assert_eq!(table.to_sorted_vec(), records());
    }

    #[test]
    fn test_duplicates() {
        let mut r = records();
        r.push(RankRecord {
            node: 3,
            log_mass: 0.0,
        });
        let table = RankTable::from_records(r, Partitioner::new(2));
        assert_eq!(table.len(), 100);
        assert_eq!(table.log_mass(3), Some(-1.0));
    }

    #[test]
    fn test_repartition() {
        let table = RankTable::from_records(records(), Partitioner::new(3));
        let other = table.repartition(Partitioner::new(8));
        assert_eq!(other.num_partitions(), 8);
        assert_eq!(other.to_sorted_vec(), table.to_sorted_vec());
        for i in 0..8 {
            assert!(other
                .partition(i)
                .iter()
                .all(|r| other.partitioner().partition_of(r.node) == i));
        }
    }

    #[test]
    fn test_total_mass() {
        let table = RankTable::from_records(
            (0..8).map(|node| RankRecord {
                node,
                log_mass: (0.125f64).ln(),
            }),
            Partitioner::new(3),
        );
        assert!((table.total_mass() - 1.0).abs() < 1E-15);
        assert!(RankTable::from_records([], Partitioner::new(2)).is_empty());
    }
}
