/*
 * SPDX-FileCopyrightText: 2026 The logrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Hash partitioning of node-keyed data.
//!
//! Every partitioned structure of this crate (the
//! [adjacency store](crate::graph::adjacency::AdjacencyStore) and the
//! [rank table](crate::rank::table::RankTable)) distributes its records among
//! partitions using a [`Partitioner`]. Two structures built with equal
//! partitioners are _co-partitioned_: a record with a given node ID lives in
//! the partition with the same index in both, so joining them is a local
//! operation on each pair of partitions and can be carried out in parallel
//! without exchanging data.
//!
//! Node IDs are scrambled by the 64-bit finalizer of MurmurHash3 before being
//! reduced modulo the number of partitions, so that IDs following a regular
//! pattern (e.g., all even) are still evenly spread. The same mixing is used
//! as the hash function of [`NodeMap`].

use crate::NodeId;
use std::collections::HashMap;

/// Mixes a 64-bit value using the finalizer of MurmurHash3.
#[inline(always)]
#[must_use]
pub fn mix64(x: u64) -> u64 {
    let mut state = x;
    state ^= state >> 33;
    state = state.wrapping_mul(0xff51_afd7_ed55_8ccd);
    state ^= state >> 33;
    state = state.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    state ^= state >> 33;
    state
}

/// A hasher that mixes node identifiers.
///
/// This can only be used to hash integer keys and it's not a general purpose
/// hasher. It is used by [`NodeMap`].
#[derive(Debug, Clone, Default)]
pub struct Mix64 {
    state: u64,
}

impl core::hash::Hasher for Mix64 {
    #[inline(always)]
    fn write(&mut self, _bytes: &[u8]) {
        unimplemented!("Mix64 can only hash integer node identifiers")
    }
    #[inline(always)]
    fn write_u64(&mut self, i: u64) {
        self.state = mix64(i);
    }
    #[inline(always)]
    fn write_usize(&mut self, i: usize) {
        self.state = mix64(i as u64);
    }
    #[inline(always)]
    fn finish(&self) -> u64 {
        self.state
    }
}

/// The [`BuildHasher`](core::hash::BuildHasher) of [`Mix64`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Mix64Builder;

impl core::hash::BuildHasher for Mix64Builder {
    type Hasher = Mix64;
    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        Mix64::default()
    }
}

/// A hash map keyed by node identifiers.
pub type NodeMap<V> = HashMap<NodeId, V, Mix64Builder>;

/// Creates an empty [`NodeMap`] with the given capacity.
pub fn node_map_with_capacity<V>(capacity: usize) -> NodeMap<V> {
    HashMap::with_capacity_and_hasher(capacity, Mix64Builder)
}

/// Assigns node identifiers to a fixed number of partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partitioner {
    num_partitions: usize,
}

impl Partitioner {
    /// Creates a partitioner with the given number of partitions.
    ///
    /// # Panics
    ///
    /// Panics if `num_partitions` is zero.
    pub fn new(num_partitions: usize) -> Self {
        assert!(num_partitions > 0, "The number of partitions must be positive");
        Self { num_partitions }
    }

    /// Returns the number of partitions.
    #[inline(always)]
    pub fn num_partitions(&self) -> usize {
        self.num_partitions
    }

    /// Returns the index of the partition containing `node`.
    #[inline(always)]
    pub fn partition_of(&self, node: NodeId) -> usize {
        (mix64(node) % self.num_partitions as u64) as usize
    }
}

impl Default for Partitioner {
    /// Returns a partitioner with four partitions per Rayon thread.
    fn default() -> Self {
        Self::new(4 * rayon::current_num_threads().max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_partition() {
        let p = Partitioner::new(1);
        for node in [0, 1, 17, u64::MAX] {
            assert_eq!(p.partition_of(node), 0);
        }
    }

    #[test]
    fn test_partition_in_range_and_stable() {
        let p = Partitioner::new(7);
        for node in 0..10_000 {
            let i = p.partition_of(node);
            assert!(i < 7);
            assert_eq!(i, Partitioner::new(7).partition_of(node));
        }
    }

    #[test]
    fn test_strided_ids_are_spread() {
        let p = Partitioner::new(4);
        let mut counts = [0usize; 4];
        for node in (0..40_000).map(|x| x * 4) {
            counts[p.partition_of(node)] += 1;
        }
        for &c in &counts {
            // each partition should receive roughly a quarter of the IDs
            assert!(c > 8_000 && c < 12_000, "unbalanced partitions: {counts:?}");
        }
    }

    #[test]
    #[should_panic]
    fn test_zero_partitions() {
        let _ = Partitioner::new(0);
    }

    #[test]
    fn test_node_map() {
        let mut map = node_map_with_capacity(16);
        map.insert(3, "three");
        map.insert(u64::MAX, "max");
        assert_eq!(map.get(&3), Some(&"three"));
        assert_eq!(map.get(&u64::MAX), Some(&"max"));
        assert_eq!(map.get(&4), None);
    }
}
