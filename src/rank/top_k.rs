/*
 * SPDX-FileCopyrightText: 2026 The logrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Extraction of the nodes with the largest mass.

use super::table::RankTable;
use crate::NodeId;
use dary_heap::QuaternaryHeap;
use rayon::prelude::*;
use std::cmp::{Ordering, Reverse};

/// A node of the final ranking.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct RankedResult {
    pub node: NodeId,
    pub log_mass: f64,
}

impl RankedResult {
    /// Returns the mass in linear space.
    pub fn mass(&self) -> f64 {
        self.log_mass.exp()
    }
}

/// Orders results so that greater means better ranked: larger mass first,
/// and then smaller node identifier.
#[derive(Debug, Clone, Copy)]
struct ByRank(RankedResult);

impl PartialEq for ByRank {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ByRank {}

impl PartialOrd for ByRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ByRank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .log_mass
            .total_cmp(&other.0.log_mass)
            .then_with(|| other.0.node.cmp(&self.0.node))
    }
}

/// Returns the best `k` results among `results`, in arbitrary order.
fn select(results: impl IntoIterator<Item = RankedResult>, k: usize) -> Vec<ByRank> {
    let results = results.into_iter();
    // A min-heap containing the best k results seen so far; it never holds
    // more than k elements, nor more than the input provides
    let mut heap = QuaternaryHeap::with_capacity(k.min(results.size_hint().0));
    for result in results {
        let candidate = Reverse(ByRank(result));
        if heap.len() < k {
            heap.push(candidate);
        } else if let Some(worst) = heap.peek() {
            if candidate < *worst {
                heap.pop();
                heap.push(candidate);
            }
        }
    }
    heap.into_iter().map(|Reverse(r)| r).collect()
}

/// Returns the `k` nodes of `table` with the largest mass, in decreasing
/// order of mass.
///
/// Ties are broken by increasing node identifier, so the result depends only
/// on the content of the table, not on its partitioning. If the table has
/// fewer than `k` nodes, all of them are returned.
///
/// Each partition selects its best `k` nodes in parallel; the partial results
/// are then merged and sorted.
///
/// # Examples
///
/// ```
/// use logrank::prelude::*;
///
/// let table = RankTable::from_records(
///     [(4, -1.0), (2, -3.0), (7, -1.0), (1, -2.0)]
///         .into_iter()
///         .map(|(node, log_mass)| RankRecord { node, log_mass }),
///     Partitioner::new(3),
/// );
/// let nodes: Vec<_> = top_k(&table, 3).iter().map(|r| r.node).collect();
/// assert_eq!(nodes, [4, 7, 1]);
/// ```
pub fn top_k(table: &RankTable, k: usize) -> Vec<RankedResult> {
    if k == 0 {
        return Vec::new();
    }
    let candidates = (0..table.num_partitions())
        .into_par_iter()
        .flat_map_iter(|i| {
            select(
                table.partition(i).iter().map(|r| RankedResult {
                    node: r.node,
                    log_mass: r.log_mass,
                }),
                k,
            )
        })
        .collect::<Vec<_>>();

    let mut best = select(candidates.into_iter().map(|r| r.0), k);
    // The order is total, so an unstable sort is deterministic
    best.sort_unstable_by(|a, b| b.cmp(a));
    best.into_iter().map(|r| r.0).collect()
}
