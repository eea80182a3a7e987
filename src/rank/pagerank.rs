/*
 * SPDX-FileCopyrightText: 2026 The logrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Partitioned PageRank in log space.
//!
//! This implementation computes a fixed number of iterations of the power
//! method on a graph given as a partitioned
//! [adjacency store](crate::graph::adjacency::AdjacencyStore). All masses are
//! kept as natural logarithms, so that nodes with a tiny mass on very large
//! graphs do not underflow to zero.
//!
//! # The formula
//!
//! Let *n* be the number of nodes, *p* the random-jump probability (0.15 by
//! default), and *d*(*j*) the outdegree of *j*. At each iteration every
//! non-dangling node *j* splits its mass evenly among its successors, whereas
//! the mass of dangling nodes is collected into the _missing mass_ *m*. The
//! new mass of node *i* is then
//!
//! > *xᵢ*′ = *p* / *n*  +  (1 − *p*) ( ∑_(*j* → *i*) *xⱼ* / *d*(*j*)  +  *m* / *n* ),
//!
//! that is, the missing mass is redistributed uniformly, and the result is
//! stochastic whenever **x** is. In log space, with λ = ln, this becomes
//!
//! > λ*xᵢ*′ = ⊕( λ*p* − λ*n*,  λ(1 − *p*) + ⊕( ⊕_(*j* → *i*) (λ*xⱼ* − λ*d*(*j*)),  λ*m* − λ*n* ) )
//!
//! where ⊕ is [`log_add`]. The formula is applied to _every_ node of the
//! table, including those receiving no contribution (whose inner sum is −∞),
//! so that every node keeps a positive mass.
//!
//! # One iteration
//!
//! [`iterate`] proceeds in three phases:
//!
//! 1. _distribute_: each partition of the rank table is joined with the
//!    corresponding partition of the adjacency store; nodes with successors
//!    emit a contribution to each successor, routed to the partition owning
//!    the successor, whereas nodes without successors (or missing from the
//!    store) add their linear mass to a per-partition [`LinearSum`];
//! 2. _reduce_: each target partition folds the contributions it received
//!    with [`LogSum`];
//! 3. _finalize_: the formula above is applied to all nodes.
//!
//! Phases are data-parallel over partitions. The missing mass is not a shared
//! accumulator: the per-partition sums are returned by the distribute phase
//! and merged only after all partitions have completed, so finalization
//! never observes a partial sum.
//!
//! There is no convergence test: [`LogPageRank::run`] performs exactly the
//! requested number of iterations.

use super::params::RankParams;
use super::table::{RankRecord, RankTable};
use super::top_k::{top_k, RankedResult};
use crate::graph::adjacency::AdjacencyStore;
use crate::logspace::{ln_or_zero, log_add, LinearSum, LogSum, Reduction, LOG_ZERO};
use crate::partition::{node_map_with_capacity, NodeMap};
use crate::NodeId;
use dsi_progress_logger::{no_logging, ProgressLog};
use rayon::prelude::*;
use std::borrow::Cow;

/// A node with successors reached the mass-spreading step with outdegree
/// zero.
///
/// This cannot happen for nodes that went through the dangling check; when it
/// does anyway, the node is logged and handled as dangling.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Node {node} has outdegree zero but was not flagged as dangling")]
pub struct NumericDegeneracy {
    pub node: NodeId,
}

/// Returns the logarithm of the mass a node sends along each of its arcs.
#[inline(always)]
fn spread(node: NodeId, log_mass: f64, outdegree: usize) -> Result<f64, NumericDegeneracy> {
    if outdegree == 0 {
        return Err(NumericDegeneracy { node });
    }
    Ok(log_mass - (outdegree as f64).ln())
}

/// Statistics about an iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IterationStats {
    /// The mass of dangling nodes, in linear space.
    pub missing_mass: f64,
    /// The number of contributions sent along arcs.
    pub num_contributions: u64,
    /// The number of nodes of the table handled as dangling.
    pub num_dangling: usize,
    /// The number of [degenerate](NumericDegeneracy) nodes.
    pub num_degenerate: usize,
    /// The number of nodes that received contributions but are not in the
    /// table; their mass is lost.
    pub num_orphaned: usize,
}

/// The output of the distribute phase for a source partition.
struct Distributed {
    /// Contributions indexed by target partition.
    outboxes: Vec<Vec<(NodeId, f64)>>,
    /// The missing mass of the partition.
    missing: f64,
    num_contributions: u64,
    num_dangling: usize,
    num_degenerate: usize,
}

/// Joins a partition of the rank table with the corresponding partition of
/// the adjacency store and spreads mass along arcs.
fn distribute(adjacency: &AdjacencyStore, ranks: &RankTable, index: usize) -> Distributed {
    let partitioner = adjacency.partitioner();
    let successors = adjacency.partition(index);
    let mut outboxes = vec![Vec::new(); partitioner.num_partitions()];
    let mut missing = LinearSum::identity();
    let mut num_contributions = 0;
    let mut num_dangling = 0;
    let mut num_degenerate = 0;

    for &RankRecord { node, log_mass } in ranks.partition(index) {
        // Absent and empty successor lists are both dangling
        let succ = successors.get(&node).map_or(&[][..], |s| &**s);
        if succ.is_empty() {
            missing = LinearSum::add(missing, log_mass.exp());
            num_dangling += 1;
            continue;
        }
        match spread(node, log_mass, succ.len()) {
            Ok(share) => {
                for &s in succ {
                    outboxes[partitioner.partition_of(s)].push((s, share));
                }
                num_contributions += succ.len() as u64;
            }
            Err(e) => {
                log::warn!("{}", e);
                missing = LinearSum::add(missing, log_mass.exp());
                num_degenerate += 1;
            }
        }
    }

    Distributed {
        outboxes,
        missing: LinearSum::finish(missing),
        num_contributions,
        num_dangling,
        num_degenerate,
    }
}

/// Folds the contributions addressed to a partition.
fn reduce(distributed: &[Distributed], index: usize) -> NodeMap<f64> {
    let mut aggregate = node_map_with_capacity(
        distributed
            .iter()
            .map(|d| d.outboxes[index].len())
            .max()
            .unwrap_or(0),
    );
    for d in distributed {
        for &(node, share) in &d.outboxes[index] {
            aggregate
                .entry(node)
                .and_modify(|acc| *acc = LogSum::add(*acc, share))
                .or_insert(share);
        }
    }
    aggregate
}

/// Performs one iteration, returning the new rank table.
///
/// If `ranks` is not co-partitioned with `adjacency` it is repartitioned
/// first; the returned table is always co-partitioned with `adjacency`. Nodes
/// of `ranks` that are missing from `adjacency` are handled as dangling.
pub fn iterate(
    adjacency: &AdjacencyStore,
    ranks: &RankTable,
    params: &RankParams,
) -> (RankTable, IterationStats) {
    let partitioner = adjacency.partitioner();
    let ranks = if ranks.partitioner() == partitioner {
        Cow::Borrowed(ranks)
    } else {
        log::debug!("Repartitioning the rank table to match the adjacency store");
        Cow::Owned(ranks.repartition(partitioner))
    };
    let num_partitions = partitioner.num_partitions();

    // Distribute; collecting is the barrier after which the missing mass is
    // complete.
    let distributed = (0..num_partitions)
        .into_par_iter()
        .map(|i| distribute(adjacency, &ranks, i))
        .collect::<Vec<_>>();

    let mut stats = IterationStats {
        missing_mass: LinearSum::reduce(distributed.iter().map(|d| d.missing)),
        ..Default::default()
    };
    for d in &distributed {
        stats.num_contributions += d.num_contributions;
        stats.num_dangling += d.num_dangling;
        stats.num_degenerate += d.num_degenerate;
    }

    let log_jump = params.log_jump();
    let log_follow = params.log_follow();
    let log_missing = ln_or_zero(stats.missing_mass) - params.log_num_nodes();

    // Reduce and finalize
    let finalized = (0..num_partitions)
        .into_par_iter()
        .map(|i| {
            let mut aggregate = reduce(&distributed, i);
            let partition = ranks
                .partition(i)
                .iter()
                .map(|&RankRecord { node, .. }| {
                    let incoming = aggregate.remove(&node).unwrap_or(LOG_ZERO);
                    RankRecord {
                        node,
                        log_mass: log_add(log_jump, log_follow + log_add(incoming, log_missing)),
                    }
                })
                .collect::<Box<[_]>>();
            (partition, aggregate.len())
        })
        .collect::<Vec<_>>();

    let mut partitions = Vec::with_capacity(num_partitions);
    for (partition, num_orphaned) in finalized {
        partitions.push(partition);
        stats.num_orphaned += num_orphaned;
    }
    if stats.num_orphaned != 0 {
        log::warn!(
            "{} nodes received contributions but are not in the rank table",
            stats.num_orphaned
        );
    }

    (
        RankTable::from_partitions(partitioner, partitions.into_boxed_slice()),
        stats,
    )
}

/// Computes PageRank in log space with a fixed number of iterations.
///
/// The struct is configured at construction and then executed via
/// [`run`](Self::run). After completion the rank table is available via the
/// [`rank`](Self::rank) method.
///
/// # Examples
///
/// ```
/// use logrank::prelude::*;
///
/// // 0 → 1, 0 → 2, 1 → 2, 2 → 0, 3 (dangling)
/// let records = [(0, vec![1, 2]), (1, vec![2]), (2, vec![0]), (3, vec![])]
///     .into_iter()
///     .map(|(node, successors)| AdjacencyRecord { node, successors });
/// let store = AdjacencyStore::from_records(records, Partitioner::new(2));
///
/// let mut pr = LogPageRank::new(&store, RankParams::new(4).unwrap());
/// pr.run(30);
///
/// assert_eq!(pr.iterations(), 30);
/// assert!((pr.rank().total_mass() - 1.0).abs() < 1E-9);
/// let best = pr.top_k(1);
/// assert_eq!(best[0].node, 2);
/// ```
#[derive(Debug)]
pub struct LogPageRank<'a> {
    adjacency: &'a AdjacencyStore,
    params: RankParams,
    rank: RankTable,
    iteration: usize,
    last_stats: Option<IterationStats>,
}

impl<'a> LogPageRank<'a> {
    /// Creates a new PageRank computation.
    ///
    /// The rank table is initialized uniformly over the node domain of
    /// `adjacency`.
    pub fn new(adjacency: &'a AdjacencyStore, params: RankParams) -> Self {
        Self {
            adjacency,
            params,
            rank: RankTable::uniform(adjacency, params.num_nodes()),
            iteration: 0,
            last_stats: None,
        }
    }

    /// Returns the current rank table.
    pub fn rank(&self) -> &RankTable {
        &self.rank
    }

    /// Consumes the computation, returning the rank table.
    pub fn into_rank(self) -> RankTable {
        self.rank
    }

    /// Returns the number of iterations performed by the last call to
    /// [`run`](Self::run).
    pub fn iterations(&self) -> usize {
        self.iteration
    }

    /// Returns the statistics of the last iteration, if any.
    pub fn last_stats(&self) -> Option<&IterationStats> {
        self.last_stats.as_ref()
    }

    /// Returns the `k` nodes with the largest mass.
    pub fn top_k(&self, k: usize) -> Vec<RankedResult> {
        top_k(&self.rank, k)
    }

    /// Runs the given number of iterations starting from the uniform
    /// distribution.
    pub fn run(&mut self, iterations: usize) {
        self.run_with_logging(iterations, no_logging![]);
    }

    /// Runs the given number of iterations starting from the uniform
    /// distribution, logging progress.
    ///
    /// `pl` is updated once per iteration. Its options will be preserved,
    /// making thus possible to customize the logs.
    pub fn run_with_logging(&mut self, iterations: usize, pl: &mut impl ProgressLog) {
        let num_nodes = self.params.num_nodes();
        let domain_size = self.adjacency.num_nodes();
        if domain_size != num_nodes {
            log::warn!(
                "The graph contains {} nodes, but the number of nodes was set to {}: masses will not sum to one",
                domain_size,
                num_nodes
            );
        }

        log::info!("Nodes: {}", num_nodes);
        log::info!("Random-jump probability: {}", self.params.jump_probability());
        log::info!("Partitions: {}", self.adjacency.num_partitions());
        log::info!("Iterations: {}", iterations);

        self.rank = RankTable::uniform(self.adjacency, num_nodes);
        self.iteration = 0;
        self.last_stats = None;

        pl.item_name("iteration");
        pl.expected_updates(Some(iterations));
        pl.start(format!(
            "Computing PageRank (jump probability={})...",
            self.params.jump_probability()
        ));

        while self.iteration < iterations {
            let (rank, stats) = iterate(self.adjacency, &self.rank, &self.params);
            self.rank = rank;
            self.iteration += 1;

            log::info!(
                "Iteration {}: missing mass = {}, {} dangling nodes",
                self.iteration,
                stats.missing_mass,
                stats.num_dangling
            );
            log::debug!(
                "Iteration {}: total mass = {}",
                self.iteration,
                self.rank.total_mass()
            );
            if stats.num_degenerate != 0 {
                log::warn!(
                    "Iteration {}: {} degenerate nodes handled as dangling",
                    self.iteration,
                    stats.num_degenerate
                );
            }
            self.last_stats = Some(stats);

            pl.update_and_display();
        }

        pl.done();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spread() {
        assert_eq!(spread(3, 0.0, 0), Err(NumericDegeneracy { node: 3 }));
        let share = spread(3, 0.5f64.ln(), 4).unwrap();
        assert!((share.exp() - 0.125).abs() < 1E-15);
    }
}
