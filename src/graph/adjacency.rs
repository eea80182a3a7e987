/*
 * SPDX-FileCopyrightText: 2026 The logrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Partitioned adjacency lists.
//!
//! An [`AdjacencyStore`] is loaded once from a text file containing one line
//! per node,
//!
//! ```text
//! <node> <successor> <successor> ...
//! ```
//!
//! where tokens are separated by whitespace. A line containing just a node
//! identifier describes a _dangling_ node, that is, a node without outgoing
//! arcs. Empty lines and lines starting with `#` are ignored. If a node
//! appears on several lines its successor lists are concatenated.
//!
//! The store is immutable after construction and is shared read-only by all
//! iterations of [`LogPageRank`](crate::rank::pagerank::LogPageRank). Records
//! are spread among partitions by a [`Partitioner`]; the store also keeps the
//! _node domain_, that is, the set of nodes that either have a line or appear
//! as a successor, partitioned in the same way.

use crate::partition::{node_map_with_capacity, NodeMap, Partitioner};
use crate::NodeId;
use anyhow::{Context, Result};
use dsi_progress_logger::{no_logging, ProgressLog};
use rayon::prelude::*;
use std::io::BufRead;
use std::num::ParseIntError;
use std::path::Path;

/// A line of the adjacency list could not be decoded.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Line {line}: cannot parse {token:?} as a node identifier ({source})")]
pub struct ParseError {
    /// The line number, starting from 1.
    pub line: usize,
    /// The offending token.
    pub token: String,
    /// The underlying integer parsing error.
    #[source]
    pub source: ParseIntError,
}

/// A node together with its successors, as read from a line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyRecord {
    pub node: NodeId,
    pub successors: Vec<NodeId>,
}

impl AdjacencyRecord {
    /// Returns true if the node has no successors.
    ///
    /// A node missing from the store altogether is dangling, too: see
    /// [`LogPageRank`](crate::rank::pagerank::LogPageRank).
    #[inline(always)]
    pub fn is_dangling(&self) -> bool {
        self.successors.is_empty()
    }
}

/// Parses a line of an adjacency list.
///
/// Returns `Ok(None)` for empty lines and comment lines (starting with `#`).
/// `line_num` is used only to build the error.
///
/// # Examples
///
/// ```
/// use logrank::graph::adjacency::{parse_line, AdjacencyRecord};
///
/// let record = parse_line("5 1 2 3", 1).unwrap().unwrap();
/// assert_eq!(record, AdjacencyRecord { node: 5, successors: vec![1, 2, 3] });
///
/// let record = parse_line("7", 2).unwrap().unwrap();
/// assert!(record.is_dangling());
///
/// assert!(parse_line("# a comment", 3).unwrap().is_none());
/// assert!(parse_line("8 x", 4).is_err());
/// ```
pub fn parse_line(line: &str, line_num: usize) -> Result<Option<AdjacencyRecord>, ParseError> {
    let line = line.trim_start();
    if line.starts_with('#') {
        return Ok(None);
    }
    let mut tokens = line.split_whitespace().map(|token| {
        token.parse::<NodeId>().map_err(|source| ParseError {
            line: line_num,
            token: token.to_owned(),
            source,
        })
    });
    let Some(node) = tokens.next() else {
        return Ok(None);
    };
    Ok(Some(AdjacencyRecord {
        node: node?,
        successors: tokens.collect::<Result<_, _>>()?,
    }))
}

/// An immutable, partitioned map from nodes to their successor lists.
///
/// Direct lookups are not provided: the store is meant to be
/// [joined](crate::rank::pagerank::iterate) partition by partition with a
/// co-partitioned [`RankTable`](crate::rank::table::RankTable).
#[derive(Debug, Clone)]
pub struct AdjacencyStore {
    partitioner: Partitioner,
    partitions: Box<[NodeMap<Box<[NodeId]>>]>,
    domain: Box<[Box<[NodeId]>]>,
    num_records: usize,
    num_arcs: u64,
    num_linked: usize,
}

impl AdjacencyStore {
    /// Loads an adjacency list from a file.
    pub fn load(path: impl AsRef<Path>, partitioner: Partitioner) -> Result<Self> {
        Self::load_with_logging(path, partitioner, no_logging![])
    }

    /// Loads an adjacency list from a file, logging progress.
    pub fn load_with_logging(
        path: impl AsRef<Path>,
        partitioner: Partitioner,
        pl: &mut impl ProgressLog,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Could not open adjacency list {}", path.display()))?;
        Self::from_reader(std::io::BufReader::new(file), partitioner, pl)
            .with_context(|| format!("Could not load adjacency list {}", path.display()))
    }

    /// Reads an adjacency list from a buffered reader.
    ///
    /// Parsing stops at the first malformed line, whose [`ParseError`] is
    /// returned (and can be recovered with
    /// [`downcast_ref`](anyhow::Error::downcast_ref)).
    pub fn from_reader(
        reader: impl BufRead,
        partitioner: Partitioner,
        pl: &mut impl ProgressLog,
    ) -> Result<Self> {
        pl.item_name("line");
        pl.expected_updates(None);
        pl.start("Reading adjacency list...");

        let mut records = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Error reading line {}", i + 1))?;
            if let Some(record) = parse_line(&line, i + 1)? {
                records.push(record);
            }
            pl.light_update();
        }
        pl.done();

        Ok(Self::from_records(records, partitioner))
    }

    /// Builds a store from a sequence of records.
    pub fn from_records(
        records: impl IntoIterator<Item = AdjacencyRecord>,
        partitioner: Partitioner,
    ) -> Self {
        let num_partitions = partitioner.num_partitions();
        let mut lists: Vec<NodeMap<Vec<NodeId>>> = (0..num_partitions)
            .map(|_| node_map_with_capacity(0))
            .collect();
        let mut num_lines = 0;
        for AdjacencyRecord { node, successors } in records {
            num_lines += 1;
            lists[partitioner.partition_of(node)]
                .entry(node)
                .or_default()
                .extend(successors);
        }
        let num_records = lists.iter().map(|p| p.len()).sum::<usize>();
        if num_lines != num_records {
            log::warn!("Some nodes appear on more than one line: their successor lists have been concatenated");
        }

        let partitions = lists
            .into_par_iter()
            .map(|partition| {
                partition
                    .into_iter()
                    .map(|(node, succ)| (node, succ.into_boxed_slice()))
                    .collect::<NodeMap<_>>()
            })
            .collect::<Vec<_>>()
            .into_boxed_slice();

        let num_arcs = partitions
            .iter()
            .flat_map(|p| p.values())
            .map(|succ| succ.len() as u64)
            .sum();
        let num_linked = partitions
            .iter()
            .flat_map(|p| p.values())
            .filter(|succ| !succ.is_empty())
            .count();
        let domain = Self::compute_domain(&partitions, partitioner);

        Self {
            partitioner,
            partitions,
            domain,
            num_records,
            num_arcs,
            num_linked,
        }
    }

    /// Collects, for each partition, the sorted list of nodes having a line
    /// or appearing as a successor.
    fn compute_domain(
        partitions: &[NodeMap<Box<[NodeId]>>],
        partitioner: Partitioner,
    ) -> Box<[Box<[NodeId]>]> {
        let num_partitions = partitioner.num_partitions();
        // Each source partition sends every node it mentions to the
        // partition owning it...
        let buckets = partitions
            .par_iter()
            .map(|partition| {
                let mut out = vec![Vec::new(); num_partitions];
                for (&node, succ) in partition {
                    out[partitioner.partition_of(node)].push(node);
                    for &s in succ.iter() {
                        out[partitioner.partition_of(s)].push(s);
                    }
                }
                out
            })
            .collect::<Vec<_>>();
        // ...which then sorts and deduplicates what it received.
        (0..num_partitions)
            .into_par_iter()
            .map(|q| {
                let mut nodes = buckets
                    .iter()
                    .flat_map(|out| out[q].iter().copied())
                    .collect::<Vec<_>>();
                nodes.sort_unstable();
                nodes.dedup();
                nodes.into_boxed_slice()
            })
            .collect::<Vec<_>>()
            .into_boxed_slice()
    }

    /// Returns the partitioner of this store.
    #[inline(always)]
    pub fn partitioner(&self) -> Partitioner {
        self.partitioner
    }

    /// Returns the number of partitions.
    #[inline(always)]
    pub fn num_partitions(&self) -> usize {
        self.partitioner.num_partitions()
    }

    /// Returns the successor lists of the nodes in the given partition.
    #[inline(always)]
    pub fn partition(&self, index: usize) -> &NodeMap<Box<[NodeId]>> {
        &self.partitions[index]
    }

    /// Returns the sorted nodes of the domain belonging to the given
    /// partition.
    #[inline(always)]
    pub fn domain_partition(&self, index: usize) -> &[NodeId] {
        &self.domain[index]
    }

    /// Returns an iterator over all nodes with a line, with their successors,
    /// in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &[NodeId])> + '_ {
        self.partitions
            .iter()
            .flat_map(|p| p.iter().map(|(&node, succ)| (node, &**succ)))
    }

    /// Returns the node domain (nodes having a line or appearing as a
    /// successor) in increasing order.
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut nodes = self.domain.concat();
        nodes.par_sort_unstable();
        nodes
    }

    /// Returns the size of the node domain.
    pub fn num_nodes(&self) -> usize {
        self.domain.iter().map(|p| p.len()).sum()
    }

    /// Returns the number of distinct nodes having a line.
    pub fn num_records(&self) -> usize {
        self.num_records
    }

    /// Returns the number of arcs.
    pub fn num_arcs(&self) -> u64 {
        self.num_arcs
    }

    /// Returns the number of nodes of the domain without successors.
    pub fn num_dangling(&self) -> usize {
        self.num_nodes() - self.num_linked
    }
}
