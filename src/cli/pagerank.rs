/*
 * SPDX-FileCopyrightText: 2026 The logrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{get_thread_pool, GlobalArgs, NumThreadsArg, RecordFormat};
use crate::graph::adjacency::AdjacencyStore;
use crate::partition::Partitioner;
use crate::rank::{checked_iterations, ConfigError, LogPageRank, RankParams};
use anyhow::Result;
use clap::Parser;
use dsi_progress_logger::{progress_logger, ProgressLog};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pagerank",
    about = "Compute PageRank in log space with a fixed number of iterations.",
    long_about = None
)]
pub struct CliArgs {
    /// The adjacency list: one line per node, containing the node identifier
    /// followed by the identifiers of its successors.
    pub input: PathBuf,

    #[arg(short, long, allow_negative_numbers = true)]
    /// The number of nodes of the graph.
    pub num_nodes: i64,

    #[arg(short, long, allow_negative_numbers = true)]
    /// The number of iterations.
    pub iterations: i64,

    #[arg(short = 'p', long, default_value_t = RankParams::DEFAULT_JUMP_PROBABILITY)]
    /// The random-jump probability (must be in the interval [0 . . 1]).
    pub jump_probability: f64,

    #[arg(short = 'k', long, default_value_t = 100)]
    /// How many of the best-ranked nodes to output.
    pub top_k: usize,

    #[arg(long)]
    /// The number of partitions (default: four per thread).
    pub partitions: Option<usize>,

    #[arg(short, long)]
    /// Where to store the results (default: standard output).
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = RecordFormat::Ascii)]
    /// The output format.
    pub fmt: RecordFormat,

    #[arg(long)]
    /// Decimal digits of the output log-masses.
    pub precision: Option<usize>,

    #[clap(flatten)]
    pub num_threads: NumThreadsArg,
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    // Validate everything before reading the input
    let params =
        RankParams::new(args.num_nodes)?.with_jump_probability(args.jump_probability)?;
    let iterations = checked_iterations(args.iterations)?;
    let num_partitions = args
        .partitions
        .unwrap_or(4 * args.num_threads.num_threads);
    if num_partitions == 0 {
        return Err(ConfigError::ZeroPartitions.into());
    }

    let mut pl = progress_logger![];
    pl.display_memory(true);
    if let Some(log_interval) = global_args.log_interval {
        pl.log_interval(log_interval);
    }

    let thread_pool = get_thread_pool(args.num_threads.num_threads)?;

    log::info!("Loading the adjacency list from {}", args.input.display());
    let store = thread_pool.install(|| {
        AdjacencyStore::load_with_logging(&args.input, Partitioner::new(num_partitions), &mut pl)
    })?;
    log::info!(
        "{} nodes with a line, {} arcs, {} nodes in the domain",
        store.num_records(),
        store.num_arcs(),
        store.num_nodes()
    );

    let mut pr = LogPageRank::new(&store, params);
    thread_pool.install(|| pr.run_with_logging(iterations, &mut pl));

    if let Some(stats) = pr.last_stats() {
        log::info!(
            "Completed after {} iteration(s), missing mass in the last iteration = {}",
            pr.iterations(),
            stats.missing_mass
        );
    }

    let results = thread_pool.install(|| pr.top_k(args.top_k));
    args.fmt
        .store(args.output.as_deref(), &results, args.precision)?;

    Ok(())
}
