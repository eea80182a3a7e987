/*
 * SPDX-FileCopyrightText: 2026 The logrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{get_thread_pool, GlobalArgs, NumThreadsArg};
use crate::graph::adjacency::AdjacencyStore;
use crate::partition::Partitioner;
use anyhow::Result;
use clap::Parser;
use dsi_progress_logger::{progress_logger, ProgressLog};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "stats",
    about = "Print the number of nodes, arcs, and dangling nodes of an adjacency list.",
    long_about = None
)]
pub struct CliArgs {
    /// The adjacency list.
    pub input: PathBuf,

    #[clap(flatten)]
    pub num_threads: NumThreadsArg,
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    let mut pl = progress_logger![];
    pl.display_memory(true);
    if let Some(log_interval) = global_args.log_interval {
        pl.log_interval(log_interval);
    }

    let thread_pool = get_thread_pool(args.num_threads.num_threads)?;
    let store = thread_pool.install(|| {
        AdjacencyStore::load_with_logging(
            &args.input,
            Partitioner::new(4 * args.num_threads.num_threads),
            &mut pl,
        )
    })?;

    println!("nodes with a line:\t{}", store.num_records());
    println!("arcs:\t{}", store.num_arcs());
    println!("dangling nodes:\t{}", store.num_dangling());
    println!("nodes:\t{}", store.num_nodes());

    Ok(())
}
