/*
 * SPDX-FileCopyrightText: 2026 The logrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Log-space PageRank and extraction of the best-ranked nodes.

pub mod pagerank;
pub mod params;
pub mod table;
pub mod top_k;

pub use pagerank::{iterate, IterationStats, LogPageRank, NumericDegeneracy};
pub use params::{checked_iterations, ConfigError, RankParams};
pub use table::{RankRecord, RankTable};
pub use top_k::{top_k, RankedResult};
