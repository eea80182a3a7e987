/*
 * SPDX-FileCopyrightText: 2026 The logrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]
// for now we don't need any new feature but we might remove this in the future
#![deny(unstable_features)]
#![deny(trivial_casts)]
#![deny(unconditional_recursion)]
#![deny(clippy::empty_loop)]
#![deny(unreachable_code)]
#![deny(unreachable_pub)]
#![deny(unreachable_patterns)]
#![deny(unused_macro_rules)]
#![deny(unused_doc_comments)]

#[cfg(feature = "cli")]
pub mod cli;
pub mod graph;
pub mod logspace;
pub mod partition;
pub mod rank;

/// The type of node identifiers.
///
/// Identifiers are arbitrary unsigned integers: they need not be contiguous,
/// and their order carries no meaning except for tie-breaking in
/// [`top_k`](crate::rank::top_k::top_k).
pub type NodeId = u64;

/// Prelude module to import everything from this crate
pub mod prelude {
    pub use crate::graph::adjacency::*;
    pub use crate::logspace::*;
    pub use crate::partition::*;
    pub use crate::rank::*;
    pub use crate::NodeId;
}
