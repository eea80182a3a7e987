/*
 * SPDX-FileCopyrightText: 2026 The logrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Parameters of the ranking computation and their validation.

/// Invalid parameters; detected before any iteration runs.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("The number of nodes must be positive, got {0}")]
    NonPositiveNodes(i64),
    #[error("The number of iterations cannot be negative, got {0}")]
    NegativeIterations(i64),
    #[error("The random-jump probability must be in [0 . . 1], got {0}")]
    JumpProbability(f64),
    #[error("The number of partitions must be positive")]
    ZeroPartitions,
}

/// Validated parameters of [`LogPageRank`](super::LogPageRank).
///
/// The number of nodes is supplied externally (it is not inferred from the
/// input) and is used both for the uniform initialization, in which every
/// node has mass 1/*n*, and for the normalization of the random jump and of
/// the redistributed dangling mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankParams {
    num_nodes: usize,
    jump_probability: f64,
}

impl RankParams {
    pub const DEFAULT_JUMP_PROBABILITY: f64 = 0.15;

    /// Creates parameters for a graph with the given number of nodes and the
    /// default random-jump probability.
    pub fn new(num_nodes: i64) -> Result<Self, ConfigError> {
        if num_nodes <= 0 {
            return Err(ConfigError::NonPositiveNodes(num_nodes));
        }
        Ok(Self {
            num_nodes: num_nodes as usize,
            jump_probability: Self::DEFAULT_JUMP_PROBABILITY,
        })
    }

    /// Sets the random-jump probability.
    pub fn with_jump_probability(mut self, jump_probability: f64) -> Result<Self, ConfigError> {
        // Note that this rejects NaN
        if !(0.0..=1.0).contains(&jump_probability) {
            return Err(ConfigError::JumpProbability(jump_probability));
        }
        self.jump_probability = jump_probability;
        Ok(self)
    }

    /// Returns the number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Returns the random-jump probability.
    pub fn jump_probability(&self) -> f64 {
        self.jump_probability
    }

    /// ln *n*.
    pub(crate) fn log_num_nodes(&self) -> f64 {
        (self.num_nodes as f64).ln()
    }

    /// The logarithm of the mass every node receives from the random jump,
    /// that is, ln(*p* / *n*).
    pub(crate) fn log_jump(&self) -> f64 {
        self.jump_probability.ln() - self.log_num_nodes()
    }

    /// The logarithm of the probability of following an arc, ln(1 − *p*).
    pub(crate) fn log_follow(&self) -> f64 {
        (-self.jump_probability).ln_1p()
    }
}

/// Validates a number of iterations.
pub fn checked_iterations(iterations: i64) -> Result<usize, ConfigError> {
    usize::try_from(iterations).map_err(|_| ConfigError::NegativeIterations(iterations))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_nodes() {
        assert_eq!(RankParams::new(0), Err(ConfigError::NonPositiveNodes(0)));
        assert_eq!(RankParams::new(-3), Err(ConfigError::NonPositiveNodes(-3)));
        let params = RankParams::new(10).unwrap();
        assert_eq!(params.num_nodes(), 10);
        assert_eq!(params.jump_probability(), 0.15);
    }

    #[test]
    fn test_jump_probability() {
        let params = RankParams::new(4).unwrap();
        assert!(params.with_jump_probability(-0.1).is_err());
        assert!(params.with_jump_probability(1.5).is_err());
        assert!(params.with_jump_probability(f64::NAN).is_err());
        let params = params.with_jump_probability(0.5).unwrap();
        assert!((params.log_jump() - (0.5f64 / 4.0).ln()).abs() < 1E-15);
        assert!((params.log_follow() - 0.5f64.ln()).abs() < 1E-15);
    }

    #[test]
    fn test_iterations() {
        assert_eq!(checked_iterations(0), Ok(0));
        assert_eq!(checked_iterations(12), Ok(12));
        assert_eq!(
            checked_iterations(-1),
            Err(ConfigError::NegativeIterations(-1))
        );
    }
}
