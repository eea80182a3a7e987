/*
 * SPDX-FileCopyrightText: 2026 The logrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use logrank::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn table(records: &[(NodeId, f64)], num_partitions: usize) -> RankTable {
    RankTable::from_records(
        records
            .iter()
            .map(|&(node, log_mass)| RankRecord { node, log_mass }),
        Partitioner::new(num_partitions),
    )
}

fn nodes(results: &[RankedResult]) -> Vec<NodeId> {
    results.iter().map(|r| r.node).collect()
}

#[test]
fn test_order() {
    let t = table(&[(1, -3.0), (2, -1.0), (3, -2.0), (4, -0.5)], 2);
    let best = top_k(&t, 3);
    assert_eq!(nodes(&best), vec![4, 2, 3]);
    assert_eq!(best[0].log_mass, -0.5);
    assert!((best[0].mass() - (-0.5f64).exp()).abs() < 1E-15);
}

#[test]
fn test_ties() {
    let t = table(&[(9, -1.0), (3, -1.0), (7, -1.0), (1, -2.0), (5, -1.0)], 3);
    assert_eq!(nodes(&top_k(&t, 3)), vec![3, 5, 7]);
    assert_eq!(nodes(&top_k(&t, 5)), vec![3, 5, 7, 9, 1]);
}

#[test]
fn test_small_k() {
    let t = table(&[(1, -3.0), (2, -1.0)], 4);
    assert!(top_k(&t, 0).is_empty());
    assert_eq!(nodes(&top_k(&t, 10)), vec![2, 1]);
    assert!(top_k(&table(&[], 2), 5).is_empty());
}

#[test]
fn test_huge_k() {
    let t = table(&[(1, -3.0), (2, -1.0)], 3);
    assert_eq!(nodes(&top_k(&t, usize::MAX)), vec![2, 1]);
    assert_eq!(nodes(&top_k(&t, 1 << 60)), vec![2, 1]);
    assert!(top_k(&table(&[], 1), usize::MAX).is_empty());
}

#[test]
fn test_zero_mass() {
    let t = table(&[(1, LOG_ZERO), (2, -700.0), (3, LOG_ZERO)], 2);
    assert_eq!(nodes(&top_k(&t, 3)), vec![2, 1, 3]);
}

#[test]
fn test_partitioning_does_not_matter() {
    let mut rng = SmallRng::seed_from_u64(0);
    // Few distinct masses, so that there are many ties
    let records = (0..1000)
        .map(|node| (node, -(rng.random_range(0..20) as f64)))
        .collect::<Vec<(NodeId, f64)>>();

    let mut expected = records.clone();
    expected.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    let expected = expected[..50].iter().map(|r| r.0).collect::<Vec<_>>();

    for num_partitions in [1, 2, 7, 64] {
        for num_threads in [1, 3] {
            let thread_pool = rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build()
                .unwrap();
            let best = thread_pool.install(|| top_k(&table(&records, num_partitions), 50));
            assert_eq!(
                nodes(&best),
                expected,
                "partitions={num_partitions} threads={num_threads}"
            );
        }
    }
}
