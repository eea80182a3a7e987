/*
 * SPDX-FileCopyrightText: 2026 The logrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![cfg(feature = "cli")]

use anyhow::Result;
use logrank::cli::cli_main;
use logrank::prelude::*;
use std::path::{Path, PathBuf};

const GRAPH: &str = "# 0 → 2, 1 → 2, 3 → 2, 2 → 0, 4 dangling\n0 2\n1 2\n3 2\n2 0\n4\n";

fn write_graph(dir: &Path, content: &str) -> Result<PathBuf> {
    let path = dir.join("graph.txt");
    std::fs::write(&path, content)?;
    Ok(path)
}

fn pagerank(input: &Path, output: &Path, extra: &[&str]) -> Result<()> {
    let mut args = vec![
        "logrank".to_owned(),
        "pagerank".to_owned(),
        input.display().to_string(),
        "-o".to_owned(),
        output.display().to_string(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    cli_main(args)
}

#[test]
fn test_pagerank_json() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir()?;
    let input = write_graph(dir.path(), GRAPH)?;
    let output = dir.path().join("out").join("ranks.json");
    pagerank(
        &input,
        &output,
        &["--num-nodes", "5", "--iterations", "20", "--fmt", "json", "-k", "3", "-j", "2"],
    )?;

    let results: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&output)?)?;
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["node"], 2);
    assert_eq!(results[1]["node"], 0);
    let masses = results
        .iter()
        .map(|r| r["log_mass"].as_f64().unwrap())
        .collect::<Vec<_>>();
    assert!(masses.windows(2).all(|w| w[0] >= w[1]));
    assert!(masses.iter().all(|&m| m < 0.0));
    Ok(())
}

#[test]
fn test_pagerank_ascii_matches_library() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = write_graph(dir.path(), GRAPH)?;
    let output = dir.path().join("ranks.tsv");
    pagerank(
        &input,
        &output,
        &["-n", "5", "-i", "15", "-p", "0.3", "--partitions", "3"],
    )?;

    let store = AdjacencyStore::load(&input, Partitioner::new(3))?;
    let mut pr = LogPageRank::new(
        &store,
        RankParams::new(5)?.with_jump_probability(0.3)?,
    );
    pr.run(15);
    let expected = pr.top_k(100);

    let content = std::fs::read_to_string(&output)?;
    let lines = content.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 5);
    for (line, result) in lines.iter().zip(&expected) {
        let (node, log_mass) = line.split_once('\t').unwrap();
        assert_eq!(node.parse::<NodeId>()?, result.node);
        assert!((log_mass.parse::<f64>()? - result.log_mass).abs() < 1E-12);
    }
    Ok(())
}

#[test]
fn test_precision() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = write_graph(dir.path(), "0 1\n1 0\n")?;
    let output = dir.path().join("ranks.tsv");
    pagerank(&input, &output, &["-n", "2", "-i", "3", "--precision", "4"])?;
    let content = std::fs::read_to_string(&output)?;
    assert_eq!(content, "0\t-0.6931\n1\t-0.6931\n");
    Ok(())
}

#[test]
fn test_config_errors() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = write_graph(dir.path(), GRAPH)?;
    let output = dir.path().join("ranks.tsv");

    for (extra, expected) in [
        (
            &["-n", "0", "-i", "5"][..],
            ConfigError::NonPositiveNodes(0),
        ),
        (&["-n", "-2", "-i", "5"][..], ConfigError::NonPositiveNodes(-2)),
        (
            &["-n", "5", "-i", "-1"][..],
            ConfigError::NegativeIterations(-1),
        ),
        (
            &["-n", "5", "-i", "5", "-p", "1.5"][..],
            ConfigError::JumpProbability(1.5),
        ),
        (
            &["-n", "5", "-i", "5", "--partitions", "0"][..],
            ConfigError::ZeroPartitions,
        ),
    ] {
        let err = pagerank(&input, &output, extra).unwrap_err();
        assert_eq!(err.downcast_ref::<ConfigError>(), Some(&expected));
        assert!(!output.exists());
    }
    Ok(())
}

#[test]
fn test_parse_error() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = write_graph(dir.path(), "0 1\n1 0\n2 zero\n")?;
    let output = dir.path().join("ranks.tsv");
    let err = pagerank(&input, &output, &["-n", "3", "-i", "5"]).unwrap_err();
    let parse_error = err.downcast_ref::<ParseError>().unwrap();
    assert_eq!(parse_error.line, 3);
    assert_eq!(parse_error.token, "zero");
    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("ranks.tsv");
    assert!(pagerank(&dir.path().join("nope.txt"), &output, &["-n", "3", "-i", "5"]).is_err());
    assert!(!output.exists());
}

#[test]
fn test_stats() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = write_graph(dir.path(), GRAPH)?;
    cli_main(["logrank", "stats", input.to_str().unwrap()])
}
