/*
 * SPDX-FileCopyrightText: 2026 The logrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Command-line interface.
//!
//! Subcommands live in submodules; each one has a `CliArgs` struct deriving
//! [`Parser`] and a `main` function receiving the [`GlobalArgs`] and its own
//! arguments.

use crate::rank::RankedResult;
use anyhow::{anyhow, bail, ensure, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{Duration, SystemTime};

pub mod pagerank;
pub mod stats;

pub mod build_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));

    pub fn version_string() -> String {
        format!(
            "{}
git info: {} {} {}
build info: built on {} for {} with {}",
            PKG_VERSION,
            GIT_VERSION.unwrap_or(""),
            GIT_COMMIT_HASH.unwrap_or(""),
            match GIT_DIRTY {
                None => "",
                Some(true) => "(dirty)",
                Some(false) => "(clean)",
            },
            BUILD_DATE,
            TARGET,
            RUSTC_VERSION
        )
    }
}

/// Value parser for `-j`: a positive number of rayon worker threads.
pub fn num_threads_parser(arg: &str) -> Result<usize> {
    let num_threads = arg.parse::<usize>()?;
    ensure!(num_threads > 0, "Number of threads must be greater than 0");
    Ok(num_threads)
}

/// The size of the thread pool running partitions in parallel.
#[derive(Args, Debug)]
pub struct NumThreadsArg {
    #[arg(short = 'j', long, default_value_t = rayon::current_num_threads().max(1), value_parser = num_threads_parser)]
    /// Worker threads; partitions are processed concurrently up to this
    /// number. Defaults to the number of available cores.
    pub num_threads: usize,
}

/// Creates a [`ThreadPool`](rayon::ThreadPool) with the given number of threads.
pub fn get_thread_pool(num_threads: usize) -> Result<rayon::ThreadPool> {
    let thread_pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .context("Failed to create thread pool")?;
    log::info!("Using {} threads", thread_pool.current_num_threads());
    Ok(thread_pool)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
/// Formats for storing ranked results.
pub enum RecordFormat {
    /// ASCII format, one `node<TAB>log-mass` pair per line.
    Ascii,
    /// A JSON array of objects with fields `node` and `log_mass`.
    Json,
}

impl RecordFormat {
    /// Stores ranked results at `path`, or on standard output if `path` is
    /// `None`, using the format defined by `self`.
    ///
    /// `precision` will be used to truncate the log-masses to the specified
    /// number of decimal digits. If `None`, the shortest representation that
    /// parses back to the same value is used.
    pub fn store(
        &self,
        path: Option<&Path>,
        results: &[RankedResult],
        precision: Option<usize>,
    ) -> Result<()> {
        let (out, target): (Box<dyn Write>, String) = match path {
            Some(path) => {
                create_parent_dir(path)?;
                let file = std::fs::File::create(path)
                    .with_context(|| format!("Could not create {}", path.display()))?;
                (Box::new(BufWriter::new(file)), path.display().to_string())
            }
            None => (
                Box::new(BufWriter::new(std::io::stdout().lock())),
                "standard output".to_owned(),
            ),
        };
        log::info!("Storing {} results in {:?} format to {}", results.len(), self, target);
        self.write_to(out, results, precision)
            .with_context(|| format!("Could not write results to {}", target))
    }

    fn write_to(
        &self,
        mut out: impl Write,
        results: &[RankedResult],
        precision: Option<usize>,
    ) -> Result<()> {
        match (self, precision) {
            (RecordFormat::Ascii, None) => {
                for r in results {
                    writeln!(out, "{}\t{}", r.node, r.log_mass)?;
                }
            }
            (RecordFormat::Ascii, Some(precision)) => {
                for r in results {
                    writeln!(out, "{}\t{:.precision$}", r.node, r.log_mass)?;
                }
            }
            (RecordFormat::Json, None) => {
                serde_json::to_writer(&mut out, results)?;
                writeln!(out)?;
            }
            (RecordFormat::Json, Some(precision)) => {
                write!(out, "[")?;
                for (i, r) in results.iter().enumerate() {
                    if i != 0 {
                        write!(out, ",")?;
                    }
                    write!(
                        out,
                        "{{\"node\":{},\"log_mass\":{:.precision$}}}",
                        r.node, r.log_mass
                    )?;
                }
                writeln!(out, "]")?;
            }
        }
        out.flush()?;
        Ok(())
    }
}

/// Makes sure the directory that will contain an output file exists.
pub fn create_parent_dir(file_path: impl AsRef<Path>) -> Result<()> {
    match file_path.as_ref().parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)
            .with_context(|| format!("Could not create output directory {}", dir.display())),
        _ => Ok(()),
    }
}

/// Value parser for `--log-interval`.
///
/// A duration is a sequence of numbers, each followed by a unit among `d`,
/// `h`, `m` and `s`; a final number without unit counts milliseconds. For
/// instance, `2m30s` and `150000` are the same interval. Whitespace is
/// ignored.
fn parse_duration(value: &str) -> Result<Duration> {
    ensure!(
        !value.trim().is_empty(),
        "Empty log interval (use 0 to log at every update)"
    );
    let too_long = || anyhow!("Log interval {value:?} is too long");
    let mut total = Duration::ZERO;
    let mut digits = String::new();
    for c in value.chars().filter(|c| !c.is_whitespace()) {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let seconds_per_unit: u64 = match c {
            'd' => 24 * 60 * 60,
            'h' => 60 * 60,
            'm' => 60,
            's' => 1,
            _ => bail!("Unknown unit {c:?} in log interval {value:?}"),
        };
        let amount = digits
            .parse::<u64>()
            .with_context(|| format!("Missing amount before {c:?} in log interval {value:?}"))?;
        let seconds = amount.checked_mul(seconds_per_unit).ok_or_else(too_long)?;
        total = total
            .checked_add(Duration::from_secs(seconds))
            .ok_or_else(too_long)?;
        digits.clear();
    }
    if !digits.is_empty() {
        total = total
            .checked_add(Duration::from_millis(digits.parse()?))
            .ok_or_else(too_long)?;
    }
    Ok(total)
}

/// Sets up logging for the `logrank` binary.
///
/// Each line carries the wall-clock time, the time elapsed since startup,
/// the level, the thread and the target, so that the per-iteration messages
/// of a long run can be timed. `RUST_LOG` selects what is shown (`info` if
/// unset).
pub fn init_env_logger() -> Result<()> {
    use jiff::fmt::friendly::{Designator, Spacing, SpanPrinter};
    use jiff::SpanRound;

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    let start = std::time::Instant::now();
    let printer = SpanPrinter::new()
        .spacing(Spacing::None)
        .designator(Designator::Compact);
    let span_round = SpanRound::new()
        .largest(jiff::Unit::Day)
        .smallest(jiff::Unit::Millisecond)
        .days_are_24_hours();

    builder.format(move |buf, record| {
        let Ok(ts) = jiff::Timestamp::try_from(SystemTime::now()) else {
            return Err(std::io::Error::other("Failed to get timestamp"));
        };
        let style = buf.default_level_style(record.level());
        let elapsed = start.elapsed();
        let span = jiff::Span::new()
            .seconds(elapsed.as_secs() as i64)
            .milliseconds(elapsed.subsec_millis() as i64);
        let span = span.round(span_round).map_err(std::io::Error::other)?;
        writeln!(
            buf,
            "{} {} {style}{}{style:#} [{:?}] {} - {}",
            ts.strftime("%F %T%.3f"),
            printer.span_to_string(&span),
            record.level(),
            std::thread::current().id(),
            record.target(),
            record.args()
        )
    });
    builder.try_init()?;
    Ok(())
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    #[arg(long, value_parser = parse_duration, global=true, display_order = 1000)]
    /// Minimum time between two progress messages of an iteration (10s if
    /// not given). Units are "d", "h", "m" and "s"; a trailing bare number is
    /// in milliseconds, so "1m30s500" means 90.5 seconds.
    pub log_interval: Option<Duration>,
}

#[derive(Subcommand, Debug)]
pub enum SubCommands {
    #[clap(name = "pagerank", visible_alias = "pr")]
    PageRank(pagerank::CliArgs),
    Stats(stats::CliArgs),
}

#[derive(Parser, Debug)]
#[command(name = "logrank", version=build_info::version_string())]
/// Log-space PageRank on partitioned adjacency lists.
///
/// Noteworthy environment variables:
///
/// - RUST_MIN_STACK: minimum thread stack size (in bytes).
///
/// - RUST_LOG: configuration for env_logger
///   <https://docs.rs/env_logger/latest/env_logger/>; the default is "info".
pub struct Cli {
    #[command(subcommand)]
    pub command: SubCommands,
    #[clap(flatten)]
    pub args: GlobalArgs,
}

/// The entry point of the command-line interface.
pub fn cli_main<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let start = std::time::Instant::now();
    let cli = Cli::parse_from(args);
    match cli.command {
        SubCommands::PageRank(args) => {
            pagerank::main(cli.args, args)?;
        }
        SubCommands::Stats(args) => {
            stats::main(cli.args, args)?;
        }
    }

    log::info!(
        "The command took {}",
        pretty_print_elapsed(start.elapsed().as_secs_f64())
    );

    Ok(())
}

/// Pretty-prints seconds in a human-readable format.
fn pretty_print_elapsed(elapsed: f64) -> String {
    let mut result = String::new();
    let mut elapsed_seconds = elapsed as u64;
    let days = elapsed_seconds / (60 * 60 * 24);
    elapsed_seconds %= 60 * 60 * 24;
    let hours = elapsed_seconds / (60 * 60);
    elapsed_seconds %= 60 * 60;
    let minutes = elapsed_seconds / 60;

    for (value, unit) in [(days, "day"), (hours, "hour"), (minutes, "minute")] {
        match value {
            0 => {}
            1 => result.push_str(&format!("1 {} ", unit)),
            _ => result.push_str(&format!("{} {}s ", value, unit)),
        }
    }

    result.push_str(&format!("{:.3} seconds ({}s)", elapsed % 60.0, elapsed));
    result
}
