/*
 * SPDX-FileCopyrightText: 2026 The logrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::io::Write;
use std::path::Path;

fn main() {
    // Collects version, git and toolchain information for `--version`.
    built::write_built_file().expect("Failed to acquire build-time information");

    // The build date printed by `--version`
    let out_dir = std::env::var("OUT_DIR").expect("OUT_DIR is not set");
    let mut built_rs = std::fs::OpenOptions::new()
        .append(true)
        .open(Path::new(&out_dir).join("built.rs"))
        .expect("Cannot open the build-time information file");
    writeln!(
        built_rs,
        "/// The UTC date and time of the build.\npub static BUILD_DATE: &str = \"{}\";",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )
    .expect("Cannot write the build date");
}
