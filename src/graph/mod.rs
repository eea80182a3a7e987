/*
 * SPDX-FileCopyrightText: 2026 The logrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Graph input.

pub mod adjacency;
