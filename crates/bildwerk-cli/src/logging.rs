// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Log initialisation for the binaries.

use tracing_subscriber::EnvFilter;

/// Filter directive for the chosen verbosity.
pub fn level_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Install the global `tracing` subscriber, writing to stderr so stdout only
/// carries results.
pub fn init(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level_directive(verbose)))
        .with_writer(std::io::stderr)
        .init();
}
