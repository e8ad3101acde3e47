// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Process exit codes shared by both tools.

use bildwerk_core::BildwerkError;
use bildwerk_core::human_errors::humanize_error;

pub const SUCCESS: u8 = 0;
/// Conversion failed, the input file does not exist, or it could not be
/// decoded or encoded.
pub const FAILURE: u8 = 1;
/// Bad or missing arguments. clap exits with this code on its own.
pub const USAGE: u8 = 2;
// 3 means "image library missing"; the codecs are linked in, so it is never returned.

/// Print `err` for a person on stderr and return the exit code for it.
///
/// Every error that ends a run is a failure, including a format with no
/// compiled-in codec.
pub fn report(err: &BildwerkError) -> u8 {
    tracing::error!(error = %err, "run failed");
    eprintln!("{}", humanize_error(err));
    FAILURE
}
