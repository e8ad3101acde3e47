// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bwconvert — entry point. Parses arguments, initialises logging, and runs a
// single-file or directory conversion.

use std::process::ExitCode;

use clap::Parser;

use bildwerk_cli::bwconvert::{self, Args};
use bildwerk_cli::{exit, logging};

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);
    tracing::debug!(?args, "Parsed arguments");

    let code = match bwconvert::run(&args) {
        Ok(code) => code,
        Err(err) => exit::report(&err),
    };
    ExitCode::from(code)
}
