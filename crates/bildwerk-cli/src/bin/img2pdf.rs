// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// img2pdf — entry point. Parses arguments, initialises logging, and exports
// the image.
//
// Usage: img2pdf /abs/path/to/image.png -o /abs/path/to/out.pdf

use std::process::ExitCode;

use clap::Parser;

use bildwerk_cli::img2pdf::{self, Args};
use bildwerk_cli::logging;

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    ExitCode::from(img2pdf::run(&args))
}
