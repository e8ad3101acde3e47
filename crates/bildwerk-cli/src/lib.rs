// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bildwerk command-line tools.
//
// Argument definitions and run logic for the two binaries live here so they
// can be tested without spawning processes.

pub mod bwconvert;
pub mod exit;
pub mod img2pdf;
pub mod logging;
