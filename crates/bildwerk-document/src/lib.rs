// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bildwerk-document — Image conversion for the Bildwerk tools.
//
// Provides colour-model conversions (luma, luma+alpha, 1-bit, weighted luma,
// desaturation), single-file and batch grayscale conversion, and single-page
// image-to-PDF export.

pub mod convert;
pub mod image;
pub mod pdf;

// Re-export the primary structs so callers can use `bildwerk_document::PdfWriter` etc.
pub use crate::convert::GrayscaleConverter;
pub use crate::image::processor::ImageProcessor;
pub use crate::pdf::reader::PdfReader;
pub use crate::pdf::writer::PdfWriter;
