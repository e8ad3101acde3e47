// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-invocation settings for the converters.

use serde::{Deserialize, Serialize};

use crate::{ConversionRequest, GrayscaleMethod, PageLayout};

/// Settings for a directory conversion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Conversion applied to every file.
    pub method: GrayscaleMethod,
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Inserted between the file stem and its extension in output names.
    pub suffix: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            method: GrayscaleMethod::Luma,
            recursive: false,
            suffix: "_bw".into(),
        }
    }
}

impl From<&ConversionRequest> for BatchConfig {
    /// Batch settings for a directory request, keeping the default suffix.
    fn from(request: &ConversionRequest) -> Self {
        Self {
            method: request.method,
            recursive: request.recursive,
            ..Self::default()
        }
    }
}

/// Settings for a single image-to-PDF export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PdfExportConfig {
    /// Page sizing and image placement.
    pub layout: PageLayout,
    /// Title written to the PDF metadata; the input file stem when unset.
    pub title: Option<String>,
}
