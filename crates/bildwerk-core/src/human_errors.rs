// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for command-line users.
//
// Every technical error is mapped to plain English with a clear suggestion.

use crate::error::BildwerkError;
use crate::types::SUPPORTED_EXTENSIONS;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Running the same command again may succeed.
    Transient,
    /// User must fix something (wrong path, wrong file type).
    ActionRequired,
    /// Cannot be fixed by retrying, e.g. a damaged file.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Severity level.
    pub severity: Severity,
}

impl std::fmt::Display for HumanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n  {}", self.message, self.suggestion)
    }
}

/// Convert a `BildwerkError` into a `HumanError`.
pub fn humanize_error(err: &BildwerkError) -> HumanError {
    match err {
        BildwerkError::InputNotFound(path) => HumanError {
            message: format!("The file {} couldn't be found.", path.display()),
            suggestion: "Check the path for typos, or use an absolute path.".into(),
            severity: Severity::ActionRequired,
        },

        BildwerkError::UnsupportedFormat(path) => HumanError {
            message: format!("{} is not a supported image type.", path.display()),
            suggestion: format!(
                "Supported extensions are: {}.",
                SUPPORTED_EXTENSIONS.join(", ")
            ),
            severity: Severity::ActionRequired,
        },

        BildwerkError::CodecUnavailable(detail) => HumanError {
            message: "This build can't read or write that image format.".into(),
            suggestion: format!("Convert the file to PNG or JPEG first. ({detail})"),
            severity: Severity::Permanent,
        },

        BildwerkError::ImageError(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged, or the output extension may not support the converted colour mode. Try saving as PNG.".into(),
            severity: Severity::Permanent,
        },

        BildwerkError::PdfError(_) => HumanError {
            message: "The PDF couldn't be created.".into(),
            suggestion: "Try again with a smaller image, or a different output location.".into(),
            severity: Severity::Permanent,
        },

        BildwerkError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError {
                message: "A file or folder couldn't be found.".into(),
                suggestion: "It may have been moved or deleted while converting.".into(),
                severity: Severity::ActionRequired,
            },
            std::io::ErrorKind::PermissionDenied => HumanError {
                message: "Permission denied while reading or writing a file.".into(),
                suggestion: "Check the permissions of the input file and the output folder.".into(),
                severity: Severity::ActionRequired,
            },
            _ => HumanError {
                message: "There was a problem reading or writing a file.".into(),
                suggestion: "Try again. If this keeps happening, the disk may be full.".into(),
                severity: Severity::Transient,
            },
        },

        BildwerkError::Serialization(_) => HumanError {
            message: "The summary couldn't be written as JSON.".into(),
            suggestion: "Try again without --json.".into(),
            severity: Severity::Transient,
        },
    }
}
