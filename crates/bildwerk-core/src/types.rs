// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Bildwerk image tools.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// File extensions (lowercase, without the dot) the grayscale converter accepts.
pub const SUPPORTED_EXTENSIONS: [&str; 8] =
    ["jpg", "jpeg", "png", "gif", "bmp", "tiff", "tif", "webp"];

/// Whether the extension of `path` is one of [`SUPPORTED_EXTENSIONS`].
///
/// The comparison is case-insensitive. Paths without an extension are
/// never supported.
pub fn is_supported_format(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let lower = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}

/// Strategy used to turn a colour image into a grayscale or black-and-white one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrayscaleMethod {
    /// Single 8-bit luminance channel.
    #[default]
    #[serde(rename = "L")]
    Luma,
    /// Luminance plus the source alpha channel.
    #[serde(rename = "LA")]
    LumaAlpha,
    /// Thresholded black/white, every pixel 0 or 255.
    #[serde(rename = "1")]
    BiLevel,
    /// `floor(0.299 R + 0.587 G + 0.114 B)` per pixel.
    #[serde(rename = "weighted")]
    Weighted,
    /// Saturation scaled to zero; stays three-channel RGB.
    #[serde(rename = "desaturate")]
    Desaturate,
}

impl GrayscaleMethod {
    /// All methods, in the order they are listed on the command line.
    pub const ALL: [GrayscaleMethod; 5] = [
        Self::Luma,
        Self::LumaAlpha,
        Self::BiLevel,
        Self::Weighted,
        Self::Desaturate,
    ];

    /// The command-line tag for this method.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Luma => "L",
            Self::LumaAlpha => "LA",
            Self::BiLevel => "1",
            Self::Weighted => "weighted",
            Self::Desaturate => "desaturate",
        }
    }

    /// Look up a method by its exact tag.
    pub fn parse_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.tag() == tag)
    }

    /// Resolve a tag, falling back to [`GrayscaleMethod::Luma`] with a
    /// warning when the tag is not recognised.
    pub fn from_tag(tag: &str) -> Self {
        Self::parse_tag(tag).unwrap_or_else(|| {
            warn!(method = tag, "Unknown method, using default 'L' method");
            Self::Luma
        })
    }
}

impl std::fmt::Display for GrayscaleMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// One grayscale conversion, built once from the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub method: GrayscaleMethod,
    /// Only meaningful when `input` is a directory.
    pub recursive: bool,
}

/// Success and attempt counts accumulated over a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTally {
    pub succeeded: usize,
    pub total: usize,
}

impl BatchTally {
    pub fn new(succeeded: usize, total: usize) -> Self {
        debug_assert!(succeeded <= total);
        Self { succeeded, total }
    }

    /// Record one attempted file.
    pub fn record(&mut self, success: bool) {
        self.total += 1;
        if success {
            self.succeeded += 1;
        }
    }

    pub fn failed(&self) -> usize {
        self.total - self.succeeded
    }

    pub fn outcome(&self) -> BatchOutcome {
        if self.succeeded == 0 {
            BatchOutcome::NoneConverted
        } else if self.succeeded == self.total {
            BatchOutcome::AllConverted
        } else {
            BatchOutcome::Partial
        }
    }
}

impl From<BatchTally> for (usize, usize) {
    fn from(tally: BatchTally) -> Self {
        (tally.succeeded, tally.total)
    }
}

/// Overall result of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchOutcome {
    /// Every attempted file converted.
    AllConverted,
    /// At least one success and at least one failure.
    Partial,
    /// Nothing converted, including the case where nothing was attempted.
    NoneConverted,
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A3 => (297, 420),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Tabloid => (279, 432),
        }
    }
}

/// How an exported image is placed on its PDF page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PageLayout {
    /// The page is exactly the size of the image rendered at `dpi`.
    FitImage { dpi: f32 },
    /// The image is centred on a standard sheet inside a margin, never upscaled.
    Paper(PaperSize),
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::FitImage { dpi: 72.0 }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn supported_extensions_are_case_insensitive() {
        for name in [
            "a.jpg", "a.JPEG", "b.png", "c.Gif", "d.bmp", "e.TIFF", "f.tif", "g.webp",
        ] {
            assert!(is_supported_format(name), "{name} should be supported");
        }
    }

    #[test]
    fn unsupported_extensions_are_rejected() {
        for name in ["notes.txt", "logo.svg", "archive.tar.gz", "README", ".png"] {
            assert!(!is_supported_format(name), "{name} should be rejected");
        }
    }

    #[test]
    fn tags_round_trip() {
        for method in GrayscaleMethod::ALL {
            assert_eq!(GrayscaleMethod::parse_tag(method.tag()), Some(method));
        }
        assert_eq!(GrayscaleMethod::parse_tag("l"), None);
    }

    #[test]
    fn unknown_tag_falls_back_to_luma() {
        assert_eq!(GrayscaleMethod::from_tag("foo"), GrayscaleMethod::Luma);
        assert_eq!(GrayscaleMethod::from_tag("weighted"), GrayscaleMethod::Weighted);
    }

    /// Collects everything a `fmt` subscriber writes.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn resolve(&self, tag: &str) -> GrayscaleMethod {
            let writer = self.clone();
            let subscriber = tracing_subscriber::fmt()
                .with_writer(move || writer.clone())
                .with_ansi(false)
                .with_max_level(tracing::Level::WARN)
                .finish();
            tracing::subscriber::with_default(subscriber, || GrayscaleMethod::from_tag(tag))
        }

        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[test]
    fn unknown_tag_logs_a_warning() {
        let logs = CapturedLogs::default();
        assert_eq!(logs.resolve("foo"), GrayscaleMethod::Luma);

        let text = logs.text();
        assert!(text.contains("WARN"), "{text}");
        assert!(text.contains("Unknown method, using default 'L' method"), "{text}");
        assert!(text.contains("foo"), "{text}");
    }

    #[test]
    fn known_tag_logs_nothing() {
        let logs = CapturedLogs::default();
        assert_eq!(logs.resolve("desaturate"), GrayscaleMethod::Desaturate);
        assert!(logs.text().is_empty());
    }

    #[test]
    fn tally_counts_each_attempt_once() {
        let mut tally = BatchTally::default();
        tally.record(true);
        tally.record(false);
        tally.record(true);
        assert_eq!(<(usize, usize)>::from(tally), (2, 3));
        assert_eq!(tally.failed(), 1);
        assert_eq!(tally.outcome(), BatchOutcome::Partial);
    }

    #[test]
    fn empty_tally_is_none_converted() {
        assert_eq!(BatchTally::default().outcome(), BatchOutcome::NoneConverted);
        assert_eq!(BatchTally::new(4, 4).outcome(), BatchOutcome::AllConverted);
    }

    #[test]
    fn tally_serialises_as_json_object() {
        let json = serde_json::to_string(&BatchTally::new(3, 5)).unwrap();
        assert_eq!(json, r#"{"succeeded":3,"total":5}"#);
    }

    #[test]
    fn default_layout_is_image_sized_page() {
        assert_eq!(PageLayout::default(), PageLayout::FitImage { dpi: 72.0 });
    }
}
