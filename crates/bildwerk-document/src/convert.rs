// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Grayscale conversion of single files and whole directory trees.
//
// Each file is validated (exists, supported extension) before it is decoded.
// A batch run never stops on a bad file: failures are logged, counted, and the
// walk moves on.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, instrument, warn};
use walkdir::WalkDir;

use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::{BatchConfig, BatchTally, GrayscaleMethod, is_supported_format};

use crate::image::processor::ImageProcessor;

/// Converts images to grayscale or black-and-white, one file or a directory at a time.
#[derive(Debug, Clone)]
pub struct GrayscaleConverter {
    /// Inserted before the extension of batch output names.
    suffix: String,
}

impl Default for GrayscaleConverter {
    fn default() -> Self {
        Self::from_config(&BatchConfig::default())
    }
}

impl GrayscaleConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &BatchConfig) -> Self {
        Self {
            suffix: config.suffix.clone(),
        }
    }

    /// Convert one image, reporting the reason on failure.
    ///
    /// The input must exist and carry a supported extension; otherwise nothing
    /// is decoded and `output` is left untouched. Parent directories of
    /// `output` are created before the image is written.
    #[instrument(skip_all, fields(input = %input.as_ref().display(), method = %method))]
    pub fn try_convert_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        method: GrayscaleMethod,
    ) -> Result<()> {
        let (input, output) = (input.as_ref(), output.as_ref());

        if !input.exists() {
            return Err(BildwerkError::InputNotFound(input.to_path_buf()));
        }
        if !is_supported_format(input) {
            return Err(BildwerkError::UnsupportedFormat(input.to_path_buf()));
        }

        info!("Opening image: {}", input.display());
        let original = ImageProcessor::open(input)?;
        let (width, height, source_color) =
            (original.width(), original.height(), original.color());

        let converted = original.convert(method);

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        info!("Saving converted image: {}", output.display());
        converted.save(output)?;

        debug!(
            width,
            height,
            source = ?source_color,
            converted = ?converted.color(),
            "Conversion complete"
        );
        Ok(())
    }

    /// Convert one image, returning `true` on success.
    ///
    /// Every failure is logged and reported as `false`; nothing propagates.
    pub fn convert_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        method: GrayscaleMethod,
    ) -> bool {
        match self.try_convert_file(input.as_ref(), output.as_ref(), method) {
            Ok(()) => true,
            Err(err) => {
                error!(input = %input.as_ref().display(), "Error converting image: {}", err);
                false
            }
        }
    }

    /// Convert every supported image under `input_dir` into `output_dir`.
    ///
    /// Relative paths are mirrored under `output_dir` and the configured
    /// suffix is inserted before each extension. Without `recursive` only the
    /// immediate children of `input_dir` are considered.
    ///
    /// A missing `input_dir` yields an empty tally and creates nothing.
    #[instrument(skip_all, fields(input_dir = %input_dir.as_ref().display(), method = %method, recursive = recursive))]
    pub fn batch_convert(
        &self,
        input_dir: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        method: GrayscaleMethod,
        recursive: bool,
    ) -> BatchTally {
        let (input_dir, output_dir) = (input_dir.as_ref(), output_dir.as_ref());
        let mut tally = BatchTally::default();

        if !input_dir.is_dir() {
            error!("Input directory does not exist: {}", input_dir.display());
            return tally;
        }

        if let Err(err) = std::fs::create_dir_all(output_dir) {
            error!(
                "Failed to create output directory {}: {}",
                output_dir.display(),
                err
            );
            return tally;
        }

        // Snapshot the candidates before writing anything, so files created
        // during the run are never picked up again.
        let candidates = collect_images(input_dir, recursive);
        info!(count = candidates.len(), "Found images to convert");

        for file in candidates {
            let Some(target) = self.output_path(input_dir, &file, output_dir) else {
                warn!("Skipping {}: not under the input directory", file.display());
                continue;
            };

            let success = self.convert_into(&file, &target, method);
            tally.record(success);
            if success {
                info!("Converted: {} -> {}", file.display(), target.display());
            } else {
                error!("Failed to convert: {}", file.display());
            }
        }

        info!(
            succeeded = tally.succeeded,
            total = tally.total,
            "Batch conversion completed"
        );
        tally
    }

    /// Run a batch using the method and recursion from `config`.
    pub fn run_batch(
        &self,
        input_dir: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        config: &BatchConfig,
    ) -> BatchTally {
        self.batch_convert(input_dir, output_dir, config.method, config.recursive)
    }

    /// Where `file` (somewhere under `input_root`) lands under `output_root`.
    ///
    /// `input_root/a/photo.jpg` maps to `output_root/a/photo_bw.jpg`.
    pub fn output_path(&self, input_root: &Path, file: &Path, output_root: &Path) -> Option<PathBuf> {
        let relative = file.strip_prefix(input_root).ok()?;
        let stem = relative.file_stem()?;

        let mut name = OsString::from(stem);
        name.push(&self.suffix);
        if let Some(ext) = relative.extension() {
            name.push(".");
            name.push(ext);
        }

        Some(output_root.join(relative).with_file_name(name))
    }

    /// Ensure the target's parent exists, then convert.
    fn convert_into(&self, file: &Path, target: &Path, method: GrayscaleMethod) -> bool {
        if let Some(parent) = target.parent() {
            if let Err(err) = std::fs::create_dir_all(parent) {
                error!("Failed to create {}: {}", parent.display(), err);
                return false;
            }
        }
        self.convert_file(file, target, method)
    }
}

/// Regular files with a supported extension directly in `root`, or anywhere
/// below it when `recursive` is set.
fn collect_images(root: &Path, recursive: bool) -> Vec<PathBuf> {
    let max_depth = if recursive { usize::MAX } else { 1 };

    WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("Skipping unreadable entry: {}", err);
                None
            }
        })
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && is_supported_format(path))
        .collect()
}
