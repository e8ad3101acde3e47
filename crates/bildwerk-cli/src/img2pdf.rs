// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// img2pdf — write one raster image as a single-page PDF.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use tracing::info;

use bildwerk_core::{PageLayout, PaperSize, PdfExportConfig};
use bildwerk_document::PdfWriter;

use crate::exit;

#[derive(Debug, Parser)]
#[command(name = "img2pdf", version, about = "Convert a JPG/PNG image to a one-page PDF")]
pub struct Args {
    /// Image to convert.
    pub input: PathBuf,

    /// Output PDF [default: input path with a .pdf extension]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Page is the image size at this resolution [default: 72]
    #[arg(long, value_parser = parse_dpi, conflicts_with = "paper")]
    pub dpi: Option<f32>,

    /// Centre the image on a standard sheet instead.
    #[arg(long, value_enum)]
    pub paper: Option<PaperArg>,

    /// Document title [default: input file name without extension]
    #[arg(long)]
    pub title: Option<String>,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PaperArg {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
}

impl From<PaperArg> for PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A3 => PaperSize::A3,
            PaperArg::A4 => PaperSize::A4,
            PaperArg::A5 => PaperSize::A5,
            PaperArg::Letter => PaperSize::Letter,
            PaperArg::Legal => PaperSize::Legal,
            PaperArg::Tabloid => PaperSize::Tabloid,
        }
    }
}

fn parse_dpi(value: &str) -> Result<f32, String> {
    let dpi: f32 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if dpi.is_finite() && dpi > 0.0 {
        Ok(dpi)
    } else {
        Err("resolution must be greater than zero".into())
    }
}

impl Args {
    /// Output path, falling back to the input with its extension replaced.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.input))
    }

    pub fn export_config(&self) -> PdfExportConfig {
        let layout = match (self.paper, self.dpi) {
            (Some(paper), _) => PageLayout::Paper(paper.into()),
            (None, Some(dpi)) => PageLayout::FitImage { dpi },
            (None, None) => PageLayout::default(),
        };
        let title = self.title.clone().or_else(|| {
            self.input
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        });
        PdfExportConfig { layout, title }
    }
}

/// `photo.png` becomes `photo.pdf`; a path without extension gains one.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("pdf")
}

/// Export the image and return the process exit code.
pub fn run(args: &Args) -> u8 {
    let output = args.output_path();
    let config = args.export_config();
    info!(input = %args.input.display(), output = %output.display(), "Exporting image to PDF");

    match PdfWriter::from_config(&config).export_file(&args.input, &output) {
        Ok(()) => {
            println!("Saved PDF: {}", output.display());
            exit::SUCCESS
        }
        Err(err) => exit::report(&err),
    }
}
