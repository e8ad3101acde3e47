// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bwconvert — convert images to grayscale or black-and-white, one file or a
// whole directory.

use std::path::PathBuf;

use clap::Parser;
use clap::builder::{PossibleValuesParser, TypedValueParser};
use tracing::info;

use bildwerk_core::error::Result;
use bildwerk_core::{BatchConfig, BatchOutcome, ConversionRequest, GrayscaleMethod};
use bildwerk_document::GrayscaleConverter;

use crate::exit;

const EXAMPLES: &str = "\
Examples:
  bwconvert input.jpg output.jpg
  bwconvert input.png output.png -m weighted
  bwconvert input.jpg output.jpg -m 1
  bwconvert -d /path/to/images /path/to/output
  bwconvert -d /path/to/images /path/to/output -r -m desaturate

Conversion methods:
  L          - Standard grayscale (default)
  LA         - Grayscale with alpha channel
  1          - Pure black and white (1-bit)
  weighted   - Weighted RGB average
  desaturate - Saturation removed, output stays RGB";

#[derive(Debug, Parser)]
#[command(
    name = "bwconvert",
    version,
    about = "Convert images to black and white",
    after_help = EXAMPLES
)]
pub struct Args {
    /// Input image file, or input directory with --directory.
    pub input: PathBuf,

    /// Output image file, or output directory with --directory.
    pub output: PathBuf,

    /// Process an entire directory.
    #[arg(short, long)]
    pub directory: bool,

    /// Process subdirectories too (requires --directory).
    #[arg(short, long, requires = "directory")]
    pub recursive: bool,

    /// Conversion method.
    #[arg(
        short,
        long,
        default_value = "L",
        value_parser = method_parser()
    )]
    pub method: GrayscaleMethod,

    /// Print the batch tally as JSON (requires --directory).
    #[arg(long, requires = "directory")]
    pub json: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

fn method_parser() -> impl TypedValueParser<Value = GrayscaleMethod> {
    PossibleValuesParser::new(GrayscaleMethod::ALL.map(|method| method.tag()))
        .map(|tag| GrayscaleMethod::from_tag(&tag))
}

impl Args {
    /// The conversion these arguments ask for.
    pub fn request(&self) -> ConversionRequest {
        ConversionRequest {
            input: self.input.clone(),
            output: self.output.clone(),
            method: self.method,
            recursive: self.recursive,
        }
    }
}

/// Run the conversion and return the process exit code.
pub fn run(args: &Args) -> Result<u8> {
    let request = args.request();
    if args.directory {
        run_batch(&request, args.json)
    } else {
        Ok(run_single(&request))
    }
}

fn run_single(request: &ConversionRequest) -> u8 {
    info!(
        "Converting single image: {} -> {}",
        request.input.display(),
        request.output.display()
    );

    let converter = GrayscaleConverter::new();
    if converter.convert_file(&request.input, &request.output, request.method) {
        println!(
            "Successfully converted {} to {}",
            request.input.display(),
            request.output.display()
        );
        exit::SUCCESS
    } else {
        println!("Failed to convert {}", request.input.display());
        exit::FAILURE
    }
}

fn run_batch(request: &ConversionRequest, json: bool) -> Result<u8> {
    info!(
        "Starting batch conversion from {} to {}",
        request.input.display(),
        request.output.display()
    );

    let config = BatchConfig::from(request);
    let tally = GrayscaleConverter::from_config(&config).run_batch(&request.input, &request.output, &config);
    let outcome = tally.outcome();

    if json {
        println!("{}", serde_json::to_string(&tally)?);
    } else {
        match outcome {
            BatchOutcome::AllConverted => {
                println!("Successfully converted all {} images!", tally.total)
            }
            BatchOutcome::Partial => println!(
                "Warning: converted {} out of {} images.",
                tally.succeeded, tally.total
            ),
            BatchOutcome::NoneConverted => println!("Failed to convert any images."),
        }
    }

    Ok(match outcome {
        BatchOutcome::AllConverted | BatchOutcome::Partial => exit::SUCCESS,
        BatchOutcome::NoneConverted => exit::FAILURE,
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use image::{DynamicImage, Rgb, RgbImage};

    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    fn write_image(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([250, 120, 10])))
            .save(path)
            .unwrap();
    }

    #[test]
    fn method_defaults_to_luma() {
        assert_eq!(parse(&["bwconvert", "a.png", "b.png"]).method, GrayscaleMethod::Luma);
    }

    #[test]
    fn every_method_tag_is_accepted() {
        for method in GrayscaleMethod::ALL {
            let args = parse(&["bwconvert", "a.png", "b.png", "-m", method.tag()]);
            assert_eq!(args.method, method);
        }
        assert!(Args::try_parse_from(["bwconvert", "a.png", "b.png", "-m", "foo"]).is_err());
    }

    #[test]
    fn recursive_requires_directory() {
        let err = Args::try_parse_from(["bwconvert", "in", "out", "-r"]).unwrap_err();
        assert_eq!(err.exit_code(), exit::USAGE as i32);

        let args = parse(&["bwconvert", "-d", "in", "out", "-r"]);
        assert!(args.directory && args.recursive);
    }

    #[test]
    fn request_carries_parsed_arguments() {
        let request = parse(&["bwconvert", "-d", "-r", "-m", "1", "scans", "scans-bw"]).request();
        assert_eq!(
            request,
            ConversionRequest {
                input: PathBuf::from("scans"),
                output: PathBuf::from("scans-bw"),
                method: GrayscaleMethod::BiLevel,
                recursive: true,
            }
        );
        assert!(!parse(&["bwconvert", "a.png", "b.png"]).request().recursive);
    }

    #[test]
    fn positionals_are_required() {
        assert!(Args::try_parse_from(["bwconvert", "only-input.png"]).is_err());
        assert!(Args::try_parse_from(["bwconvert", "-d"]).is_err());
    }

    #[test]
    fn version_flag_is_handled_by_parser() {
        let err = Args::try_parse_from(["bwconvert", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
        assert_eq!(err.exit_code(), 0);
    }

    #[test]
    fn single_file_success_and_failure_codes() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        write_image(&input);
        let output = dir.path().join("out.png");

        let args = parse(&["bwconvert", input.to_str().unwrap(), output.to_str().unwrap(), "-m", "1"]);
        assert_eq!(run(&args).unwrap(), exit::SUCCESS);
        assert!(output.is_file());

        let missing = dir.path().join("missing.png");
        let args = parse(&["bwconvert", missing.to_str().unwrap(), output.to_str().unwrap()]);
        assert_eq!(run(&args).unwrap(), exit::FAILURE);
    }

    #[test]
    fn partial_batch_still_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        write_image(&input.join("ok.png"));
        std::fs::write(input.join("broken.jpg"), b"nope").unwrap();
        let output = dir.path().join("out");

        let args = parse(&["bwconvert", "-d", input.to_str().unwrap(), output.to_str().unwrap()]);
        assert_eq!(run(&args).unwrap(), exit::SUCCESS);
        assert!(output.join("ok_bw.png").is_file());
    }

    #[test]
    fn empty_or_missing_batch_fails() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out");
        let missing = dir.path().join("missing");

        let args = parse(&[
            "bwconvert",
            "-d",
            missing.to_str().unwrap(),
            output.to_str().unwrap(),
            "--json",
        ]);
        assert_eq!(run(&args).unwrap(), exit::FAILURE);
        assert!(!output.exists());
    }

    #[test]
    fn recursive_batch_reaches_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        write_image(&input.join("a/b/c.jpg"));
        let output = dir.path().join("out");

        let args = parse(&[
            "bwconvert",
            "-d",
            "-r",
            "-m",
            "weighted",
            input.to_str().unwrap(),
            output.to_str().unwrap(),
        ]);
        assert_eq!(run(&args).unwrap(), exit::SUCCESS);
        assert!(output.join("a/b/c_bw.jpg").is_file());
    }
}
