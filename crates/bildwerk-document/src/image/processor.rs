// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — colour-model conversions (RGB, luma, luma+alpha, bilevel,
// weighted luma, saturation) on in-memory images using the `image` crate.

use std::path::Path;

use bildwerk_core::GrayscaleMethod;
use bildwerk_core::error::BildwerkError;
use image::{ColorType, DynamicImage, GrayImage, ImageError, ImageFormat};
use tracing::{debug, info, instrument};

use super::luma;

/// Image processing pipeline operating on a single in-memory image.
///
/// All operations are non-destructive: each method consumes `self` and returns a
/// new `ImageProcessor` wrapping the transformed image, enabling method chaining.
///
/// ```ignore
/// ImageProcessor::open("photo.jpg")?
///     .weighted_grayscale()
///     .save("photo_bw.jpg")?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BildwerkError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|err| map_image_error(path, "open", err))?;
        info!(
            width = img.width(),
            height = img.height(),
            color = ?img.color(),
            "Image loaded"
        );
        Ok(Self { image: img })
    }

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, BildwerkError> {
        let img = image::load_from_memory(data).map_err(|err| match err {
            ImageError::Unsupported(e) => BildwerkError::CodecUnavailable(e.to_string()),
            other => BildwerkError::ImageError(format!("failed to decode image: {}", other)),
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Colour model of the current image.
    pub fn color(&self) -> ColorType {
        self.image.color()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Colour-model conversions (consume self, return new Self) -------------

    /// Force the image into 8-bit RGB, discarding any alpha channel.
    pub fn to_rgb(self) -> Self {
        if self.image.color() == ColorType::Rgb8 {
            return self;
        }
        debug!(from = ?self.image.color(), "Coercing to RGB8");
        Self {
            image: DynamicImage::ImageRgb8(self.image.into_rgb8()),
        }
    }

    /// Convert the image to a single 8-bit channel of BT.601 luma, rounded.
    /// Any alpha channel is dropped.
    #[instrument(skip(self))]
    pub fn grayscale(self) -> Self {
        info!("Converting to grayscale");
        Self {
            image: DynamicImage::ImageLuma8(self.standard_luma()),
        }
    }

    /// Convert the image to BT.601 luma while keeping its alpha channel.
    ///
    /// Sources without alpha get a fully opaque one.
    #[instrument(skip(self))]
    pub fn grayscale_alpha(self) -> Self {
        info!("Converting to grayscale with alpha");
        let rgba = self.image.into_rgba8();
        Self {
            image: DynamicImage::ImageLumaA8(luma::standard_grayscale_alpha(&rgba)),
        }
    }

    /// Threshold the luma of the image into pure black and white.
    #[instrument(skip(self))]
    pub fn bilevel(self, threshold: u8) -> Self {
        info!(threshold, "Converting to black and white");
        let mut gray = self.standard_luma();
        luma::threshold_in_place(&mut gray, threshold);
        Self {
            image: DynamicImage::ImageLuma8(gray),
        }
    }

    /// Convert to gray with the fixed 0.299 / 0.587 / 0.114 weights,
    /// truncating each result.
    #[instrument(skip(self))]
    pub fn weighted_grayscale(self) -> Self {
        info!("Converting to weighted grayscale");
        let rgb = self.to_rgb().image.into_rgb8();
        Self {
            image: DynamicImage::ImageLuma8(luma::weighted_grayscale(&rgb)),
        }
    }

    /// Scale colour saturation by `factor` (0.0 removes all colour, 1.0 is a
    /// no-op). The result is always 8-bit RGB.
    #[instrument(skip(self))]
    pub fn adjust_saturation(self, factor: f32) -> Self {
        info!(factor, "Adjusting saturation");
        let mut rgb = self.image.into_rgb8();
        let gray = luma::standard_grayscale(&rgb);
        luma::scale_saturation(&mut rgb, &gray, factor);
        Self {
            image: DynamicImage::ImageRgb8(rgb),
        }
    }

    /// Remove all colour while keeping three channels (R = G = B).
    pub fn desaturate(self) -> Self {
        self.adjust_saturation(0.0)
    }

    /// BT.601 luma of the current image, as a fresh buffer.
    fn standard_luma(self) -> GrayImage {
        match self.image {
            DynamicImage::ImageLuma8(gray) => gray,
            other => luma::standard_grayscale(&other.into_rgb8()),
        }
    }

    /// Apply the conversion selected by `method`.
    pub fn convert(self, method: GrayscaleMethod) -> Self {
        match method {
            GrayscaleMethod::Luma => self.grayscale(),
            GrayscaleMethod::LumaAlpha => self.grayscale_alpha(),
            GrayscaleMethod::BiLevel => self.bilevel(luma::BILEVEL_THRESHOLD),
            GrayscaleMethod::Weighted => self.weighted_grayscale(),
            GrayscaleMethod::Desaturate => self.desaturate(),
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, BildwerkError> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        self.image
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|err| BildwerkError::ImageError(format!("PNG encoding failed: {}", err)))?;
        Ok(buffer)
    }

    /// Write the image to a file. The format is inferred from the file extension.
    ///
    /// Gray buffers are widened to RGB(A) with equal channels when the target
    /// encoder only takes colour, so every method can be written as GIF or TIFF.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), BildwerkError> {
        let path = path.as_ref();
        let widened = ImageFormat::from_path(path)
            .ok()
            .and_then(|format| encodable_color(format, self.image.color()))
            .map(|color| {
                debug!(from = ?self.image.color(), to = ?color, "Widening for encoder");
                match color {
                    ColorType::Rgba8 => DynamicImage::ImageRgba8(self.image.to_rgba8()),
                    _ => DynamicImage::ImageRgb8(self.image.to_rgb8()),
                }
            });
        widened
            .as_ref()
            .unwrap_or(&self.image)
            .save(path)
            .map_err(|err| map_image_error(path, "save", err))
    }
}

/// The colour type to write instead of `color` when `format`'s encoder
/// rejects it, or `None` when it can be written as is.
fn encodable_color(format: ImageFormat, color: ColorType) -> Option<ColorType> {
    match (format, color) {
        (ImageFormat::Gif, ColorType::L8) => Some(ColorType::Rgb8),
        (ImageFormat::Gif, ColorType::La8) | (ImageFormat::Tiff, ColorType::La8) => {
            Some(ColorType::Rgba8)
        }
        _ => None,
    }
}

/// Map an `image` error to a `BildwerkError`, keeping the path for context.
///
/// Missing codecs map to [`BildwerkError::CodecUnavailable`] and I/O failures
/// keep their `std::io::Error` so callers can inspect the kind.
fn map_image_error(path: &Path, action: &str, err: ImageError) -> BildwerkError {
    match err {
        ImageError::Unsupported(e) => {
            BildwerkError::CodecUnavailable(format!("{} {}: {}", action, path.display(), e))
        }
        ImageError::IoError(e) => BildwerkError::Io(e),
        other => BildwerkError::ImageError(format!(
            "failed to {} {}: {}",
            action,
            path.display(),
            other
        )),
    }
}

#[cfg(test)]
mod tests {
    use image::{LumaA, Rgb, RgbImage, Rgba, RgbaImage};

    use super::*;

    fn red_with_alpha() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(3, 2, Rgba([255, 0, 0, 77])))
    }

    #[test]
    fn to_rgb_drops_alpha() {
        let processor = ImageProcessor::from_dynamic(red_with_alpha()).to_rgb();
        assert_eq!(processor.color(), ColorType::Rgb8);
        assert_eq!((processor.width(), processor.height()), (3, 2));
    }

    #[test]
    fn luma_uses_bt601_weights() {
        let out = ImageProcessor::from_dynamic(red_with_alpha())
            .convert(GrayscaleMethod::Luma)
            .into_dynamic();
        assert_eq!(out.color(), ColorType::L8);
        assert_eq!(out.as_luma8().unwrap().get_pixel(0, 0).0[0], 76);
    }

    #[test]
    fn luma_alpha_preserves_alpha() {
        let out = ImageProcessor::from_dynamic(red_with_alpha())
            .convert(GrayscaleMethod::LumaAlpha)
            .into_dynamic();
        assert_eq!(out.color(), ColorType::La8);
        let LumaA([gray, alpha]) = *out.as_luma_alpha8().unwrap().get_pixel(0, 0);
        assert_eq!((gray, alpha), (76, 77));
    }

    #[test]
    fn bilevel_has_only_black_and_white() {
        let gradient = RgbImage::from_fn(64, 4, |x, _| {
            let v = (x * 4) as u8;
            Rgb([v, v, v])
        });
        let out = ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(gradient))
            .convert(GrayscaleMethod::BiLevel)
            .into_dynamic();
        let gray = out.as_luma8().unwrap();
        assert!(gray.iter().all(|v| *v == 0 || *v == 255));
        assert_eq!(gray.get_pixel(0, 0).0[0], 0);
        assert_eq!(gray.get_pixel(63, 0).0[0], 255);
    }

    #[test]
    fn weighted_uses_truncating_weights() {
        let out = ImageProcessor::from_dynamic(red_with_alpha())
            .convert(GrayscaleMethod::Weighted)
            .into_dynamic();
        assert_eq!(out.color(), ColorType::L8);
        assert_eq!(out.as_luma8().unwrap().get_pixel(2, 1).0[0], 76);

        let white = DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, Rgb([255, 255, 255])));
        let out = ImageProcessor::from_dynamic(white)
            .weighted_grayscale()
            .into_dynamic();
        assert_eq!(out.as_luma8().unwrap().get_pixel(0, 0).0[0], 254);
    }

    #[test]
    fn desaturate_keeps_three_equal_channels() {
        let colourful = RgbImage::from_fn(4, 4, |x, y| Rgb([(x * 60) as u8, (y * 60) as u8, 30]));
        let out = ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(colourful))
            .convert(GrayscaleMethod::Desaturate)
            .into_dynamic();
        assert_eq!(out.color(), ColorType::Rgb8);
        assert!(
            out.as_rgb8()
                .unwrap()
                .pixels()
                .all(|Rgb([r, g, b])| r == g && g == b)
        );
    }

    #[test]
    fn desaturated_red_matches_standard_luma() {
        let out = ImageProcessor::from_dynamic(red_with_alpha())
            .desaturate()
            .into_dynamic();
        assert_eq!(out.as_rgb8().unwrap().get_pixel(1, 1).0, [76, 76, 76]);
    }

    #[test]
    fn bilevel_thresholds_standard_luma() {
        // Mid gray has a standard luma of exactly 128, the threshold itself.
        let out = ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            1,
            1,
            Rgb([128, 128, 128]),
        )))
        .bilevel(luma::BILEVEL_THRESHOLD)
        .into_dynamic();
        assert_eq!(out.as_luma8().unwrap().get_pixel(0, 0).0[0], 255);
    }

    #[test]
    fn gray_buffers_widen_only_where_needed() {
        assert_eq!(encodable_color(ImageFormat::Gif, ColorType::L8), Some(ColorType::Rgb8));
        assert_eq!(encodable_color(ImageFormat::Gif, ColorType::La8), Some(ColorType::Rgba8));
        assert_eq!(encodable_color(ImageFormat::Tiff, ColorType::La8), Some(ColorType::Rgba8));
        assert_eq!(encodable_color(ImageFormat::Tiff, ColorType::L8), None);
        assert_eq!(encodable_color(ImageFormat::Png, ColorType::La8), None);
        assert_eq!(encodable_color(ImageFormat::Gif, ColorType::Rgb8), None);
    }

    #[test]
    fn every_method_saves_as_gif_and_tiff() {
        let dir = tempfile::tempdir().unwrap();
        for method in GrayscaleMethod::ALL {
            for ext in ["gif", "tiff"] {
                let path = dir.path().join(format!("out_{}.{}", method.tag(), ext));
                ImageProcessor::from_dynamic(red_with_alpha())
                    .convert(method)
                    .save(&path)
                    .unwrap_or_else(|err| panic!("{method} as {ext}: {err}"));
                let written = image::open(&path).unwrap();
                assert_eq!((written.width(), written.height()), (3, 2));
            }
        }
    }

    #[test]
    fn png_bytes_decode_back() {
        let bytes = ImageProcessor::from_dynamic(red_with_alpha())
            .grayscale()
            .to_png_bytes()
            .unwrap();
        let decoded = ImageProcessor::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.color(), ColorType::L8);
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
    }

    #[test]
    fn garbage_bytes_are_an_error() {
        assert!(ImageProcessor::from_bytes(b"definitely not an image").is_err());
    }
}
