// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pixel kernels for the luminance-based conversions.

use image::{GrayAlphaImage, GrayImage, LumaA, RgbImage, RgbaImage};

/// ITU-R BT.601 luma weights for R, G and B.
pub const BT601_WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];

/// The same weights in 16.16 fixed point; they sum to exactly `1 << 16`.
const BT601_FIXED: [u32; 3] = [19595, 38470, 7471];

/// Threshold used by the 1-bit conversion: values at or above become white.
pub const BILEVEL_THRESHOLD: u8 = 128;

/// Standard luma of one RGB pixel: BT.601 weights, rounded to nearest.
///
/// Pure white stays 255 and pure red is 76.
#[inline]
pub fn standard_luma(r: u8, g: u8, b: u8) -> u8 {
    let sum = r as u32 * BT601_FIXED[0] + g as u32 * BT601_FIXED[1] + b as u32 * BT601_FIXED[2];
    ((sum + 0x8000) >> 16) as u8
}

/// Weighted luma of one RGB pixel, truncated toward zero.
///
/// The sum is evaluated in `f64` left to right, so pure white yields 254
/// (`254.999...` truncated), not 255.
#[inline]
pub fn weighted_luma(r: u8, g: u8, b: u8) -> u8 {
    let value = r as f64 * BT601_WEIGHTS[0] + g as f64 * BT601_WEIGHTS[1] + b as f64 * BT601_WEIGHTS[2];
    value as u8
}

/// Convert an RGB buffer to gray with [`standard_luma`].
pub fn standard_grayscale(rgb: &RgbImage) -> GrayImage {
    map_rows(rgb, standard_luma)
}

/// Convert an RGBA buffer to gray with [`standard_luma`], keeping alpha as is.
pub fn standard_grayscale_alpha(rgba: &RgbaImage) -> GrayAlphaImage {
    let (width, height) = rgba.dimensions();
    let mut output = GrayAlphaImage::new(width, height);
    for (out, px) in output.pixels_mut().zip(rgba.pixels()) {
        let [r, g, b, a] = px.0;
        *out = LumaA([standard_luma(r, g, b), a]);
    }
    output
}

/// Convert an RGB buffer to gray with [`weighted_luma`].
pub fn weighted_grayscale(rgb: &RgbImage) -> GrayImage {
    map_rows(rgb, weighted_luma)
}

/// Apply a per-pixel luma kernel to an RGB buffer, one row at a time.
fn map_rows(rgb: &RgbImage, kernel: impl Fn(u8, u8, u8) -> u8) -> GrayImage {
    let (width, height) = rgb.dimensions();
    let mut output = GrayImage::new(width, height);
    let row_len = width as usize * 3;

    if row_len == 0 {
        return output;
    }

    output
        .chunks_exact_mut(width as usize)
        .zip(rgb.as_raw().chunks_exact(row_len))
        .for_each(|(out_row, in_row)| {
            out_row
                .iter_mut()
                .zip(in_row.chunks_exact(3))
                .for_each(|(out, px)| *out = kernel(px[0], px[1], px[2]));
        });

    output
}

/// Threshold a gray buffer in place: `>= threshold` becomes 255, everything else 0.
pub fn threshold_in_place(gray: &mut GrayImage, threshold: u8) {
    for value in gray.iter_mut() {
        *value = if *value >= threshold { 255 } else { 0 };
    }
}

/// Blend each channel of `rgb` toward its luma by `factor`, in place.
///
/// `factor = 0` removes all colour (R = G = B = luma), `1` leaves the image
/// unchanged, and values above `1` oversaturate.
pub fn scale_saturation(rgb: &mut RgbImage, luma: &GrayImage, factor: f32) {
    debug_assert_eq!(rgb.dimensions(), luma.dimensions());
    for (px, gray) in rgb.pixels_mut().zip(luma.iter()) {
        let gray = *gray as f32;
        for channel in px.0.iter_mut() {
            let blended = gray + factor * (*channel as f32 - gray);
            *channel = blended.round().clamp(0.0, 255.0) as u8;
        }
    }
}
