// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — wrap a single raster image in a one-page PDF using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use std::path::Path;

use bildwerk_core::error::BildwerkError;
use bildwerk_core::{PageLayout, PaperSize, PdfExportConfig};
use image::DynamicImage;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

use crate::image::processor::ImageProcessor;

/// Margin kept around the image on standard paper sizes.
const PAPER_MARGIN_MM: f32 = 15.0;

/// Native resolution assumed when placing an image on standard paper.
const PAPER_DPI: f32 = 150.0;

const MM_PER_INCH: f32 = 25.4;

/// Creates single-page PDF documents from raster images.
pub struct PdfWriter {
    /// Page sizing and image placement.
    layout: PageLayout,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl PdfWriter {
    /// Create a new writer with the given page layout.
    pub fn new(layout: PageLayout) -> Self {
        Self {
            layout,
            title: None,
        }
    }

    /// Create a writer whose page is exactly the image size at 72 dpi.
    pub fn fit_image() -> Self {
        Self::new(PageLayout::default())
    }

    /// Create a writer from export settings.
    pub fn from_config(config: &PdfExportConfig) -> Self {
        Self {
            layout: config.layout,
            title: config.title.clone(),
        }
    }

    // -- Image to PDF ---------------------------------------------------------

    /// Create a single-page PDF from encoded image bytes.
    #[instrument(skip(self, image_bytes), fields(bytes_len = image_bytes.len()))]
    pub fn create_from_image(&self, image_bytes: &[u8]) -> Result<Vec<u8>, BildwerkError> {
        let processor = ImageProcessor::from_bytes(image_bytes)?;
        self.create_from_dynamic(processor.as_dynamic())
    }

    /// Create a single-page PDF containing `image`.
    ///
    /// The image is flattened to 8-bit RGB first; any alpha channel is
    /// discarded, not composited.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn create_from_dynamic(&self, image: &DynamicImage) -> Result<Vec<u8>, BildwerkError> {
        let title = self.title.as_deref().unwrap_or("Bildwerk Image");
        info!(layout = ?self.layout, title, "Creating image PDF");

        let img_width = image.width() as usize;
        let img_height = image.height() as usize;
        if img_width == 0 || img_height == 0 {
            return Err(BildwerkError::PdfError(format!(
                "cannot place an empty {}x{} image",
                img_width, img_height
            )));
        }

        let rgb_image = image.to_rgb8();
        let raw = RawImage {
            pixels: RawImageData::U8(rgb_image.into_raw()),
            width: img_width,
            height: img_height,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };

        let mut doc = PdfDocument::new(title);
        let xobject_id = doc.add_image(&raw);

        let placement = self.place(img_width as f32, img_height as f32)?;
        let ops = vec![Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(placement.x_offset_pt)),
                translate_y: Some(Pt(placement.y_offset_pt)),
                scale_x: Some(placement.scale),
                scale_y: Some(placement.scale),
                dpi: Some(placement.dpi),
                rotate: None,
            },
        }];

        let page = PdfPage::new(placement.page_w, placement.page_h, ops);
        doc.with_pages(vec![page]);

        debug!(
            page_w_mm = placement.page_w.0,
            page_h_mm = placement.page_h.0,
            scale = placement.scale,
            "Image placed on page"
        );

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            warn!(count = warnings.len(), "printpdf reported warnings while saving");
        }

        Ok(output)
    }

    /// Compute page size and image transform for an image of the given pixel size.
    fn place(&self, img_w_px: f32, img_h_px: f32) -> Result<Placement, BildwerkError> {
        match self.layout {
            PageLayout::FitImage { dpi } => {
                if !(dpi.is_finite() && dpi > 0.0) {
                    return Err(BildwerkError::PdfError(format!("invalid resolution: {dpi} dpi")));
                }
                Ok(Placement {
                    page_w: Mm(img_w_px / dpi * MM_PER_INCH),
                    page_h: Mm(img_h_px / dpi * MM_PER_INCH),
                    x_offset_pt: 0.0,
                    y_offset_pt: 0.0,
                    scale: 1.0,
                    dpi,
                })
            }
            PageLayout::Paper(paper_size) => Ok(place_on_paper(paper_size, img_w_px, img_h_px)),
        }
    }

    // -- File output convenience ----------------------------------------------

    /// Open `input`, flatten it to RGB and write it as a one-page PDF to `output`.
    ///
    /// Fails with [`BildwerkError::InputNotFound`] before any decode when the
    /// input does not exist. Parent directories of `output` are created.
    #[instrument(skip_all, fields(input = %input.as_ref().display(), output = %output.as_ref().display()))]
    pub fn export_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<(), BildwerkError> {
        let (input, output) = (input.as_ref(), output.as_ref());
        if !input.exists() {
            return Err(BildwerkError::InputNotFound(input.to_path_buf()));
        }

        let processor = ImageProcessor::open(input)?.to_rgb();
        let bytes = self.create_from_dynamic(processor.as_dynamic())?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(output, &bytes)?;
        info!(bytes = bytes.len(), "Wrote image PDF to {}", output.display());
        Ok(())
    }
}

/// Page size and image transform for one page.
struct Placement {
    page_w: Mm,
    page_h: Mm,
    x_offset_pt: f32,
    y_offset_pt: f32,
    scale: f32,
    dpi: f32,
}

/// Centre the image on `paper_size` inside the margin, scaling down to fit but
/// never up.
fn place_on_paper(paper_size: PaperSize, img_w_px: f32, img_h_px: f32) -> Placement {
    let (w_mm, h_mm) = paper_size.dimensions_mm();
    let (page_w, page_h) = (Mm(w_mm as f32), Mm(h_mm as f32));

    let usable_w_pt = Mm(page_w.0 - 2.0 * PAPER_MARGIN_MM).into_pt().0;
    let usable_h_pt = Mm(page_h.0 - 2.0 * PAPER_MARGIN_MM).into_pt().0;

    let img_w_pt = img_w_px / PAPER_DPI * 72.0;
    let img_h_pt = img_h_px / PAPER_DPI * 72.0;

    let scale = (usable_w_pt / img_w_pt).min(usable_h_pt / img_h_pt).min(1.0);

    let margin_pt = Mm(PAPER_MARGIN_MM).into_pt().0;
    Placement {
        page_w,
        page_h,
        x_offset_pt: margin_pt + (usable_w_pt - img_w_pt * scale) / 2.0,
        y_offset_pt: margin_pt + (usable_h_pt - img_h_pt * scale) / 2.0,
        scale,
        dpi: PAPER_DPI,
    }
}
