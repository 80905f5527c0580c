//! PDF rasterisation: render every page to a `DynamicImage` via pdfium.
//!
//! PDF user space is 72 units per inch, so rendering at `dpi` means scaling
//! each page by `dpi / 72`. A US Letter page (612 × 792 pt) at 150 DPI comes
//! out as 1275 × 1650 px.

use crate::error::PdfShadeError;
use crate::pipeline::engine;
use crate::progress::{self, ProgressCallback};
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// PDF points per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Scale factor turning page points into pixels at `dpi`.
pub fn scale_for_dpi(dpi: u32) -> f32 {
    dpi as f32 / POINTS_PER_INCH
}

/// Render every page of `pdf_path` at `dpi`, in page order.
///
/// All pages are rendered before this returns; a failure on any page aborts
/// the whole document.
pub fn render_pages(
    pdfium: &Pdfium,
    pdf_path: &Path,
    dpi: u32,
    password: Option<&str>,
    progress: Option<&ProgressCallback>,
) -> Result<Vec<DynamicImage>, PdfShadeError> {
    let mut images = Vec::new();
    render_each(pdfium, pdf_path, dpi, password, progress, |_, _, image| {
        images.push(image);
        Ok(())
    })?;
    Ok(images)
}

/// Render pages one at a time, handing each image to `sink` as
/// `(page_num, total_pages, image)` before the next page is rendered.
///
/// Only one page bitmap is alive at a time, which keeps memory flat for
/// long documents at high DPI.
pub fn render_each(
    pdfium: &Pdfium,
    pdf_path: &Path,
    dpi: u32,
    password: Option<&str>,
    progress: Option<&ProgressCallback>,
    mut sink: impl FnMut(usize, usize, DynamicImage) -> Result<(), PdfShadeError>,
) -> Result<usize, PdfShadeError> {
    let document = engine::load_document(pdfium, pdf_path, password)?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    if total_pages == 0 {
        return Err(PdfShadeError::EmptyDocument {
            path: pdf_path.to_path_buf(),
        });
    }
    if let Some(cb) = progress {
        cb.on_pipeline_start(total_pages);
    }

    let render_config = PdfRenderConfig::new().scale_page_by_factor(scale_for_dpi(dpi));

    for (idx, page) in pages.iter().enumerate() {
        let page_num = idx + 1;
        let image = progress::track_page(progress, "render", page_num, total_pages, || {
            let bitmap = page.render_with_config(&render_config).map_err(|e| {
                PdfShadeError::RasterisationFailed {
                    page: page_num,
                    detail: format!("{:?}", e),
                }
            })?;
            Ok::<_, PdfShadeError>(bitmap.as_image())
        })?;

        debug!(
            "Rendered page {} → {}x{} px",
            page_num,
            image.width(),
            image.height()
        );
        sink(page_num, total_pages, image)?;
    }

    Ok(total_pages)
}
