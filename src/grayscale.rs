//! Grayscale rasterisation: render, desaturate, persist, reassemble.
//!
//! The four stages run strictly one after another over the whole document.
//! The output PDF contains only images, so text in the input is no longer
//! selectable afterwards.

use crate::config::{self, GrayscaleConfig};
use crate::error::PdfShadeError;
use crate::output::{PipelineOutput, PipelineStats};
use crate::pipeline::persist::ImageDir;
use crate::pipeline::{assemble, desaturate, engine, input, persist, render, write};
use crate::progress;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Convert every page of `input` to grayscale at `config.dpi` and write the
/// reassembled document to `output`.
///
/// # Errors
/// - Input-access errors, including [`PdfShadeError::EmptyDocument`].
/// - [`PdfShadeError::PdfiumBindingFailed`] when pdfium cannot be loaded.
/// - [`PdfShadeError::RasterisationFailed`] if any page fails to render;
///   the whole run stops and no output is written.
/// - [`PdfShadeError::ImageWriteFailed`] / [`PdfShadeError::OutputWriteFailed`]
///   when the page images or the output cannot be written.
pub fn to_grayscale(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &GrayscaleConfig,
) -> Result<PipelineOutput, PdfShadeError> {
    let total_start = Instant::now();
    let input = input.as_ref();
    let output = output.as_ref();
    config::validate_dpi(config.dpi)?;
    info!(
        "Grayscale conversion at {} DPI: {} → {}",
        config.dpi,
        input.display(),
        output.display()
    );

    let pdf_path = input::validate_local(input)?;
    let pdfium = engine::bind_pdfium()?;
    let callback = config.progress_callback.as_ref();

    // ── Stage 1: Render ──────────────────────────────────────────────────
    let render_start = Instant::now();
    let rendered = render::render_pages(
        &pdfium,
        &pdf_path,
        config.dpi,
        config.password.as_deref(),
        callback,
    )?;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;
    let total_pages = rendered.len();
    info!("Rendered {} pages in {}ms", total_pages, render_duration_ms);

    // ── Stage 2: Desaturate ──────────────────────────────────────────────
    let mut grays = Vec::with_capacity(total_pages);
    for (idx, image) in rendered.into_iter().enumerate() {
        let gray = progress::track_page(callback, "desaturate", idx + 1, total_pages, || {
            Ok::<_, PdfShadeError>(desaturate::desaturate(&image))
        })?;
        grays.push(gray);
    }

    // ── Stage 3: Persist ─────────────────────────────────────────────────
    let image_dir = ImageDir::new(config.image_dir.as_deref(), config.temp_root.as_deref())?;
    let mut image_paths = Vec::with_capacity(total_pages);
    for (idx, gray) in grays.iter().enumerate() {
        let path = progress::track_page(callback, "persist", idx + 1, total_pages, || {
            persist::persist_page(&image_dir, idx + 1, gray)
        })?;
        image_paths.push(path);
    }
    drop(grays);
    info!(
        "Persisted {} page images to {}",
        image_paths.len(),
        image_dir.path().display()
    );

    // ── Stage 4: Assemble ────────────────────────────────────────────────
    let mut doc = assemble::assemble_pdf(&image_paths, config.dpi)?;
    write::save_atomic(&mut doc, output)?;

    if let Some(cb) = callback {
        cb.on_pipeline_complete(total_pages);
    }

    let page_images = if image_dir.is_retained() {
        image_paths
    } else {
        Vec::new()
    };
    // Temporary page images are removed here.
    drop(image_dir);

    let total_duration_ms = total_start.elapsed().as_millis() as u64;
    info!(
        "Grayscale conversion complete: {} pages in {}ms",
        total_pages, total_duration_ms
    );

    Ok(PipelineOutput {
        output_path: output.to_path_buf(),
        page_count: total_pages,
        page_images,
        stats: PipelineStats {
            total_duration_ms,
            render_duration_ms,
            skipped: false,
        },
    })
}

/// Async variant of [`to_grayscale`]; pdfium runs on the blocking pool.
pub async fn to_grayscale_async(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &GrayscaleConfig,
) -> Result<PipelineOutput, PdfShadeError> {
    let input = input.as_ref().to_path_buf();
    let output = output.as_ref().to_path_buf();
    let config = config.clone();

    tokio::task::spawn_blocking(move || to_grayscale(&input, &output, &config))
        .await
        .map_err(|e| PdfShadeError::Internal(format!("Grayscale task panicked: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_fails_before_binding_pdfium() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.pdf");
        let err = to_grayscale(
            dir.path().join("missing.pdf"),
            &output,
            &GrayscaleConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PdfShadeError::FileNotFound { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn non_pdf_input_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.pdf");
        std::fs::write(&input, b"hello world").unwrap();
        let err = to_grayscale(&input, dir.path().join("out.pdf"), &GrayscaleConfig::default())
            .unwrap_err();
        assert!(matches!(err, PdfShadeError::NotAPdf { .. }));
    }

    #[test]
    fn out_of_range_dpi_set_directly_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = GrayscaleConfig {
            dpi: 5,
            ..Default::default()
        };
        let err = to_grayscale(dir.path().join("a.pdf"), dir.path().join("b.pdf"), &config)
            .unwrap_err();
        assert!(matches!(err, PdfShadeError::InvalidConfig(_)));
    }
}
