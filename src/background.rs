//! Background overlay: paint a solid rectangle under every page.
//!
//! The document is edited structurally with lopdf, so text and vector
//! content survive untouched; only a new content stream is added in front
//! of each page's existing ones.

use crate::config::BackgroundConfig;
use crate::error::PdfShadeError;
use crate::output::{PipelineOutput, PipelineStats};
use crate::pipeline::{backdrop, input, write};
use crate::progress;
use lopdf::Document;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Add a filled background beneath the content of every page of `input`
/// and write the result to `output`.
///
/// The input file is read once and never written to. `output` is replaced
/// only after the new document has been saved in full.
///
/// # Errors
/// - Input-access errors when `input` is missing, unreadable, not a PDF,
///   protected by a non-empty user password, or has no pages. Nothing is
///   written in that case.
/// - [`PdfShadeError::OutputWriteFailed`] when `output` cannot be written.
pub fn add_background(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &BackgroundConfig,
) -> Result<PipelineOutput, PdfShadeError> {
    let total_start = Instant::now();
    let input = input.as_ref();
    let output = output.as_ref();
    config.color.validate()?;
    info!(
        "Adding background {} to {} → {}",
        config.color,
        input.display(),
        output.display()
    );

    let mut doc = open_document(input)?;
    let pages = doc.get_pages();
    let total_pages = pages.len();
    if total_pages == 0 {
        return Err(PdfShadeError::EmptyDocument {
            path: input.to_path_buf(),
        });
    }

    let callback = config.progress_callback.as_ref();
    if let Some(cb) = callback {
        cb.on_pipeline_start(total_pages);
    }

    // get_pages is keyed by 1-based page number, already in page order.
    for (page_num, page_id) in pages {
        let page_num = page_num as usize;
        progress::track_page(callback, "background", page_num, total_pages, || {
            let rect = backdrop::page_box(&doc, page_id);
            let content = backdrop::background_content(config.color, rect)?;
            backdrop::prepend_content(&mut doc, page_id, content)?;
            debug!(
                "Page {}: background {:.1}x{:.1} pt at ({:.1}, {:.1})",
                page_num,
                rect.width(),
                rect.height(),
                rect.x0,
                rect.y0
            );
            Ok::<_, PdfShadeError>(())
        })?;
    }

    write::save_atomic(&mut doc, output)?;

    if let Some(cb) = callback {
        cb.on_pipeline_complete(total_pages);
    }

    let total_duration_ms = total_start.elapsed().as_millis() as u64;
    info!(
        "Background added to {} pages in {}ms",
        total_pages, total_duration_ms
    );

    Ok(PipelineOutput {
        output_path: output.to_path_buf(),
        page_count: total_pages,
        page_images: Vec::new(),
        stats: PipelineStats {
            total_duration_ms,
            ..Default::default()
        },
    })
}

/// Async variant of [`add_background`]; the work runs on the blocking pool.
pub async fn add_background_async(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &BackgroundConfig,
) -> Result<PipelineOutput, PdfShadeError> {
    let input = input.as_ref().to_path_buf();
    let output = output.as_ref().to_path_buf();
    let config = config.clone();

    tokio::task::spawn_blocking(move || add_background(&input, &output, &config))
        .await
        .map_err(|e| PdfShadeError::Internal(format!("Background task panicked: {}", e)))?
}

/// Load `path` with lopdf after the cheap header checks.
fn open_document(path: &Path) -> Result<Document, PdfShadeError> {
    let path = input::validate_local(path)?;

    let mut doc = Document::load(&path).map_err(|e| {
        let detail = e.to_string();
        if detail.to_lowercase().contains("encrypt") {
            PdfShadeError::PasswordRequired { path: path.clone() }
        } else {
            PdfShadeError::CorruptPdf {
                path: path.clone(),
                detail,
            }
        }
    })?;

    // Owner-locked files carry an empty user password and open without
    // prompting; anything else needs a password lopdf is never given.
    if doc.is_encrypted() {
        doc.decrypt("").map_err(|e| {
            debug!("Empty user password rejected for {}: {e}", path.display());
            PdfShadeError::PasswordRequired { path: path.clone() }
        })?;
        debug!("Decrypted owner-locked {}", path.display());
    }
    Ok(doc)
}
