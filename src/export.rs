//! Page export: write each page of a PDF as a colour PNG.
//!
//! Files are named the way `pdftoppm -png` names them: `<stem>-<n>.png`,
//! where `n` is the 1-based page number padded with zeros to as many digits
//! as the page count has. A 12-page `report.pdf` produces `report-01.png`
//! through `report-12.png`.

use crate::config::{self, ExportConfig};
use crate::error::PdfShadeError;
use crate::output::{PipelineOutput, PipelineStats};
use crate::pipeline::{engine, input, render};
use crate::progress;
use image::ImageFormat;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Export every page of `input` as `<stem>-<n>.png` inside `out_dir`.
///
/// `out_dir` is created if needed. With `config.skip_existing`, a document
/// whose stem already prefixes a PNG in `out_dir` is not rendered at all and
/// the result has `stats.skipped` set.
pub fn export_pages(
    input: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
    config: &ExportConfig,
) -> Result<PipelineOutput, PdfShadeError> {
    let total_start = Instant::now();
    let input = input.as_ref();
    let out_dir = out_dir.as_ref();
    config::validate_dpi(config.dpi)?;

    let pdf_path = input::validate_local(input)?;
    let stem = document_stem(&pdf_path);

    if config.skip_existing && has_existing_export(out_dir, &stem) {
        info!("Skipping {}: pages already exported", pdf_path.display());
        return Ok(PipelineOutput {
            output_path: out_dir.to_path_buf(),
            page_count: 0,
            page_images: Vec::new(),
            stats: PipelineStats {
                total_duration_ms: total_start.elapsed().as_millis() as u64,
                render_duration_ms: 0,
                skipped: true,
            },
        });
    }

    std::fs::create_dir_all(out_dir).map_err(|e| PdfShadeError::OutputWriteFailed {
        path: out_dir.to_path_buf(),
        source: e,
    })?;
    info!(
        "Exporting {} at {} DPI → {}",
        pdf_path.display(),
        config.dpi,
        out_dir.display()
    );

    let pdfium = engine::bind_pdfium()?;
    let callback = config.progress_callback.as_ref();

    let render_start = Instant::now();
    let mut written = Vec::new();
    let total_pages = render::render_each(
        &pdfium,
        &pdf_path,
        config.dpi,
        config.password.as_deref(),
        callback,
        |page_num, total, image| {
            let path = out_dir.join(page_png_name(&stem, page_num, total));
            progress::track_page(callback, "export", page_num, total, || {
                image
                    .to_rgb8()
                    .save_with_format(&path, ImageFormat::Png)
                    .map_err(|e| PdfShadeError::ImageWriteFailed {
                        path: path.clone(),
                        source: e,
                    })
            })?;
            debug!("Exported page {} → {}", page_num, path.display());
            written.push(path);
            Ok(())
        },
    )?;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;

    if let Some(cb) = callback {
        cb.on_pipeline_complete(total_pages);
    }

    let total_duration_ms = total_start.elapsed().as_millis() as u64;
    info!(
        "Exported {} pages in {}ms",
        total_pages, total_duration_ms
    );

    Ok(PipelineOutput {
        output_path: out_dir.to_path_buf(),
        page_count: total_pages,
        page_images: written,
        stats: PipelineStats {
            total_duration_ms,
            render_duration_ms,
            skipped: false,
        },
    })
}

/// Async variant of [`export_pages`]; pdfium runs on the blocking pool.
pub async fn export_pages_async(
    input: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
    config: &ExportConfig,
) -> Result<PipelineOutput, PdfShadeError> {
    let input = input.as_ref().to_path_buf();
    let out_dir = out_dir.as_ref().to_path_buf();
    let config = config.clone();

    tokio::task::spawn_blocking(move || export_pages(&input, &out_dir, &config))
        .await
        .map_err(|e| PdfShadeError::Internal(format!("Export task panicked: {}", e)))?
}

/// File stem used as the PNG prefix; `document` for paths without one.
fn document_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "document".to_string())
}

/// `<stem>-<n>.png` with `n` padded to the digit count of `total_pages`.
pub fn page_png_name(stem: &str, page_num: usize, total_pages: usize) -> String {
    let width = total_pages.max(1).to_string().len();
    format!("{stem}-{page_num:0width$}.png")
}

/// True when `dir` holds a `.png` file whose name starts with `stem`.
///
/// A missing or unreadable directory counts as "nothing exported yet".
pub fn has_existing_export(dir: &Path, stem: &str) -> bool {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return false;
    };
    entries.filter_map(Result::ok).any(|entry| {
        let name = PathBuf::from(entry.file_name());
        let is_png = name
            .extension()
            .map(|e| e.eq_ignore_ascii_case("png"))
            .unwrap_or(false);
        is_png && name.to_string_lossy().starts_with(stem)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_pdftoppm_padding() {
        assert_eq!(page_png_name("doc", 1, 1), "doc-1.png");
        assert_eq!(page_png_name("doc", 9, 9), "doc-9.png");
        assert_eq!(page_png_name("doc", 3, 12), "doc-03.png");
        assert_eq!(page_png_name("doc", 12, 12), "doc-12.png");
        assert_eq!(page_png_name("doc", 7, 100), "doc-007.png");
    }

    #[test]
    fn names_sort_in_page_order() {
        let mut names: Vec<String> = (1..=11).rev().map(|n| page_png_name("x", n, 11)).collect();
        names.sort();
        assert_eq!(names.first().unwrap(), "x-01.png");
        assert_eq!(names.last().unwrap(), "x-11.png");
    }

    #[test]
    fn stem_comes_from_file_name() {
        assert_eq!(document_stem(Path::new("/tmp/a/Report 2024.pdf")), "Report 2024");
        assert_eq!(document_stem(Path::new("scan.PDF")), "scan");
    }

    #[test]
    fn existing_export_detection() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!has_existing_export(dir.path(), "report"));

        std::fs::write(dir.path().join("report.txt"), b"").unwrap();
        assert!(!has_existing_export(dir.path(), "report"));

        std::fs::write(dir.path().join("other-1.png"), b"").unwrap();
        assert!(!has_existing_export(dir.path(), "report"));

        std::fs::write(dir.path().join("report-1.PNG"), b"").unwrap();
        assert!(has_existing_export(dir.path(), "report"));
    }

    #[test]
    fn missing_dir_has_no_export() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!has_existing_export(&dir.path().join("absent"), "x"));
    }

    #[test]
    fn skip_existing_returns_without_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("report.pdf");
        std::fs::write(&input, b"%PDF-1.5\n").unwrap();
        let out = dir.path().join("png");
        std::fs::create_dir(&out).unwrap();
        std::fs::write(out.join("report-1.png"), b"").unwrap();

        let config = ExportConfig::builder().skip_existing(true).build().unwrap();
        let result = export_pages(&input, &out, &config).unwrap();
        assert!(result.stats.skipped);
        assert_eq!(result.page_count, 0);
        assert!(result.page_images.is_empty());
    }

    #[test]
    fn missing_input_is_reported_even_when_skipping() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExportConfig::builder().skip_existing(true).build().unwrap();
        let err = export_pages(dir.path().join("gone.pdf"), dir.path(), &config).unwrap_err();
        assert!(matches!(err, PdfShadeError::FileNotFound { .. }));
    }
}
