//! Write page images to disk so the assembly stage can read them by path.
//!
//! Images go either into a caller-chosen directory, where they stay, or into
//! a private [`TempDir`] that is deleted when the [`ImageDir`] is dropped.
//! Dropping happens on every exit path of the pipeline, so temporary page
//! images never outlive a run.

use crate::error::PdfShadeError;
use image::{GrayImage, ImageFormat};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// Where persisted page images live for the duration of a run.
pub enum ImageDir {
    /// Caller-supplied directory; images are kept.
    Retained(PathBuf),
    /// Private temporary directory; removed on drop.
    Temporary(TempDir),
}

impl ImageDir {
    /// Use `dir` when given (creating it if needed), else a fresh temp dir
    /// under `temp_root` or the system temp dir.
    pub fn new(dir: Option<&Path>, temp_root: Option<&Path>) -> Result<Self, PdfShadeError> {
        match dir {
            Some(d) => {
                std::fs::create_dir_all(d).map_err(|e| PdfShadeError::OutputWriteFailed {
                    path: d.to_path_buf(),
                    source: e,
                })?;
                Ok(Self::Retained(d.to_path_buf()))
            }
            None => {
                let mut builder = tempfile::Builder::new();
                builder.prefix("pdfshade-");
                let tmp = match temp_root {
                    Some(root) => builder.tempdir_in(root),
                    None => builder.tempdir(),
                }
                .map_err(|e| PdfShadeError::Internal(format!("tempdir: {e}")))?;
                Ok(Self::Temporary(tmp))
            }
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ImageDir::Retained(p) => p,
            ImageDir::Temporary(t) => t.path(),
        }
    }

    pub fn is_retained(&self) -> bool {
        matches!(self, ImageDir::Retained(_))
    }
}

/// File name for a 1-indexed page: `page-0001.png`.
pub fn page_file_name(page_num: usize) -> String {
    format!("page-{page_num:04}.png")
}

/// Save one grayscale page as PNG and return its path.
pub fn persist_page(dir: &ImageDir, page_num: usize, image: &GrayImage) -> Result<PathBuf, PdfShadeError> {
    let path = dir.path().join(page_file_name(page_num));
    image
        .save_with_format(&path, ImageFormat::Png)
        .map_err(|e| PdfShadeError::ImageWriteFailed {
            path: path.clone(),
            source: e,
        })?;
    debug!("Persisted page {} → {}", page_num, path.display());
    Ok(path)
}
