//! Binding to the pdfium shared library.
//!
//! pdfium is loaded at runtime. `PDFIUM_LIB_PATH` may point either at the
//! library file itself or at the directory holding it; without it the
//! system loader's search path is used.

use crate::error::PdfShadeError;
use crate::pipeline::input;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming an explicit pdfium library or directory.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Bind to pdfium, preferring `PDFIUM_LIB_PATH` over the system library.
pub fn bind_pdfium() -> Result<Pdfium, PdfShadeError> {
    let bindings = match std::env::var_os(PDFIUM_LIB_PATH_ENV) {
        Some(p) if !p.is_empty() => {
            let lib = library_file(Path::new(&p));
            debug!("Binding pdfium from {}", lib.display());
            Pdfium::bind_to_library(&lib).map_err(|e| {
                PdfShadeError::PdfiumBindingFailed(format!("{}: {e}", lib.display()))
            })?
        }
        _ => Pdfium::bind_to_system_library()
            .map_err(|e| PdfShadeError::PdfiumBindingFailed(e.to_string()))?,
    };
    Ok(Pdfium::new(bindings))
}

/// Resolve a `PDFIUM_LIB_PATH` value to the library file it names.
fn library_file(path: &Path) -> PathBuf {
    if path.is_dir() {
        Pdfium::pdfium_platform_library_name_at_path(path)
    } else {
        path.to_path_buf()
    }
}

/// Open `path` with pdfium, mapping load failures onto the error taxonomy.
pub fn load_document<'a>(
    pdfium: &'a Pdfium,
    path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, PdfShadeError> {
    let path = input::validate_local(path)?;

    pdfium.load_pdf_from_file(&path, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                PdfShadeError::WrongPassword { path: path.clone() }
            } else {
                PdfShadeError::PasswordRequired { path: path.clone() }
            }
        } else if has_no_pages(&path) {
            PdfShadeError::EmptyDocument { path: path.clone() }
        } else {
            PdfShadeError::CorruptPdf {
                path: path.clone(),
                detail: err_str,
            }
        }
    })
}

/// pdfium refuses to open a document whose page tree is empty and reports a
/// format error. lopdf still parses it, which tells the two cases apart.
fn has_no_pages(path: &Path) -> bool {
    lopdf::Document::load(path)
        .map(|doc| doc.get_pages().is_empty())
        .unwrap_or(false)
}
