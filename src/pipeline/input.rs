//! Input validation: make sure a user-supplied path is a readable PDF.
//!
//! Both document libraries report a missing file and a malformed file with
//! the same opaque error. Checking existence, read permission and the `%PDF`
//! magic bytes up front lets every pipeline fail with a precise
//! [`PdfShadeError`] before anything is rendered or written.

use crate::error::PdfShadeError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validate `path` and return it as an owned `PathBuf`.
pub fn validate_local(path: &Path) -> Result<PathBuf, PdfShadeError> {
    let path = path.to_path_buf();

    if !path.is_file() {
        return Err(PdfShadeError::FileNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            match f.read_exact(&mut magic) {
                Ok(()) if &magic == b"%PDF" => {}
                Ok(()) => return Err(PdfShadeError::NotAPdf { path, magic }),
                // Shorter than the header itself.
                Err(_) => {
                    return Err(PdfShadeError::CorruptPdf {
                        path,
                        detail: "file is shorter than a PDF header".into(),
                    })
                }
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(PdfShadeError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(PdfShadeError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}
