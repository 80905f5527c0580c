//! Error types for the pdfshade library.
//!
//! Every failure is fatal to the pipeline that raised it: a document is
//! either transformed completely or no output file is written. The variants
//! are grouped by where the failure happens so callers can tell a bad input
//! from an unwritable destination without parsing messages.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdfshade library.
#[derive(Debug, Error)]
pub enum PdfShadeError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// The document parsed but has no pages.
    #[error("PDF '{path}' has no pages; nothing to transform")]
    EmptyDocument { path: PathBuf },

    /// pdfium-render returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// Building the output document from page images failed.
    #[error("Could not assemble output PDF: {0}")]
    AssemblyFailed(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output PDF.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not write or read back a page image.
    #[error("Failed to persist page image '{path}': {source}")]
    ImageWriteFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Rasterisation needs the pdfium shared library. You can:\n\
  • Install libpdfium so the system loader can find it.\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium (or its directory).\n\
Pre-built libraries: https://github.com/bblanchon/pdfium-binaries/releases\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_display() {
        let e = PdfShadeError::EmptyDocument {
            path: PathBuf::from("blank.pdf"),
        };
        let msg = e.to_string();
        assert!(msg.contains("blank.pdf"), "got: {msg}");
        assert!(msg.contains("no pages"), "got: {msg}");
    }

    #[test]
    fn rasterisation_display_names_page() {
        let e = PdfShadeError::RasterisationFailed {
            page: 3,
            detail: "bitmap alloc".into(),
        };
        assert!(e.to_string().contains("page 3"));
        assert!(e.to_string().contains("bitmap alloc"));
    }

    #[test]
    fn output_write_keeps_io_source() {
        use std::error::Error as _;

        let e = PdfShadeError::OutputWriteFailed {
            path: PathBuf::from("/ro/out.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        };
        assert!(e.to_string().contains("/ro/out.pdf"));
        assert!(e.source().is_some());
    }

    #[test]
    fn not_a_pdf_shows_magic() {
        let e = PdfShadeError::NotAPdf {
            path: PathBuf::from("x.png"),
            magic: *b"\x89PNG",
        };
        assert!(e.to_string().contains("x.png"));
    }
}
