//! Pipeline stages shared by the background, grayscale and export entry points.
//!
//! Each submodule implements one transformation step and is tested on its
//! own.
//!
//! ## Data Flow
//!
//! ```text
//! background:  input ──▶ backdrop ──▶ write
//!                         (lopdf)     (atomic rename)
//!
//! grayscale:   input ──▶ render ──▶ desaturate ──▶ persist ──▶ assemble ──▶ write
//!                        (pdfium)   (L8 luma)      (PNG files)  (lopdf)
//! ```
//!
//! The grayscale stages are strictly sequential: every page is rendered
//! before any is desaturated, every page is desaturated before any is
//! persisted, and assembly starts only once all images exist on disk.
//!
//! 1. [`input`]      validate that a path names a readable PDF
//! 2. [`engine`]     bind pdfium and open documents with error mapping
//! 3. [`render`]     rasterise every page at a DPI
//! 4. [`desaturate`] collapse RGB(A) pixels to one luma channel
//! 5. [`persist`]    write page PNGs into a kept or temporary directory
//! 6. [`assemble`]   build an image-per-page PDF from those PNGs
//! 7. [`backdrop`]   prepend a filled rectangle beneath page content
//! 8. [`write`]      save a document via temp file and rename

pub mod assemble;
pub mod backdrop;
pub mod desaturate;
pub mod engine;
pub mod input;
pub mod persist;
pub mod render;
pub mod write;
