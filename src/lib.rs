//! # pdfshade
//!
//! Two page-level PDF transformations and a page exporter.
//!
//! ## Background overlay
//!
//! Paints a solid rectangle *beneath* the existing content of every page,
//! turning a white page dark (default fill `(0.1, 0.1, 0.1)`) while leaving
//! text and vector content intact and selectable. The document structure is
//! edited directly with `lopdf`; nothing is rasterised.
//!
//! ## Grayscale rasterisation
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Render      every page to a bitmap at the chosen DPI (pdfium)
//!  ├─ 2. Desaturate  every bitmap to 8-bit luma
//!  ├─ 3. Persist     every bitmap as a PNG (temporary or kept directory)
//!  └─ 4. Assemble    the PNGs, in page order, into a new image-only PDF
//! ```
//!
//! Stages never overlap: a page is not desaturated until every page has
//! been rendered.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfshade::{add_background, to_grayscale, BackgroundConfig, GrayscaleConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     add_background("in.pdf", "dark.pdf", &BackgroundConfig::default())?;
//!
//!     let config = GrayscaleConfig::builder().dpi(200).build()?;
//!     let output = to_grayscale("in.pdf", "gray.pdf", &config)?;
//!     eprintln!("{} pages in {}ms", output.page_count, output.stats.total_duration_ms);
//!     Ok(())
//! }
//! ```
//!
//! Rasterising pipelines need the pdfium shared library at runtime; see
//! [`PdfShadeError::PdfiumBindingFailed`]. The background overlay does not.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfshade` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdfshade = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod background;
pub mod config;
pub mod error;
pub mod export;
pub mod grayscale;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use background::{add_background, add_background_async};
pub use config::{
    BackgroundConfig, BackgroundConfigBuilder, ExportConfig, ExportConfigBuilder, FillColor,
    GrayscaleConfig, GrayscaleConfigBuilder, MAX_DPI, MIN_DPI,
};
pub use error::PdfShadeError;
pub use export::{export_pages, export_pages_async};
pub use grayscale::{to_grayscale, to_grayscale_async};
pub use output::{PipelineOutput, PipelineStats};
pub use progress::{NoopProgressCallback, PageProgressCallback, ProgressCallback};
