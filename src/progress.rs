//! Progress-callback trait for per-page pipeline events.
//!
//! Inject an [`Arc<dyn PageProgressCallback>`] through any config builder
//! (for example [`crate::config::GrayscaleConfigBuilder::progress_callback`])
//! to receive events as a pipeline works through the document.
//!
//! Pages are processed strictly in order on one thread, so events for page
//! `n + 1` never arrive before `on_page_complete` for page `n`. The trait is
//! still `Send + Sync` because the `_async` entry points move the pipeline
//! onto a blocking worker thread.
//!
//! # Example
//!
//! ```rust
//! use pdfshade::{GrayscaleConfig, PageProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: AtomicUsize,
//! }
//!
//! impl PageProgressCallback for CountingCallback {
//!     fn on_page_complete(&self, stage: &str, page_num: usize, total_pages: usize) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{stage}: page {page_num}/{total_pages}");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { completed: AtomicUsize::new(0) });
//!
//! let config = GrayscaleConfig::builder()
//!     .progress_callback(counter as Arc<dyn PageProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by a pipeline as it processes each page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. `stage` names the pipeline step reporting the event
/// (`"background"`, `"render"`, `"desaturate"`, `"persist"`, `"export"`).
pub trait PageProgressCallback: Send + Sync {
    /// Called once after the document is opened, before any page work.
    fn on_pipeline_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called just before a page enters `stage`.
    fn on_page_start(&self, stage: &str, page_num: usize, total_pages: usize) {
        let _ = (stage, page_num, total_pages);
    }

    /// Called when a page has finished `stage`.
    fn on_page_complete(&self, stage: &str, page_num: usize, total_pages: usize) {
        let _ = (stage, page_num, total_pages);
    }

    /// Called once after the output document has been written.
    fn on_pipeline_complete(&self, total_pages: usize) {
        let _ = total_pages;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl PageProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in the config structs.
pub type ProgressCallback = Arc<dyn PageProgressCallback>;

/// Fire `on_page_start` / `on_page_complete` around `work` when a callback
/// is configured.
pub(crate) fn track_page<T, E>(
    callback: Option<&ProgressCallback>,
    stage: &str,
    page_num: usize,
    total_pages: usize,
    work: impl FnOnce() -> Result<T, E>,
) -> Result<T, E> {
    if let Some(cb) = callback {
        cb.on_page_start(stage, page_num, total_pages);
    }
    let out = work()?;
    if let Some(cb) = callback {
        cb.on_page_complete(stage, page_num, total_pages);
    }
    Ok(out)
}
