//! Result types returned by the pipelines.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What a pipeline produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    /// The document (or directory, for page export) that was written.
    pub output_path: PathBuf,

    /// Number of pages in the input, and therefore in the output.
    pub page_count: usize,

    /// Page images that remain on disk after the run, in page order.
    ///
    /// Empty for the background pipeline and for grayscale runs that used a
    /// temporary image directory.
    pub page_images: Vec<PathBuf>,

    pub stats: PipelineStats,
}

/// Timing information for one pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineStats {
    /// Wall-clock time for the whole run.
    pub total_duration_ms: u64,
    /// Time spent rasterising pages (zero for the background pipeline).
    pub render_duration_ms: u64,
    /// True when page export skipped a document that was already exported.
    pub skipped: bool,
}
