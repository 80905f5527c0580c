//! Configuration types for the pdfshade pipelines.
//!
//! Each pipeline has one config struct built through a validating builder:
//! [`BackgroundConfig`], [`GrayscaleConfig`] and [`ExportConfig`]. Defaults
//! are a `(0.1, 0.1, 0.1)` dark-gray fill, 150 DPI for grayscale
//! rasterisation and 400 DPI for page export.

use crate::error::PdfShadeError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Lowest accepted rendering resolution.
pub const MIN_DPI: u32 = 36;
/// Highest accepted rendering resolution.
pub const MAX_DPI: u32 = 600;

// ── Fill colour ──────────────────────────────────────────────────────────

/// An RGB fill colour with each channel normalised to `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for FillColor {
    /// Dark gray, `(0.1, 0.1, 0.1)`.
    fn default() -> Self {
        Self::DARK_GRAY
    }
}

impl FillColor {
    pub const DARK_GRAY: FillColor = FillColor {
        r: 0.1,
        g: 0.1,
        b: 0.1,
    };

    /// Build a colour, rejecting channels outside `0.0..=1.0` or non-finite.
    pub fn new(r: f32, g: f32, b: f32) -> Result<Self, PdfShadeError> {
        let c = Self { r, g, b };
        c.validate()?;
        Ok(c)
    }

    /// Build a colour from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: f32::from(r) / 255.0,
            g: f32::from(g) / 255.0,
            b: f32::from(b) / 255.0,
        }
    }

    /// The colour as 8-bit channels, truncated the way PDF renderers
    /// quantise `0.1` to `25`.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |v: f32| (v * 255.0) as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    pub(crate) fn validate(&self) -> Result<(), PdfShadeError> {
        for (name, v) in [("red", self.r), ("green", self.g), ("blue", self.b)] {
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return Err(PdfShadeError::InvalidConfig(format!(
                    "{name} channel must be within 0.0–1.0, got {v}"
                )));
            }
        }
        Ok(())
    }
}

impl FromStr for FillColor {
    type Err = PdfShadeError;

    /// Accepts `"r,g,b"` with floats in `0.0..=1.0` or `"#rrggbb"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(PdfShadeError::InvalidConfig(format!(
                    "hex colour must look like #1a1a1a, got '{s}'"
                )));
            }
            let channel = |i: usize| {
                u8::from_str_radix(&hex[i..i + 2], 16)
                    .map_err(|e| PdfShadeError::InvalidConfig(format!("bad hex colour '{s}': {e}")))
            };
            return Ok(Self::from_rgb8(channel(0)?, channel(2)?, channel(4)?));
        }

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(PdfShadeError::InvalidConfig(format!(
                "colour must be 'r,g,b' or '#rrggbb', got '{s}'"
            )));
        }
        let mut channels = [0.0f32; 3];
        for (slot, part) in channels.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| {
                PdfShadeError::InvalidConfig(format!("invalid colour channel '{part}'"))
            })?;
        }
        Self::new(channels[0], channels[1], channels[2])
    }
}

impl fmt::Display for FillColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

pub(crate) fn validate_dpi(dpi: u32) -> Result<(), PdfShadeError> {
    if !(MIN_DPI..=MAX_DPI).contains(&dpi) {
        return Err(PdfShadeError::InvalidConfig(format!(
            "DPI must be {MIN_DPI}–{MAX_DPI}, got {dpi}"
        )));
    }
    Ok(())
}

// ── Background overlay ───────────────────────────────────────────────────

/// Configuration for [`crate::background::add_background`].
#[derive(Clone, Default)]
pub struct BackgroundConfig {
    /// Fill colour of the background rectangle. Default: dark gray.
    pub color: FillColor,

    /// Optional per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for BackgroundConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundConfig")
            .field("color", &self.color)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn PageProgressCallback>"),
            )
            .finish()
    }
}

impl BackgroundConfig {
    pub fn builder() -> BackgroundConfigBuilder {
        BackgroundConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`BackgroundConfig`].
#[derive(Debug)]
pub struct BackgroundConfigBuilder {
    config: BackgroundConfig,
}

impl BackgroundConfigBuilder {
    pub fn color(mut self, color: FillColor) -> Self {
        self.config.color = color;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    pub fn build(self) -> Result<BackgroundConfig, PdfShadeError> {
        self.config.color.validate()?;
        Ok(self.config)
    }
}

// ── Grayscale rasterisation ──────────────────────────────────────────────

/// Configuration for [`crate::grayscale::to_grayscale`].
///
/// # Example
/// ```rust
/// use pdfshade::GrayscaleConfig;
///
/// let config = GrayscaleConfig::builder()
///     .dpi(200)
///     .image_dir("pages/")
///     .build()
///     .unwrap();
/// assert_eq!(config.dpi, 200);
/// ```
#[derive(Clone)]
pub struct GrayscaleConfig {
    /// Rendering resolution. Range: 36–600. Default: 150.
    ///
    /// Output page size in points is `pixels × 72 / dpi`, so the physical
    /// page size is kept while the pixel density follows this value.
    pub dpi: u32,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Where the grayscale page PNGs are written before assembly.
    ///
    /// `None` (default) uses a private temporary directory that is removed
    /// when the pipeline returns, whether it succeeded or not. `Some(dir)`
    /// keeps the PNGs in `dir` after the run.
    pub image_dir: Option<PathBuf>,

    /// Parent of the private temporary directory used when `image_dir` is
    /// `None`. Defaults to the system temp dir.
    pub temp_root: Option<PathBuf>,

    /// Optional per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for GrayscaleConfig {
    fn default() -> Self {
        Self {
            dpi: 150,
            password: None,
            image_dir: None,
            temp_root: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for GrayscaleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrayscaleConfig")
            .field("dpi", &self.dpi)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("image_dir", &self.image_dir)
            .field("temp_root", &self.temp_root)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn PageProgressCallback>"),
            )
            .finish()
    }
}

impl GrayscaleConfig {
    pub fn builder() -> GrayscaleConfigBuilder {
        GrayscaleConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`GrayscaleConfig`].
#[derive(Debug)]
pub struct GrayscaleConfigBuilder {
    config: GrayscaleConfig,
}

impl GrayscaleConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(MIN_DPI, MAX_DPI);
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.image_dir = Some(dir.into());
        self
    }

    pub fn temp_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.temp_root = Some(dir.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    pub fn build(self) -> Result<GrayscaleConfig, PdfShadeError> {
        validate_dpi(self.config.dpi)?;
        Ok(self.config)
    }
}

// ── Page export ──────────────────────────────────────────────────────────

/// Configuration for [`crate::export::export_pages`].
#[derive(Clone)]
pub struct ExportConfig {
    /// Rendering resolution. Range: 36–600. Default: 400.
    pub dpi: u32,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Skip the document when a PNG with its file stem already exists in
    /// the output directory. Default: false.
    pub skip_existing: bool,

    /// Optional per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dpi: 400,
            password: None,
            skip_existing: false,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportConfig")
            .field("dpi", &self.dpi)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("skip_existing", &self.skip_existing)
            .finish()
    }
}

impl ExportConfig {
    pub fn builder() -> ExportConfigBuilder {
        ExportConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExportConfig`].
#[derive(Debug)]
pub struct ExportConfigBuilder {
    config: ExportConfig,
}

impl ExportConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(MIN_DPI, MAX_DPI);
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn skip_existing(mut self, v: bool) -> Self {
        self.config.skip_existing = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    pub fn build(self) -> Result<ExportConfig, PdfShadeError> {
        validate_dpi(self.config.dpi)?;
        Ok(self.config)
    }
}
