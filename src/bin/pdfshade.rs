//! CLI binary for pdfshade.
//!
//! A thin shim over the library crate that maps subcommand flags to the
//! pipeline configs and prints results.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use pdfshade::{
    add_background_async, export_pages_async, to_grayscale_async, BackgroundConfig, ExportConfig,
    FillColor, GrayscaleConfig, PageProgressCallback, PipelineOutput, ProgressCallback,
};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar that restarts for each pipeline
/// stage ("render", "desaturate", …) and is cleared when the run ends.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Stage the bar is currently showing.
    stage: Mutex<String>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            stage: Mutex::new(String::new()),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:>10.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_message("");
    }
}

impl PageProgressCallback for CliProgressCallback {
    fn on_pipeline_start(&self, total_pages: usize) {
        self.activate_bar(total_pages);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Processing {total_pages} pages…"))
        ));
    }

    fn on_page_start(&self, stage: &str, _page_num: usize, _total_pages: usize) {
        if let Ok(mut current) = self.stage.lock() {
            if current.as_str() != stage {
                *current = stage.to_string();
                self.bar.set_prefix(stage.to_string());
                self.bar.set_position(0);
            }
        }
    }

    fn on_page_complete(&self, _stage: &str, page_num: usize, _total_pages: usize) {
        self.bar.set_position(page_num as u64);
    }

    fn on_pipeline_complete(&self, _total_pages: usize) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Dark background under every page (default fill 0.1,0.1,0.1)
  pdfshade background input.pdf -o dark.pdf

  # Custom fill colour
  pdfshade background input.pdf -o sepia.pdf --color '#704214'

  # Grayscale at 200 DPI, keeping the intermediate page images
  pdfshade grayscale input.pdf -o gray.pdf --dpi 200 --image-dir pages/

  # Export pages as PNG (report-01.png, report-02.png, …)
  pdfshade export report.pdf -o png/ --skip-existing

  # JSON result on stdout
  pdfshade grayscale --json input.pdf -o gray.pdf

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         libpdfium file or directory (grayscale and export)
  RUST_LOG                Log filter, overrides --verbose / --quiet
"#;

/// Darken PDF pages, convert them to grayscale, or export them as images.
#[derive(Parser, Debug)]
#[command(
    name = "pdfshade",
    version,
    about = "Darken PDF pages, convert them to grayscale, or export them as images",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Print the pipeline result as JSON on stdout.
    #[arg(long, global = true, env = "PDFSHADE_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, global = true, env = "PDFSHADE_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "PDFSHADE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "PDFSHADE_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Paint a filled rectangle beneath every page's content.
    Background {
        /// Input PDF.
        input: PathBuf,

        /// Output PDF (overwritten if it exists).
        #[arg(short, long)]
        output: PathBuf,

        /// Fill colour as `r,g,b` in 0.0–1.0 or `#rrggbb`.
        #[arg(long, env = "PDFSHADE_COLOR", default_value_t = FillColor::DARK_GRAY)]
        color: FillColor,
    },

    /// Rasterise every page, convert it to grayscale and rebuild the PDF.
    Grayscale {
        /// Input PDF.
        input: PathBuf,

        /// Output PDF (overwritten if it exists).
        #[arg(short, long)]
        output: PathBuf,

        /// Rendering DPI (36–600).
        #[arg(long, env = "PDFSHADE_DPI", default_value_t = 150,
              value_parser = clap::value_parser!(u32).range(36..=600))]
        dpi: u32,

        /// Keep the grayscale page PNGs in this directory.
        #[arg(long, env = "PDFSHADE_IMAGE_DIR")]
        image_dir: Option<PathBuf>,

        /// PDF user password for encrypted documents.
        #[arg(long, env = "PDFSHADE_PASSWORD")]
        password: Option<String>,
    },

    /// Write every page as a PNG named `<stem>-<n>.png`.
    Export {
        /// Input PDF.
        input: PathBuf,

        /// Output directory.
        #[arg(short, long)]
        output: PathBuf,

        /// Rendering DPI (36–600).
        #[arg(long, env = "PDFSHADE_EXPORT_DPI", default_value_t = 400,
              value_parser = clap::value_parser!(u32).range(36..=600))]
        dpi: u32,

        /// Skip the document if PNGs with its name already exist.
        #[arg(long, env = "PDFSHADE_SKIP_EXISTING")]
        skip_existing: bool,

        /// PDF user password for encrypted documents.
        #[arg(long, env = "PDFSHADE_PASSWORD")]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let common = &cli.common;

    // ── Logging setup ────────────────────────────────────────────────────
    // INFO-level library logs are hidden while the progress bar is active.
    let show_progress = !common.quiet && !common.no_progress && !common.json;
    let filter = if common.verbose {
        "debug"
    } else if common.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn PageProgressCallback>)
    } else {
        None
    };

    // ── Run pipeline ─────────────────────────────────────────────────────
    let output = match &cli.command {
        Command::Background {
            input,
            output,
            color,
        } => {
            let mut builder = BackgroundConfig::builder().color(*color);
            if let Some(cb) = progress_cb {
                builder = builder.progress_callback(cb);
            }
            let config = builder.build().context("Invalid configuration")?;
            add_background_async(input, output, &config)
                .await
                .with_context(|| format!("Failed to add background to {}", input.display()))?
        }
        Command::Grayscale {
            input,
            output,
            dpi,
            image_dir,
            password,
        } => {
            let mut builder = GrayscaleConfig::builder().dpi(*dpi);
            if let Some(dir) = image_dir {
                builder = builder.image_dir(dir);
            }
            if let Some(pwd) = password {
                builder = builder.password(pwd);
            }
            if let Some(cb) = progress_cb {
                builder = builder.progress_callback(cb);
            }
            let config = builder.build().context("Invalid configuration")?;
            to_grayscale_async(input, output, &config)
                .await
                .with_context(|| format!("Grayscale conversion of {} failed", input.display()))?
        }
        Command::Export {
            input,
            output,
            dpi,
            skip_existing,
            password,
        } => {
            let mut builder = ExportConfig::builder()
                .dpi(*dpi)
                .skip_existing(*skip_existing);
            if let Some(pwd) = password {
                builder = builder.password(pwd);
            }
            if let Some(cb) = progress_cb {
                builder = builder.progress_callback(cb);
            }
            let config = builder.build().context("Invalid configuration")?;
            export_pages_async(input, output, &config)
                .await
                .with_context(|| format!("Page export of {} failed", input.display()))?
        }
    };

    report(common, &output)
}

/// Print the result: JSON on stdout, or a one-line summary on stderr.
fn report(common: &CommonArgs, output: &PipelineOutput) -> Result<()> {
    if common.json {
        let json = serde_json::to_string_pretty(output).context("Failed to serialise output")?;
        println!("{json}");
        return Ok(());
    }
    if common.quiet {
        return Ok(());
    }

    if output.stats.skipped {
        eprintln!(
            "{}  already exported  →  {}",
            cyan("↷"),
            bold(&output.output_path.display().to_string())
        );
        return Ok(());
    }

    eprintln!(
        "{}  {} pages  {}ms  →  {}",
        green("✔"),
        output.page_count,
        output.stats.total_duration_ms,
        bold(&output.output_path.display().to_string()),
    );
    if !output.page_images.is_empty() {
        eprintln!(
            "   {}",
            dim(&format!("{} page images kept", output.page_images.len()))
        );
    }
    Ok(())
}
