//! # HVAC Report CLI
//!
//! Command-line front end for building service reports from a site visit file.
//!
//! ## Usage
//!
//! ```bash
//! # Write hvac-service-report.pdf next to the current directory
//! hvac-report export visit.json
//!
//! # Write it into a specific directory
//! hvac-report export visit.json out/
//!
//! # Save the unpaginated report surface as PNG
//! hvac-report preview visit.json surface.png
//! ```
//!
//! Logging follows `RUST_LOG` (default `info`).

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hvac_report::{
    ReportConfig, ReportError,
    document,
    input::{self, LoadedSession, ReportInput},
    pdf::PdfWriter,
    render::{RasterRenderer, SurfaceRenderer},
};

/// HVAC Service Reporter - inspection records to printable reports
#[derive(Parser, Debug)]
#[command(name = "hvac-report")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Export the report as an A4 PDF
    Export {
        /// Site visit JSON file
        input: PathBuf,

        /// Directory to write the report into (defaults to the current directory)
        out_dir: Option<PathBuf>,
    },

    /// Render the report surface to a PNG without paginating
    Preview {
        /// Site visit JSON file
        input: PathBuf,

        /// PNG file to write
        png: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), ReportError> {
    let cli = Cli::parse();
    let config = ReportConfig::default();

    match cli.command {
        Commands::Export { input, out_dir } => {
            let loaded = load_session(&input, config).await?;

            let date = chrono::Local::now().date_naive();
            let artifact = loaded
                .session
                .export_async(
                    date,
                    Arc::new(RasterRenderer::for_config(&config)),
                    Arc::new(PdfWriter::for_config(&config)),
                )
                .await?;

            let out_dir = out_dir.unwrap_or_else(|| PathBuf::from("."));
            tokio::fs::create_dir_all(&out_dir).await?;
            let out_path = out_dir.join(&artifact.file_name);
            tokio::fs::write(&out_path, &artifact.bytes).await?;

            println!(
                "Saved {} ({} page{}, {} unit{})",
                out_path.display(),
                artifact.page_count,
                plural(artifact.page_count),
                artifact.document.sections.len(),
                plural(artifact.document.sections.len()),
            );
        }

        Commands::Preview { input, png } => {
            let loaded = load_session(&input, config).await?;
            let session = &loaded.session;

            let doc = document::assemble_today(session.client(), session.units());
            let renderer = RasterRenderer::for_config(&config);
            let surface = tokio::task::spawn_blocking(move || renderer.render(&doc))
                .await
                .map_err(|e| ReportError::Render(format!("Render task failed: {}", e)))??;

            surface
                .save(&png)
                .map_err(|e| ReportError::Render(format!("Failed to save {}: {}", png.display(), e)))?;
            println!(
                "Saved {} ({}x{})",
                png.display(),
                surface.width(),
                surface.height()
            );
        }
    }

    Ok(())
}

async fn load_session(path: &Path, config: ReportConfig) -> Result<LoadedSession, ReportError> {
    info!("Loading {}", path.display());
    // Skipped photos are logged by into_session
    ReportInput::load(path)?
        .into_session(input::base_dir(path), config)
        .await
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}
