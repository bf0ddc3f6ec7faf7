use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use img2pdf::{Document, ExportOptions, ImportOptions, PreviewCache};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "i2p", about = "Assemble images and PDF pages into a single PDF", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble input pages, in the given order, into one PDF
    Assemble {
        /// Input files: `file` adds every page, `file#N` adds page N (zero-based)
        #[arg(required = true, num_args = 1..)]
        inputs: Vec<String>,

        /// Output PDF file (`.pdf` is appended if missing)
        #[arg(short, long)]
        output: PathBuf,

        /// JPEG quality for embedded pages (1-100)
        #[arg(long, default_value = "80")]
        quality: u8,

        /// Skip stream compression of the output
        #[arg(long)]
        no_optimize: bool,

        /// Zoom factor for rasterizing PDF inputs
        #[arg(long, default_value = "1.0")]
        zoom: f32,
    },

    /// Show page counts for input files
    Info {
        /// Files to inspect
        #[arg(required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,

        /// Zoom factor for rasterizing PDF inputs
        #[arg(long, default_value = "1.0")]
        zoom: f32,
    },

    /// Write a 300px preview thumbnail of one page
    Thumbnail {
        /// Input file
        input: PathBuf,

        /// Page index within the input (zero-based)
        #[arg(long, default_value = "0")]
        page: usize,

        /// Output JPEG file
        #[arg(short, long)]
        output: PathBuf,

        /// Zoom factor for rasterizing PDF inputs
        #[arg(long, default_value = "1.0")]
        zoom: f32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Assemble {
            inputs,
            output,
            quality,
            no_optimize,
            zoom,
        } => {
            let import = ImportOptions { zoom };
            let export = ExportOptions {
                quality,
                optimize: !no_optimize,
            };

            let mut document = Document::new();
            for input in &inputs {
                let (path, page) = parse_input(input)?;
                let file_index = document.file_count();
                document
                    .import_file(&path, &import)
                    .await
                    .with_context(|| format!("failed to import {}", path.display()))?;
                match page {
                    Some(n) => {
                        if !document.add_page(file_index, n)? {
                            eprintln!(
                                "warning: {} has no page {}, skipped",
                                path.display(),
                                n
                            );
                        }
                    }
                    None => {
                        document.add_all_pages(file_index)?;
                    }
                }
            }

            let written = img2pdf::export_pdf(&document, &output, &export).await?;
            println!(
                "Assembled {} page(s) → {}",
                document.page_count(),
                written.display()
            );
        }

        Commands::Info { inputs, zoom } => {
            let import = ImportOptions { zoom };
            for path in inputs {
                if !img2pdf::is_supported(&path) {
                    println!("{}: unsupported", path.display());
                    continue;
                }
                match img2pdf::load_pages(&path, &import).await {
                    Ok(pages) => println!("{}: {} page(s)", path.display(), pages.len()),
                    Err(e) => println!("{}: {}", path.display(), e),
                }
            }
        }

        Commands::Thumbnail {
            input,
            page,
            output,
            zoom,
        } => {
            let import = ImportOptions { zoom };
            let mut document = Document::new();
            document
                .import_file(&input, &import)
                .await
                .with_context(|| format!("failed to import {}", input.display()))?;
            if !document.add_page(0, page)? {
                bail!("{} has no page {}", input.display(), page);
            }

            let mut cache = PreviewCache::in_memory();
            let thumb = cache
                .thumbnail(&document, 0)?
                .context("nothing to preview")?;
            tokio::fs::write(&output, &thumb.jpeg).await?;
            println!(
                "Thumbnail {}×{} → {}",
                thumb.width,
                thumb.height,
                output.display()
            );
        }
    }

    Ok(())
}

/// Split an input spec into path and optional single-page index
/// (`scan.pdf#2` → page 2 of scan.pdf).
fn parse_input(spec: &str) -> Result<(PathBuf, Option<usize>)> {
    match spec.rsplit_once('#') {
        Some((path, page)) if !path.is_empty() => {
            let page = page
                .parse::<usize>()
                .with_context(|| format!("invalid page number in `{}`", spec))?;
            Ok((PathBuf::from(path), Some(page)))
        }
        _ => Ok((PathBuf::from(spec), None)),
    }
}
