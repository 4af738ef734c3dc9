use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ocrlayout::core::model::LayoutParams;
use ocrlayout::pipeline::{extract_text, OcrOptions, PipelineConfig};
use ocrlayout::source::{sniff, FileKind};

#[derive(Parser, Debug)]
#[command(name = "ocrlayout")]
#[command(version, about = "Layout-preserving text extraction from scanned documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract layout-preserving text from a PDF or image
    Convert {
        /// Input PDF or image file
        input: PathBuf,

        /// Output text file (default: <input>.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Rows per page; regulates vertical placement
        #[arg(short = 'r', long, default_value_t = 35)]
        num_rows: usize,

        /// Columns per page; regulates horizontal placement
        #[arg(short = 'c', long, default_value_t = 20)]
        num_columns: usize,

        /// Higher values insert fewer spaces between words
        #[arg(short = 's', long, default_value_t = 8)]
        space_reduction: usize,

        /// Glyph width factor
        #[arg(long, default_value_t = 6)]
        glyph_width: usize,

        /// Pages processed in parallel
        #[arg(short = 'w', long, default_value_t = 2)]
        max_workers: usize,

        /// OCR languages, comma separated
        #[arg(short, long, value_delimiter = ',', default_value = "en,pt")]
        languages: Vec<String>,

        /// 1-based PDF pages to include, comma separated (default: all)
        #[arg(short = 'n', long, value_delimiter = ',')]
        pages: Option<Vec<usize>>,

        /// Run OCR on the CPU instead of the GPU
        #[arg(long)]
        cpu: bool,

        /// Rasterization DPI for PDF pages
        #[arg(long, default_value_t = 200)]
        dpi: u32,

        /// Directory containing poppler binaries
        #[arg(short, long)]
        poppler_path: Option<PathBuf>,

        /// OCR bridge script
        #[arg(long)]
        bridge: Option<PathBuf>,

        /// Only log warnings and errors
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show the detected format and page count of a file
    Info {
        /// Input file path
        input: PathBuf,

        /// Directory containing poppler binaries
        #[arg(short, long)]
        poppler_path: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let quiet = matches!(cli.command, Commands::Convert { quiet: true, .. });
    init_tracing(quiet);

    match cli.command {
        Commands::Convert {
            input,
            output,
            num_rows,
            num_columns,
            space_reduction,
            glyph_width,
            max_workers,
            languages,
            pages,
            cpu,
            dpi,
            poppler_path,
            bridge,
            quiet: _,
        } => {
            let params = LayoutParams::new(num_rows, num_columns)
                .with_space_reduction(space_reduction)
                .with_glyph_width(glyph_width);
            let config = PipelineConfig {
                dpi,
                poppler_path,
                pages,
                ocr: OcrOptions {
                    languages,
                    gpu: !cpu,
                    script: bridge,
                },
                ..PipelineConfig::new(params, max_workers)
            };
            convert(input, output, &config)
        }
        Commands::Info {
            input,
            poppler_path,
        } => show_info(input, poppler_path),
    }
}

fn init_tracing(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn convert(input: PathBuf, output: Option<PathBuf>, config: &PipelineConfig) -> Result<()> {
    if !input.is_file() {
        anyhow::bail!("Input is not a file: {}", input.display());
    }
    let output = output.unwrap_or_else(|| {
        let mut name = input.clone().into_os_string();
        name.push(".txt");
        PathBuf::from(name)
    });

    info!(
        input = %input.display(),
        output = %output.display(),
        rows = config.params.num_rows,
        columns = config.params.num_columns,
        space_reduction = config.params.space_reduction_factor,
        workers = config.workers,
        languages = %config.ocr.languages.join(","),
        gpu = config.ocr.gpu,
        "starting conversion"
    );

    let bytes = fs::read(&input).with_context(|| format!("Failed to read {}", input.display()))?;
    let backend = Arc::new(config.ocr_bridge());
    let text = extract_text(&bytes, config, backend, tracing::Span::current())
        .with_context(|| format!("Failed to process {}", input.display()))?;

    fs::write(&output, text).with_context(|| format!("Failed to write {}", output.display()))?;
    info!(output = %output.display(), "done");
    Ok(())
}

fn show_info(input: PathBuf, poppler_path: Option<PathBuf>) -> Result<()> {
    let bytes = fs::read(&input).with_context(|| format!("Failed to read {}", input.display()))?;
    let kind = sniff(&bytes)?;

    let pages = match kind {
        FileKind::Pdf => {
            let rasterizer = PipelineConfig {
                poppler_path,
                ..PipelineConfig::default()
            }
            .rasterizer();
            rasterizer
                .page_count(&input)
                .with_context(|| format!("Failed to open PDF: {}", input.display()))?
        }
        FileKind::Image(_) => 1,
    };

    println!("File: {}", input.display());
    println!("Format: {}", kind.tag());
    println!("Pages: {}", pages);

    Ok(())
}
