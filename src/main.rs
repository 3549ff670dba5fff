//! CLI tool for extracting embedded images from PDF documents.
//!
//! A thin shim over the library crate: maps flags to `ExtractorConfig`,
//! extracts, filters and ranks images, then writes them to disk.

use clap::{Parser, ValueEnum};
use extractimagespdf::{
    filter_by_size, select_largest, ExtractorConfig, ImageFormat, PdfAnalyzer, Result,
    DEFAULT_MIN_HEIGHT, DEFAULT_MIN_WIDTH,
};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Png,
    Jpeg,
}

impl From<OutputFormat> for ImageFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Jpeg => ImageFormat::Jpeg,
        }
    }
}

/// Extract embedded images from a PDF and save them as PNG or JPEG files.
#[derive(Debug, Parser)]
#[command(name = "extractimagespdf", version, about)]
struct Cli {
    /// Path to the PDF file to analyze
    pdf_file: PathBuf,

    /// Directory to write images to
    #[arg(default_value = "extracted_images")]
    output_dir: PathBuf,

    /// Drop extracted images narrower than this
    #[arg(long, default_value_t = DEFAULT_MIN_WIDTH)]
    min_width: u32,

    /// Drop extracted images shorter than this
    #[arg(long, default_value_t = DEFAULT_MIN_HEIGHT)]
    min_height: u32,

    /// Keep only the N largest images
    #[arg(long, value_name = "N")]
    largest: Option<usize>,

    /// Output encoding
    #[arg(long, value_enum, default_value_t = OutputFormat::Png)]
    format: OutputFormat,

    /// Also collect images nested inside Form XObjects
    #[arg(long)]
    descend_forms: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run_extraction(&cli) {
        Ok(()) => println!("\n✅ Extraction completed successfully!"),
        Err(e) => {
            eprintln!("\n❌ Error: {}", e);
            process::exit(1);
        }
    }
}

fn run_extraction(cli: &Cli) -> Result<()> {
    println!("🔍 Analyzing PDF: {}", cli.pdf_file.display());
    println!("📁 Output directory: {}", cli.output_dir.display());
    println!("{}", "─".repeat(60));

    let config = ExtractorConfig {
        output_format: cli.format.into(),
        descend_into_forms: cli.descend_forms,
        ..Default::default()
    };

    let analyzer = PdfAnalyzer::with_config(&cli.pdf_file, config)?;

    println!("📄 Pages: {}", analyzer.page_count());
    if analyzer.is_encrypted() {
        println!("⚠️  Document is encrypted (will proceed anyway)");
    }

    print!("🖼️  Scanning for image XObjects... ");
    let candidates = analyzer.count_image_xobjects();
    if candidates == 0 {
        println!("ℹ️  No images found");
        return Ok(());
    }
    println!("✅ Found {} candidate image(s)", candidates);

    println!("\n🚀 Extracting images:");
    println!("{}", "─".repeat(60));

    let report = analyzer.extract_images_with_report()?;
    let extracted = report.images.len();

    let mut images = filter_by_size(report.images, cli.min_width, cli.min_height);
    if let Some(n) = cli.largest {
        images = select_largest(images, n);
    }

    for image in &images {
        let dest = image.save_to_disk(&cli.output_dir)?;
        println!(
            "\n📄 Page {} #{}: {}x{} ({})",
            image.page_number(),
            image.index(),
            image.width(),
            image.height(),
            format_bytes(image.buffer().len())
        );
        println!("   💾 Saved to: {}", dest.display());
    }

    if !report.skipped.is_empty() {
        println!("\n⚠️  Skipped:");
        for skipped in &report.skipped {
            println!(
                "   • page {} {}: {}",
                skipped.page_number, skipped.key, skipped.reason
            );
        }
    }

    println!("\n{}", "─".repeat(60));
    println!("📊 Summary:");
    println!("   • {} image(s) decoded", extracted);
    println!(
        "   • {} image(s) saved after filtering (min {}x{})",
        images.len(),
        cli.min_width,
        cli.min_height
    );
    println!("   • {} image(s) skipped", report.skipped.len());
    let total_size: usize = images.iter().map(|i| i.buffer().len()).sum();
    println!("   • Total size: {}", format_bytes(total_size));
    println!("   • Output directory: {}", display_dir(&cli.output_dir));

    Ok(())
}

fn display_dir(dir: &Path) -> String {
    dir.canonicalize()
        .unwrap_or_else(|_| dir.to_path_buf())
        .display()
        .to_string()
}

fn format_bytes(bytes: usize) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}
