//! Minimal program that writes out every image embedded in a PDF.
//!
//! Usage:
//!   cargo run --example extract_images -- catalog.pdf
//!   cargo run --example extract_images -- catalog.pdf ./output

use extractimagespdf::PdfAnalyzer;
use std::{env, process};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <pdf_file> [output_dir]", args[0]);
        process::exit(1);
    }

    let pdf_path = &args[1];
    let save_dir = args.get(2).map(String::as_str).unwrap_or(".");

    println!("Analysing: {pdf_path}");

    let analyzer = PdfAnalyzer::from_path(pdf_path).unwrap_or_else(|e| {
        eprintln!("Error loading PDF: {e}");
        process::exit(1);
    });

    println!("✓ {} page(s)", analyzer.page_count());

    let report = analyzer.extract_images_with_report().unwrap_or_else(|e| {
        eprintln!("Extraction error: {e}");
        process::exit(1);
    });

    if report.images.is_empty() {
        println!("  No images found.");
    }

    for image in &report.images {
        println!("\n  {}", image.file_name());
        println!("    Size : {}x{}", image.width(), image.height());
        println!("    Bytes: {}", image.buffer().len());
        match image.save_to_disk(save_dir) {
            Ok(path) => println!("    ✓ Saved to {}", path.display()),
            Err(e) => eprintln!("    ✗ Save failed: {e}"),
        }
    }

    for skipped in &report.skipped {
        println!("⚠ page {} {}: {}", skipped.page_number, skipped.key, skipped.reason);
    }
}
