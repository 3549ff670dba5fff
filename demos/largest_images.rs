//! Picks the most prominent images of a PDF, e.g. to use as cover artwork.
//!
//! Usage:
//!   cargo run --example largest_images -- catalog.pdf
//!   cargo run --example largest_images -- catalog.pdf --count 3 --min 400

use extractimagespdf::{
    filter_by_size, select_largest, PdfAnalyzer, DEFAULT_LARGEST_COUNT, DEFAULT_MIN_WIDTH,
};
use std::{env, process};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <pdf> [--count <n>] [--min <pixels>]", args[0]);
        process::exit(1);
    }

    let pdf_path = &args[1];

    let count = args
        .windows(2)
        .find(|w| w[0] == "--count")
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(DEFAULT_LARGEST_COUNT);

    let min_side = args
        .windows(2)
        .find(|w| w[0] == "--min")
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(DEFAULT_MIN_WIDTH);

    let images = PdfAnalyzer::from_path(pdf_path)
        .and_then(|a| a.extract_images())
        .unwrap_or_else(|e| {
            eprintln!("Cannot extract images: {e}");
            process::exit(1);
        });

    let total = images.len();
    let largest = select_largest(filter_by_size(images, min_side, min_side), count);

    println!("{} of {} image(s) selected:", largest.len(), total);
    for image in largest {
        println!(
            "  page {:>3} #{:<2} {:>5}x{:<5} ({} px)",
            image.page_number(),
            image.index(),
            image.width(),
            image.height(),
            image.area()
        );
    }
}
