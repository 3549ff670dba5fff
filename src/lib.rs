//! # extractimagespdf
//!
//! A Rust library for pulling embedded raster images out of PDF documents.
//!
//! ## What this crate does
//!
//! 1. **Walk pages**: resolves every page's `/Resources/XObject` dictionary in
//!    document order.
//! 2. **Classify XObjects**: keeps `/Subtype /Image` streams and reads their
//!    declared size, colour space and filter. Tiny images (logos, icons) are
//!    rejected before any decoding happens.
//! 3. **Decode streams**: JPEG (`/DCTDecode`), zlib (`/FlateDecode`) raw
//!    rasters and self-describing PNG/JPEG payloads, through an ordered
//!    cascade of decode strategies.
//! 4. **Normalize**: re-encodes every image into one canonical format (PNG by
//!    default) and measures its real dimensions.
//! 5. **Rank**: [`filter_by_size`] and [`select_largest`] post-process the
//!    extracted images without decoding anything again.
//!
//! A broken image never aborts extraction: it is logged through `tracing` and
//! skipped. Only a document that cannot be loaded at all is an error.
//!
//! ## Quick example
//!
//! ```no_run
//! use extractimagespdf::{filter_by_size, select_largest, PdfAnalyzer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let analyzer = PdfAnalyzer::from_path("catalog.pdf")?;
//!
//! let images = analyzer.extract_images()?;
//! let images = filter_by_size(images, 200, 200);
//!
//! for image in select_largest(images, 5) {
//!     println!(
//!         "page {} #{}: {}x{}",
//!         image.page_number(),
//!         image.index(),
//!         image.width(),
//!         image.height()
//!     );
//! }
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

mod analyzer;
mod classifier;
mod decoder;
mod extracted;
mod extraction_engine;
mod normalizer;
mod page_walker;
mod pdf_utils;
mod ranking;
mod validator;

pub use analyzer::PdfAnalyzer;
pub use classifier::{ColorSpace, FilterKind};
pub use decoder::{DecodeError, DecodeStrategy};
pub use extracted::{ExtractedImage, ImageFormat};
pub use extraction_engine::{ExtractionReport, SkipReason, SkippedImage};
pub use ranking::{
    filter_by_size, select_largest, DEFAULT_LARGEST_COUNT, DEFAULT_MIN_HEIGHT, DEFAULT_MIN_WIDTH,
};

// ── Configuration ────────────────────────────────────────────────────────────

/// Runtime configuration for [`PdfAnalyzer`].
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Images whose declared `/Width` is below this value are discarded
    /// before decoding.
    pub min_declared_width: u32,

    /// Images whose declared `/Height` is below this value are discarded
    /// before decoding.
    pub min_declared_height: u32,

    /// Canonical encoding of every returned [`ExtractedImage`].
    pub output_format: ImageFormat,

    /// Quality (1–100) used when `output_format` is [`ImageFormat::Jpeg`].
    pub jpeg_quality: u8,

    /// When `true`, images referenced from inside Form XObjects are collected
    /// as well, attributed to the page that uses the form.
    pub descend_into_forms: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_declared_width: 100,
            min_declared_height: 100,
            output_format: ImageFormat::Png,
            jpeg_quality: 90,
            descend_into_forms: false,
        }
    }
}

// ── Error type ───────────────────────────────────────────────────────────────

/// Every error that this crate can surface to the caller.
///
/// Per-page and per-image problems are never reported here; they are logged
/// and, when relevant, listed in [`ExtractionReport::skipped`].
#[derive(Error, Debug)]
pub enum ExtractError {
    /// A filesystem I/O error occurred while reading the input document.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The underlying lopdf parser could not load the document container.
    #[error("failed to load PDF document: {0}")]
    DocumentLoad(#[from] lopdf::Error),

    /// The document parsed but lacks the structure needed to walk its pages.
    #[error("Invalid PDF: {0}")]
    InvalidPdf(String),
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Extract every image from an in-memory PDF using the default configuration.
///
/// Shorthand for `PdfAnalyzer::from_bytes(data)?.extract_images()`.
pub fn extract_images_from_pdf(data: &[u8]) -> Result<Vec<ExtractedImage>> {
    PdfAnalyzer::from_bytes(data)?.extract_images()
}
