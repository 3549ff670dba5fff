use crate::extraction_engine::{ExtractionEngine, ExtractionReport};
use crate::validator::PdfValidator;
use crate::{ExtractedImage, ExtractorConfig, Result};
use lopdf::Document;
use std::path::Path;
use tracing::warn;

// ── PdfAnalyzer ───────────────────────────────────────────────────────────────

/// Entry point for image extraction.
///
/// Loading fails only when the PDF container itself is unreadable; once an
/// analyzer exists, extraction always succeeds and returns whatever images
/// could be decoded.
///
/// # Creating an analyzer
///
/// ```no_run
/// use extractimagespdf::{ExtractorConfig, ImageFormat, PdfAnalyzer};
///
/// // From a file path
/// let a = PdfAnalyzer::from_path("catalog.pdf").unwrap();
///
/// // From an in-memory buffer
/// let bytes = std::fs::read("catalog.pdf").unwrap();
/// let a = PdfAnalyzer::from_bytes(&bytes).unwrap();
///
/// // With custom configuration
/// let cfg = ExtractorConfig {
///     output_format: ImageFormat::Jpeg,
///     min_declared_width: 300,
///     min_declared_height: 300,
///     ..Default::default()
/// };
/// let a = PdfAnalyzer::from_bytes_with_config(&bytes, cfg).unwrap();
/// ```
pub struct PdfAnalyzer {
    document: Document,
    config: ExtractorConfig,
}

impl PdfAnalyzer {
    // ── Constructors ──────────────────────────────────────────────────────────

    /// Load a PDF from the file system.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_config(path, ExtractorConfig::default())
    }

    /// Load a PDF from an in-memory byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_config(data, ExtractorConfig::default())
    }

    /// Load a PDF from the file system with a custom [`ExtractorConfig`].
    pub fn with_config<P: AsRef<Path>>(path: P, config: ExtractorConfig) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes_with_config(&data, config)
    }

    /// Load a PDF from an in-memory byte slice with a custom [`ExtractorConfig`].
    pub fn from_bytes_with_config(data: &[u8], config: ExtractorConfig) -> Result<Self> {
        Self::from_document(Document::load_mem(data)?, config)
    }

    /// Wrap an already loaded [`lopdf::Document`].
    pub fn from_document(document: Document, config: ExtractorConfig) -> Result<Self> {
        let validator = PdfValidator::new(&document);
        validator.validate_pdf_structure()?;
        if validator.is_encrypted() {
            warn!("document is encrypted; image streams may not decode");
        }
        Ok(Self { document, config })
    }

    // ── Inspection ────────────────────────────────────────────────────────────

    /// Returns `Ok(true)` when the loaded document has a usable catalog and
    /// trailer.
    pub fn is_pdf(&self) -> Result<bool> {
        PdfValidator::new(&self.document).validate_pdf_structure()
    }

    /// Returns `true` when the document declares encryption.
    ///
    /// Extraction still runs on encrypted documents, best effort.
    pub fn is_encrypted(&self) -> bool {
        PdfValidator::new(&self.document).is_encrypted()
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Number of image XObjects that would be decoded, i.e. images passing
    /// the declared-size threshold with non-empty streams. Nothing is decoded.
    pub fn count_image_xobjects(&self) -> usize {
        ExtractionEngine::new(&self.document, &self.config).count_candidates()
    }

    // ── Extraction ────────────────────────────────────────────────────────────

    /// Extract every decodable image in document order.
    ///
    /// Images that fail to decode are logged and skipped; an empty vector is a
    /// valid result (e.g. a text-only PDF).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use extractimagespdf::PdfAnalyzer;
    ///
    /// let analyzer = PdfAnalyzer::from_path("catalog.pdf").unwrap();
    /// for image in analyzer.extract_images().unwrap() {
    ///     println!("{}: {}x{}", image.file_name(), image.width(), image.height());
    /// }
    /// ```
    pub fn extract_images(&self) -> Result<Vec<ExtractedImage>> {
        Ok(self.extract_images_with_report()?.images)
    }

    /// Like [`extract_images`], but also reports which image XObjects were
    /// skipped and why.
    ///
    /// [`extract_images`]: PdfAnalyzer::extract_images
    pub fn extract_images_with_report(&self) -> Result<ExtractionReport> {
        Ok(ExtractionEngine::new(&self.document, &self.config).extract_all())
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    /// Returns a reference to the underlying [`lopdf::Document`].
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Returns a reference to the active [`ExtractorConfig`].
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }
}
