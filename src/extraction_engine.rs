use crate::classifier::{Classification, ImageClassifier};
use crate::decoder::{self, DecodeError};
use crate::normalizer::Normalizer;
use crate::page_walker::{XObjectEntry, XObjectWalker};
use crate::{ExtractedImage, ExtractorConfig};
use lopdf::Document;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why an image XObject did not make it into the output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Declared dimensions were below the early-reject threshold.
    #[error("declared size {width}x{height} is below the threshold")]
    TooSmall { width: u32, height: u32 },

    /// The image stream had no bytes.
    #[error("image stream is empty")]
    EmptyStream,

    /// Every decode strategy failed, or re-encoding failed.
    #[error(transparent)]
    Decode(DecodeError),
}

/// An image XObject that was found but not extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedImage {
    pub page_number: u32,
    /// Resource name of the XObject, e.g. `Im3`.
    pub key: String,
    pub reason: SkipReason,
}

/// Full outcome of an extraction run.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Extracted images in document order.
    pub images: Vec<ExtractedImage>,
    /// Image XObjects that were rejected or failed to decode.
    pub skipped: Vec<SkippedImage>,
    /// Number of pages visited.
    pub pages_scanned: usize,
}

/// Central extraction engine that runs walker → classifier → decoder →
/// normalizer over a loaded document.
pub struct ExtractionEngine<'a> {
    document: &'a Document,
    config: &'a ExtractorConfig,
}

impl<'a> ExtractionEngine<'a> {
    pub fn new(document: &'a Document, config: &'a ExtractorConfig) -> Self {
        Self { document, config }
    }

    /// Extract every image, recording skipped ones.
    ///
    /// Per-image failures never abort the run.
    pub fn extract_all(&self) -> ExtractionReport {
        let pages_scanned = self.document.get_pages().len();
        info!(pages = pages_scanned, "extracting images from PDF");

        let classifier = ImageClassifier::new(self.document, self.config);
        let normalizer = Normalizer::new(self.config);
        let mut report = ExtractionReport {
            pages_scanned,
            ..Default::default()
        };

        let mut current_page = 0;
        let mut index_on_page = 0;

        for entry in self.walker().entries() {
            if entry.page_number != current_page {
                current_page = entry.page_number;
                index_on_page = 0;
            }

            match self.process_entry(&classifier, &normalizer, &entry, index_on_page) {
                Ok(Some(image)) => {
                    debug!(
                        page = entry.page_number,
                        key = %entry.key,
                        index = index_on_page,
                        width = image.width(),
                        height = image.height(),
                        "extracted image"
                    );
                    report.images.push(image);
                    index_on_page += 1;
                }
                Ok(None) => {}
                Err(reason) => {
                    Self::log_skip(&entry, &reason);
                    report.skipped.push(SkippedImage {
                        page_number: entry.page_number,
                        key: entry.key,
                        reason,
                    });
                }
            }
        }

        info!(
            extracted = report.images.len(),
            skipped = report.skipped.len(),
            "finished image extraction"
        );
        report
    }

    /// Count image XObjects that pass classification, without decoding.
    pub fn count_candidates(&self) -> usize {
        let classifier = ImageClassifier::new(self.document, self.config);
        self.walker()
            .entries()
            .iter()
            .filter(|entry| matches!(classifier.classify(entry), Classification::Image(_)))
            .count()
    }

    fn walker(&self) -> XObjectWalker<'a> {
        XObjectWalker::new(self.document, self.config.descend_into_forms)
    }

    /// Classify, decode and normalize one XObject.
    ///
    /// `Ok(None)` means the XObject is not an image at all.
    fn process_entry(
        &self,
        classifier: &ImageClassifier,
        normalizer: &Normalizer,
        entry: &XObjectEntry,
        index: u32,
    ) -> Result<Option<ExtractedImage>, SkipReason> {
        let candidate = match classifier.classify(entry) {
            Classification::NotAnImage => {
                debug!(page = entry.page_number, key = %entry.key, "XObject is not an image");
                return Ok(None);
            }
            Classification::TooSmall { width, height } => {
                return Err(SkipReason::TooSmall { width, height });
            }
            Classification::EmptyStream => return Err(SkipReason::EmptyStream),
            Classification::Image(candidate) => candidate,
        };

        debug!(
            page = entry.page_number,
            key = %entry.key,
            width = candidate.width,
            height = candidate.height,
            filter = ?candidate.filter,
            color_space = ?candidate.color_space,
            bytes = candidate.data.len(),
            "decoding image"
        );

        let decoded = decoder::decode(&candidate).map_err(SkipReason::Decode)?;
        normalizer
            .normalize(decoded.raster, entry.page_number, index)
            .map(Some)
            .map_err(SkipReason::Decode)
    }

    fn log_skip(entry: &XObjectEntry, reason: &SkipReason) {
        match reason {
            SkipReason::Decode(e) => warn!(
                page = entry.page_number,
                key = %entry.key,
                error = %e,
                "skipping image that could not be decoded"
            ),
            other => debug!(
                page = entry.page_number,
                key = %entry.key,
                reason = %other,
                "skipping image"
            ),
        }
    }
}
