use crate::{ExtractError, Result};
use lopdf::Document;

// ── PdfValidator ──────────────────────────────────────────────────────────────
//
// This is an internal type.  Callers use PdfAnalyzer, which delegates here.

pub(crate) struct PdfValidator<'a> {
    document: &'a Document,
}

impl<'a> PdfValidator<'a> {
    pub(crate) fn new(document: &'a Document) -> Self {
        Self { document }
    }

    /// Returns `Ok(true)` when the parsed document can be walked page by page.
    ///
    /// lopdf has already parsed the cross-reference table and object graph;
    /// here we only assert the catalog and trailer are usable. A document with
    /// zero pages is still valid: it simply yields no images.
    pub(crate) fn validate_pdf_structure(&self) -> Result<bool> {
        if self.document.trailer.is_empty() {
            return Err(ExtractError::InvalidPdf("missing trailer dictionary".into()));
        }

        self.document
            .catalog()
            .map_err(|e| ExtractError::InvalidPdf(format!("missing or invalid catalog: {e}")))?;

        Ok(true)
    }

    /// Returns `true` when the trailer carries an `/Encrypt` dictionary.
    pub(crate) fn is_encrypted(&self) -> bool {
        self.document.trailer.get(b"Encrypt").is_ok()
    }
}
