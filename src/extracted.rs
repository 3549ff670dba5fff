use std::path::Path;

// ── ImageFormat ──────────────────────────────────────────────────────────────

/// Canonical encoding of an [`ExtractedImage`] buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Conventional file extension, without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }

    /// MIME type of the encoded buffer.
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }

    pub(crate) fn to_image_format(self) -> image::ImageFormat {
        match self {
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

// ── ExtractedImage ───────────────────────────────────────────────────────────

/// An image that was embedded inside a PDF document, re-encoded into the
/// canonical [`ImageFormat`].
///
/// Returned by [`crate::PdfAnalyzer::extract_images`]. The value is immutable:
/// fields are only readable through accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedImage {
    buffer: Vec<u8>,
    format: ImageFormat,
    width: u32,
    height: u32,
    page_number: u32,
    index: u32,
}

impl ExtractedImage {
    pub(crate) fn new(
        buffer: Vec<u8>,
        format: ImageFormat,
        width: u32,
        height: u32,
        page_number: u32,
        index: u32,
    ) -> Self {
        Self {
            buffer,
            format,
            width,
            height,
            page_number,
            index,
        }
    }

    /// The encoded image bytes.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Consume the image and return its encoded bytes.
    pub fn into_buffer(self) -> Vec<u8> {
        self.buffer
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Width in pixels, measured from the encoded buffer. May differ from the
    /// `/Width` declared in the PDF.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels, measured from the encoded buffer.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// 1-based number of the page the image was found on.
    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    /// 0-based position among the images collected from the same page.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Pixel area, used for ranking.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// A stable file name derived from provenance, e.g. `page-3-image-0.png`.
    pub fn file_name(&self) -> String {
        format!(
            "page-{}-image-{}.{}",
            self.page_number,
            self.index,
            self.format.extension()
        )
    }

    /// Write this image into `output_dir` under [`file_name`], creating the
    /// directory if necessary. Returns the written path.
    ///
    /// [`file_name`]: ExtractedImage::file_name
    ///
    /// # Example
    ///
    /// ```no_run
    /// use extractimagespdf::PdfAnalyzer;
    ///
    /// let analyzer = PdfAnalyzer::from_path("catalog.pdf").unwrap();
    /// for image in analyzer.extract_images().unwrap() {
    ///     image.save_to_disk("./extracted").unwrap();
    /// }
    /// ```
    pub fn save_to_disk<P: AsRef<Path>>(&self, output_dir: P) -> std::io::Result<std::path::PathBuf> {
        let dir = output_dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let dest = dir.join(self.file_name());
        std::fs::write(&dest, &self.buffer)?;
        Ok(dest)
    }
}
