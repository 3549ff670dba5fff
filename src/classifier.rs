use crate::page_walker::XObjectEntry;
use crate::{pdf_utils, ExtractorConfig};
use lopdf::{Dictionary, Document, Object};

// ── ColorSpace ───────────────────────────────────────────────────────────────

/// Pixel colour model declared by an image XObject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    Gray,
    Rgb,
    Cmyk,
    /// Anything else (Indexed, Lab, Separation, …). Raw rasters in an unknown
    /// colour space are read as three channels.
    Unknown,
}

impl ColorSpace {
    /// Number of interleaved components per pixel in a raw raster.
    pub fn channels(self) -> u8 {
        match self {
            ColorSpace::Gray => 1,
            ColorSpace::Rgb => 3,
            ColorSpace::Cmyk => 4,
            ColorSpace::Unknown => 3,
        }
    }

    /// Map a colour-space family name (without the leading slash).
    pub fn from_name(name: &str) -> Self {
        match name {
            "DeviceGray" | "Gray" | "G" | "CalGray" => ColorSpace::Gray,
            "DeviceRGB" | "RGB" | "CalRGB" => ColorSpace::Rgb,
            "DeviceCMYK" | "CMYK" => ColorSpace::Cmyk,
            _ => ColorSpace::Unknown,
        }
    }

    fn from_component_count(n: u32) -> Self {
        match n {
            1 => ColorSpace::Gray,
            3 => ColorSpace::Rgb,
            4 => ColorSpace::Cmyk,
            _ => ColorSpace::Unknown,
        }
    }

    /// Read `/ColorSpace` from an image dictionary.
    ///
    /// Accepts a bare name or an array whose first element names the family.
    /// `[/ICCBased stream]` is mapped through the ICC stream's `/N` entry.
    fn from_image_dict(document: &Document, dict: &Dictionary) -> Self {
        let Some(value) = pdf_utils::get_resolved(document, dict, b"ColorSpace") else {
            return ColorSpace::Unknown;
        };

        if let Ok(name) = value.as_name() {
            return Self::from_name(&String::from_utf8_lossy(name));
        }

        let Ok(array) = value.as_array() else {
            return ColorSpace::Unknown;
        };
        let family = array
            .first()
            .and_then(|v| pdf_utils::resolve(document, v))
            .and_then(|v| v.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).into_owned());

        match family.as_deref() {
            Some("ICCBased") => array
                .get(1)
                .and_then(|v| pdf_utils::resolve(document, v))
                .and_then(|v| v.as_stream().ok())
                .and_then(|s| pdf_utils::u32_from_dict(document, &s.dict, b"N"))
                .map(Self::from_component_count)
                .unwrap_or(ColorSpace::Unknown),
            Some(name) => Self::from_name(name),
            None => ColorSpace::Unknown,
        }
    }
}

// ── FilterKind ───────────────────────────────────────────────────────────────

/// Compression applied to an image stream, as far as decoding is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// `/DCTDecode`: the stream is a complete JPEG file.
    Dct,
    /// `/FlateDecode`: zlib-compressed data.
    Flate,
    /// No filter, an unsupported filter, or a multi-stage filter chain.
    Other,
}

impl FilterKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "DCTDecode" | "DCT" => FilterKind::Dct,
            "FlateDecode" | "Fl" => FilterKind::Flate,
            _ => FilterKind::Other,
        }
    }

    fn from_object(document: &Document, value: Option<&Object>) -> Self {
        let Some(value) = value else {
            return FilterKind::Other;
        };
        if let Ok(name) = value.as_name() {
            return Self::from_name(&String::from_utf8_lossy(name));
        }
        match value.as_array() {
            Ok(filters) if filters.len() == 1 => {
                let inner = pdf_utils::resolve(document, &filters[0]);
                Self::from_object(document, inner)
            }
            _ => FilterKind::Other,
        }
    }
}

// ── Classified image ─────────────────────────────────────────────────────────

/// PNG-style predictor parameters from a Flate stream's `/DecodeParms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictorParams {
    pub predictor: u32,
    pub colors: Option<u32>,
    pub columns: Option<u32>,
}

/// Everything the decoder needs to know about one image XObject.
#[derive(Debug, Clone)]
pub struct ImageXObject {
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    pub filter: FilterKind,
    pub bits_per_component: u32,
    pub predictor: Option<PredictorParams>,
    /// Stream bytes exactly as stored in the file (still encoded).
    pub data: Vec<u8>,
}

/// Outcome of classifying one XObject.
#[derive(Debug)]
pub enum Classification {
    /// Not an image stream (forms, PostScript XObjects, dangling references).
    NotAnImage,
    /// Too small to be worth decoding.
    TooSmall { width: u32, height: u32 },
    /// An image with no stream data.
    EmptyStream,
    /// A decode candidate.
    Image(ImageXObject),
}

/// Filters XObjects down to decodable image candidates.
pub struct ImageClassifier<'a> {
    document: &'a Document,
    min_width: u32,
    min_height: u32,
}

impl<'a> ImageClassifier<'a> {
    pub fn new(document: &'a Document, config: &ExtractorConfig) -> Self {
        Self {
            document,
            min_width: config.min_declared_width,
            min_height: config.min_declared_height,
        }
    }

    pub fn classify(&self, entry: &XObjectEntry) -> Classification {
        let Some(stream) = self
            .document
            .get_object(entry.id)
            .ok()
            .and_then(|o| o.as_stream().ok())
        else {
            return Classification::NotAnImage;
        };
        let dict = &stream.dict;

        match pdf_utils::name_from_dict(self.document, dict, b"Subtype") {
            Some(subtype) if subtype == "Image" => {}
            _ => return Classification::NotAnImage,
        }

        let width = pdf_utils::u32_from_dict(self.document, dict, b"Width").unwrap_or(0);
        let height = pdf_utils::u32_from_dict(self.document, dict, b"Height").unwrap_or(0);

        if width < self.min_width || height < self.min_height {
            return Classification::TooSmall { width, height };
        }

        if stream.content.is_empty() {
            return Classification::EmptyStream;
        }

        let filter = FilterKind::from_object(
            self.document,
            pdf_utils::get_resolved(self.document, dict, b"Filter"),
        );

        Classification::Image(ImageXObject {
            width,
            height,
            color_space: ColorSpace::from_image_dict(self.document, dict),
            filter,
            bits_per_component: pdf_utils::u32_from_dict(self.document, dict, b"BitsPerComponent")
                .unwrap_or(8),
            predictor: self.predictor_params(dict),
            data: stream.content.clone(),
        })
    }

    /// Read `/DecodeParms` (a dictionary, or a one-element array of one).
    fn predictor_params(&self, dict: &Dictionary) -> Option<PredictorParams> {
        let value = pdf_utils::get_resolved(self.document, dict, b"DecodeParms")?;
        let params = match value.as_array() {
            Ok(array) => pdf_utils::resolve_dict(self.document, array.first()?)?,
            Err(_) => value.as_dict().ok()?,
        };

        let predictor = pdf_utils::u32_from_dict(self.document, params, b"Predictor")?;
        if predictor <= 1 {
            return None;
        }

        Some(PredictorParams {
            predictor,
            colors: pdf_utils::u32_from_dict(self.document, params, b"Colors"),
            columns: pdf_utils::u32_from_dict(self.document, params, b"Columns"),
        })
    }
}
