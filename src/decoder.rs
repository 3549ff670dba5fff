//! Image stream decoding.
//!
//! Each [`FilterKind`] maps to an ordered list of [`DecodeStrategy`] values.
//! Strategies are tried in order; the first success wins and the error of the
//! last failing strategy is reported when none succeeds.

use crate::classifier::{ColorSpace, FilterKind, ImageXObject, PredictorParams};
use flate2::read::ZlibDecoder;
use image::{DynamicImage, GrayImage, RgbImage};
use std::io::Read;
use thiserror::Error;
use tracing::debug;

/// Why an image stream could not be turned into a raster.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("zlib inflate failed: {0}")]
    Inflate(String),

    #[error("JPEG decode failed: {0}")]
    Jpeg(String),

    #[error("payload is not a self-describing PNG or JPEG image")]
    NotSelfDescribing,

    #[error("embedded image decode failed: {0}")]
    Embedded(String),

    #[error("raw raster of {width}x{height}x{channels} needs {expected} bytes, got {actual}")]
    SizeMismatch {
        width: u32,
        height: u32,
        channels: u8,
        expected: usize,
        actual: usize,
    },

    #[error("unsupported bits per component for raw raster: {0}")]
    UnsupportedBitDepth(u32),

    #[error("cannot undo predictor: {0}")]
    Predictor(String),

    #[error("failed to encode image: {0}")]
    Encode(String),

    #[error("decoded image has zero width or height")]
    EmptyImage,
}

/// A single way of interpreting an image payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStrategy {
    /// The payload is a complete JPEG file.
    Jpeg,
    /// The payload is headerless interleaved 8-bit samples.
    RawRaster { channels: u8 },
    /// The payload is a PNG or JPEG file recognised by its signature.
    Embedded,
}

impl DecodeStrategy {
    /// The ordered strategy list for an image with the given filter and
    /// colour space.
    pub fn cascade(filter: FilterKind, color_space: ColorSpace) -> Vec<DecodeStrategy> {
        match filter {
            FilterKind::Dct => vec![DecodeStrategy::Jpeg],
            FilterKind::Flate => vec![
                DecodeStrategy::RawRaster {
                    channels: color_space.channels(),
                },
                DecodeStrategy::Embedded,
            ],
            FilterKind::Other => vec![
                DecodeStrategy::Embedded,
                DecodeStrategy::RawRaster { channels: 3 },
            ],
        }
    }

    fn attempt(self, payload: &[u8], image: &ImageXObject) -> Result<DynamicImage, DecodeError> {
        match self {
            DecodeStrategy::Jpeg => {
                image::load_from_memory_with_format(payload, image::ImageFormat::Jpeg)
                    .map_err(|e| DecodeError::Jpeg(e.to_string()))
            }
            DecodeStrategy::Embedded => decode_embedded(payload),
            DecodeStrategy::RawRaster { channels } => decode_raw(payload, image, channels),
        }
    }
}

/// A decoded raster together with the strategy that produced it.
#[derive(Debug)]
pub struct Decoded {
    pub raster: DynamicImage,
    pub strategy: DecodeStrategy,
}

/// Decode one classified image by running its strategy cascade.
pub fn decode(image: &ImageXObject) -> Result<Decoded, DecodeError> {
    let payload = match image.filter {
        FilterKind::Flate => inflate(&image.data)?,
        FilterKind::Dct | FilterKind::Other => image.data.clone(),
    };

    let mut last_error = DecodeError::NotSelfDescribing;
    for strategy in DecodeStrategy::cascade(image.filter, image.color_space) {
        match strategy.attempt(&payload, image) {
            Ok(raster) if raster.width() == 0 || raster.height() == 0 => {
                last_error = DecodeError::EmptyImage;
            }
            Ok(raster) => return Ok(Decoded { raster, strategy }),
            Err(e) => {
                debug!(?strategy, error = %e, "decode strategy failed");
                last_error = e;
            }
        }
    }
    Err(last_error)
}

/// Inflate zlib-compressed stream data.
pub fn inflate(data: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut decoder = ZlibDecoder::new(data);
    let mut inflated = Vec::new();
    decoder
        .read_to_end(&mut inflated)
        .map_err(|e| DecodeError::Inflate(e.to_string()))?;
    Ok(inflated)
}

fn decode_embedded(payload: &[u8]) -> Result<DynamicImage, DecodeError> {
    let format = match image::guess_format(payload) {
        Ok(f @ (image::ImageFormat::Png | image::ImageFormat::Jpeg)) => f,
        _ => return Err(DecodeError::NotSelfDescribing),
    };
    image::load_from_memory_with_format(payload, format)
        .map_err(|e| DecodeError::Embedded(e.to_string()))
}

fn decode_raw(
    payload: &[u8],
    image: &ImageXObject,
    channels: u8,
) -> Result<DynamicImage, DecodeError> {
    if image.bits_per_component != 8 {
        return Err(DecodeError::UnsupportedBitDepth(image.bits_per_component));
    }

    // `/DecodeParms` belongs to the Flate stage.
    let samples = match (image.filter, image.predictor) {
        (FilterKind::Flate, Some(params)) => {
            undo_predictor(payload, params, image.width, channels)?
        }
        _ => payload.to_vec(),
    };

    let expected = (image.width as usize)
        .checked_mul(image.height as usize)
        .and_then(|n| n.checked_mul(usize::from(channels)))
        .unwrap_or(usize::MAX);
    if expected == 0 || samples.len() != expected {
        return Err(DecodeError::SizeMismatch {
            width: image.width,
            height: image.height,
            channels,
            expected,
            actual: samples.len(),
        });
    }

    let (w, h) = (image.width, image.height);
    let raster = match channels {
        1 => GrayImage::from_raw(w, h, samples).map(DynamicImage::ImageLuma8),
        4 => RgbImage::from_raw(w, h, cmyk_to_rgb(&samples)).map(DynamicImage::ImageRgb8),
        _ => RgbImage::from_raw(w, h, samples).map(DynamicImage::ImageRgb8),
    };
    raster.ok_or(DecodeError::SizeMismatch {
        width: w,
        height: h,
        channels,
        expected,
        actual: expected,
    })
}

/// Naive CMYK → RGB; colour accuracy is not a goal here.
fn cmyk_to_rgb(samples: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(samples.len() / 4 * 3);
    for px in samples.chunks_exact(4) {
        let k = 255 - u16::from(px[3]);
        for &ink in &px[..3] {
            rgb.push(((255 - u16::from(ink)) * k / 255) as u8);
        }
    }
    rgb
}

/// Reverse PNG row prediction (`/Predictor` 10–15).
fn undo_predictor(
    data: &[u8],
    params: PredictorParams,
    width: u32,
    channels: u8,
) -> Result<Vec<u8>, DecodeError> {
    if params.predictor < 10 {
        return Err(DecodeError::Predictor(format!(
            "predictor {} is not supported",
            params.predictor
        )));
    }

    let colors = params.colors.unwrap_or(u32::from(channels));
    let columns = params.columns.unwrap_or(width);
    if colors != u32::from(channels) {
        return Err(DecodeError::Predictor(format!(
            "/Colors {colors} does not match {channels} channels"
        )));
    }
    if columns != width {
        return Err(DecodeError::Predictor(format!(
            "/Columns {columns} does not match width {width}"
        )));
    }

    let bpp = usize::from(channels).max(1);
    let row_bytes = usize::try_from(columns)
        .ok()
        .and_then(|c| c.checked_mul(bpp))
        .ok_or_else(|| DecodeError::Predictor("row size overflows".into()))?;
    if row_bytes == 0 {
        return Err(DecodeError::Predictor("empty rows".into()));
    }
    if data.len() < row_bytes + 1 {
        return Err(DecodeError::Predictor(format!(
            "{} bytes cannot hold a {row_bytes}-byte row",
            data.len()
        )));
    }

    let mut out = Vec::with_capacity(data.len());
    let mut prev = vec![0u8; row_bytes];
    let mut row = vec![0u8; row_bytes];

    for chunk in data.chunks_exact(row_bytes + 1) {
        let (tag, encoded) = (chunk[0], &chunk[1..]);
        for i in 0..row_bytes {
            let left = if i >= bpp { row[i - bpp] } else { 0 };
            let up = prev[i];
            let up_left = if i >= bpp { prev[i - bpp] } else { 0 };
            let base = match tag {
                0 => 0,
                1 => left,
                2 => up,
                3 => ((u16::from(left) + u16::from(up)) / 2) as u8,
                4 => paeth(left, up, up_left),
                other => {
                    return Err(DecodeError::Predictor(format!("unknown row filter {other}")));
                }
            };
            row[i] = encoded[i].wrapping_add(base);
        }
        out.extend_from_slice(&row);
        std::mem::swap(&mut prev, &mut row);
    }

    Ok(out)
}

fn paeth(left: u8, up: u8, up_left: u8) -> u8 {
    let (a, b, c) = (i16::from(left), i16::from(up), i16::from(up_left));
    let p = a + b - c;
    let (pa, pb, pc) = ((p - a).abs(), (p - b).abs(), (p - c).abs());
    if pa <= pb && pa <= pc {
        left
    } else if pb <= pc {
        up
    } else {
        up_left
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::{Cursor, Write};

    fn zlib(data: &[u8]) -> Vec<u8> {
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    fn encoded(img: DynamicImage, format: image::ImageFormat) -> Vec<u8> {
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
        buf
    }

    fn candidate(filter: FilterKind, color_space: ColorSpace, w: u32, h: u32, data: Vec<u8>) -> ImageXObject {
        ImageXObject {
            width: w,
            height: h,
            color_space,
            filter,
            bits_per_component: 8,
            predictor: None,
            data,
        }
    }

    #[test]
    fn cascade_order_per_filter() {
        assert_eq!(
            DecodeStrategy::cascade(FilterKind::Dct, ColorSpace::Rgb),
            vec![DecodeStrategy::Jpeg]
        );
        assert_eq!(
            DecodeStrategy::cascade(FilterKind::Flate, ColorSpace::Cmyk),
            vec![DecodeStrategy::RawRaster { channels: 4 }, DecodeStrategy::Embedded]
        );
        assert_eq!(
            DecodeStrategy::cascade(FilterKind::Other, ColorSpace::Gray),
            vec![DecodeStrategy::Embedded, DecodeStrategy::RawRaster { channels: 3 }]
        );
    }

    #[test]
    fn unknown_color_space_reads_three_channels() {
        assert_eq!(ColorSpace::Unknown.channels(), 3);
        assert_eq!(
            DecodeStrategy::cascade(FilterKind::Flate, ColorSpace::Unknown)[0],
            DecodeStrategy::RawRaster { channels: 3 }
        );
    }

    #[test]
    fn flate_gray_raster_decodes_raw() {
        let pixels = vec![128u8; 4 * 3];
        let image = candidate(FilterKind::Flate, ColorSpace::Gray, 4, 3, zlib(&pixels));
        let decoded = decode(&image).unwrap();
        assert_eq!(decoded.strategy, DecodeStrategy::RawRaster { channels: 1 });
        assert_eq!((decoded.raster.width(), decoded.raster.height()), (4, 3));
    }

    #[test]
    fn flate_falls_back_to_embedded_png() {
        let png = encoded(
            DynamicImage::ImageRgb8(RgbImage::new(7, 5)),
            image::ImageFormat::Png,
        );
        // Declared size does not match the inflated byte count.
        let image = candidate(FilterKind::Flate, ColorSpace::Rgb, 300, 300, zlib(&png));
        let decoded = decode(&image).unwrap();
        assert_eq!(decoded.strategy, DecodeStrategy::Embedded);
        assert_eq!((decoded.raster.width(), decoded.raster.height()), (7, 5));
    }

    #[test]
    fn corrupt_flate_is_terminal() {
        let image = candidate(
            FilterKind::Flate,
            ColorSpace::Rgb,
            200,
            200,
            b"this is definitely not a zlib stream".to_vec(),
        );
        assert!(matches!(decode(&image), Err(DecodeError::Inflate(_))));
    }

    #[test]
    fn flate_size_mismatch_without_embedded_image_fails() {
        let image = candidate(FilterKind::Flate, ColorSpace::Rgb, 10, 10, zlib(&[0u8; 299]));
        assert_eq!(decode(&image).unwrap_err(), DecodeError::NotSelfDescribing);
    }

    #[test]
    fn unfiltered_stream_falls_back_to_raw_rgb() {
        let image = candidate(FilterKind::Other, ColorSpace::Gray, 2, 2, vec![10u8; 12]);
        let decoded = decode(&image).unwrap();
        assert_eq!(decoded.strategy, DecodeStrategy::RawRaster { channels: 3 });
        assert!(matches!(decoded.raster, DynamicImage::ImageRgb8(_)));
    }

    #[test]
    fn unfiltered_stream_prefers_embedded_jpeg() {
        let jpeg = encoded(
            DynamicImage::ImageRgb8(RgbImage::new(16, 8)),
            image::ImageFormat::Jpeg,
        );
        let image = candidate(FilterKind::Other, ColorSpace::Unknown, 16, 8, jpeg);
        assert_eq!(decode(&image).unwrap().strategy, DecodeStrategy::Embedded);
    }

    #[test]
    fn dct_with_garbage_reports_jpeg_error() {
        let image = candidate(FilterKind::Dct, ColorSpace::Rgb, 100, 100, vec![1, 2, 3, 4]);
        assert!(matches!(decode(&image), Err(DecodeError::Jpeg(_))));
    }

    #[test]
    fn sixteen_bit_raw_is_rejected() {
        let mut image = candidate(FilterKind::Flate, ColorSpace::Gray, 2, 2, zlib(&[0u8; 8]));
        image.bits_per_component = 16;
        assert_eq!(
            decode_raw(&[0u8; 8], &image, 1).unwrap_err(),
            DecodeError::UnsupportedBitDepth(16)
        );
    }

    #[test]
    fn cmyk_converts_to_rgb() {
        assert_eq!(cmyk_to_rgb(&[0, 0, 0, 0]), vec![255, 255, 255]);
        assert_eq!(cmyk_to_rgb(&[0, 0, 0, 255]), vec![0, 0, 0]);
        assert_eq!(cmyk_to_rgb(&[255, 0, 0, 0]), vec![0, 255, 255]);
    }

    #[test]
    fn png_predictor_rows_are_reconstructed() {
        // 3 gray pixels per row: row 0 uses Sub, row 1 uses Up.
        let data = [1, 10, 5, 5, 2, 1, 1, 1];
        let params = PredictorParams {
            predictor: 15,
            colors: Some(1),
            columns: Some(3),
        };
        let out = undo_predictor(&data, params, 3, 1).unwrap();
        assert_eq!(out, vec![10, 15, 20, 11, 16, 21]);
    }

    #[test]
    fn paeth_picks_nearest_neighbour() {
        assert_eq!(paeth(10, 20, 10), 20);
        assert_eq!(paeth(20, 10, 10), 20);
        assert_eq!(paeth(0, 0, 0), 0);
    }

    #[test]
    fn predictor_params_must_match_the_image() {
        let huge = PredictorParams {
            predictor: 15,
            colors: Some(u32::MAX),
            columns: Some(u32::MAX),
        };
        assert!(matches!(
            undo_predictor(&[0; 16], huge, 3, 1),
            Err(DecodeError::Predictor(_))
        ));

        let wide = PredictorParams {
            predictor: 15,
            colors: Some(1),
            columns: Some(4),
        };
        assert!(matches!(
            undo_predictor(&[0; 16], wide, 3, 1),
            Err(DecodeError::Predictor(_))
        ));

        let short = PredictorParams {
            predictor: 15,
            colors: None,
            columns: None,
        };
        assert!(matches!(
            undo_predictor(&[0; 3], short, 3, 1),
            Err(DecodeError::Predictor(_))
        ));
    }

    #[test]
    fn predictor_is_ignored_without_flate() {
        let mut image = candidate(FilterKind::Other, ColorSpace::Rgb, 2, 2, vec![10u8; 12]);
        image.predictor = Some(PredictorParams {
            predictor: 15,
            colors: Some(3),
            columns: Some(2),
        });
        let decoded = decode(&image).unwrap();
        assert_eq!(decoded.strategy, DecodeStrategy::RawRaster { channels: 3 });
        assert_eq!(decoded.raster.to_rgb8().into_raw(), vec![10u8; 12]);
    }

    #[test]
    fn tiff_predictor_is_unsupported() {
        let params = PredictorParams {
            predictor: 2,
            colors: None,
            columns: None,
        };
        assert!(matches!(
            undo_predictor(&[0; 4], params, 2, 1),
            Err(DecodeError::Predictor(_))
        ));
    }
}
