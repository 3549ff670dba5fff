use crate::decoder::DecodeError;
use crate::{ExtractedImage, ExtractorConfig, ImageFormat};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageReader};
use std::io::Cursor;

/// Re-encodes decoded rasters into the canonical output format.
pub struct Normalizer {
    format: ImageFormat,
    jpeg_quality: u8,
}

impl Normalizer {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            format: config.output_format,
            jpeg_quality: config.jpeg_quality.clamp(1, 100),
        }
    }

    /// Encode `raster` and attach provenance.
    ///
    /// Width and height are read back from the encoded bytes, so they describe
    /// what the caller actually receives.
    pub fn normalize(
        &self,
        raster: DynamicImage,
        page_number: u32,
        index: u32,
    ) -> Result<ExtractedImage, DecodeError> {
        let buffer = self.encode(raster)?;
        let (width, height) = measure(&buffer)?;
        if width == 0 || height == 0 {
            return Err(DecodeError::EmptyImage);
        }
        Ok(ExtractedImage::new(
            buffer,
            self.format,
            width,
            height,
            page_number,
            index,
        ))
    }

    fn encode(&self, raster: DynamicImage) -> Result<Vec<u8>, DecodeError> {
        let mut buffer = Vec::new();
        let result = match self.format {
            ImageFormat::Png => raster.write_to(
                &mut Cursor::new(&mut buffer),
                self.format.to_image_format(),
            ),
            ImageFormat::Jpeg => {
                // JPEG has no alpha channel.
                let raster = match raster {
                    DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => raster,
                    DynamicImage::ImageLuma16(_) | DynamicImage::ImageLumaA8(_) => {
                        DynamicImage::ImageLuma8(raster.to_luma8())
                    }
                    other => DynamicImage::ImageRgb8(other.to_rgb8()),
                };
                raster.write_with_encoder(JpegEncoder::new_with_quality(
                    &mut buffer,
                    self.jpeg_quality,
                ))
            }
        };
        result.map_err(|e| DecodeError::Encode(e.to_string()))?;
        Ok(buffer)
    }
}

fn measure(buffer: &[u8]) -> Result<(u32, u32), DecodeError> {
    ImageReader::new(Cursor::new(buffer))
        .with_guessed_format()
        .map_err(|e| DecodeError::Encode(e.to_string()))?
        .into_dimensions()
        .map_err(|e| DecodeError::Encode(e.to_string()))
}
