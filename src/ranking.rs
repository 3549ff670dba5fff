//! Post-processing over already extracted images. Nothing here decodes.

use crate::ExtractedImage;
use std::cmp::Reverse;

/// Default minimum width for [`filter_by_size`].
pub const DEFAULT_MIN_WIDTH: u32 = 200;

/// Default minimum height for [`filter_by_size`].
pub const DEFAULT_MIN_HEIGHT: u32 = 200;

/// Default number of images kept by [`select_largest`].
pub const DEFAULT_LARGEST_COUNT: usize = 5;

/// Keep images at least `min_width` wide and `min_height` tall.
///
/// The relative order of the retained images is unchanged.
pub fn filter_by_size(
    images: Vec<ExtractedImage>,
    min_width: u32,
    min_height: u32,
) -> Vec<ExtractedImage> {
    images
        .into_iter()
        .filter(|img| img.width() >= min_width && img.height() >= min_height)
        .collect()
}

/// Return the `count` largest images by pixel area, largest first.
///
/// Images with equal area keep their original relative order.
pub fn select_largest(mut images: Vec<ExtractedImage>, count: usize) -> Vec<ExtractedImage> {
    images.sort_by_key(|img| Reverse(img.area()));
    images.truncate(count);
    images
}
